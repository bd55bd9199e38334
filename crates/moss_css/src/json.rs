//! A position-independent JSON form of the component value tree.
//!
//! The shapes follow the css-parsing-tests convention: `["ident", "a"]`,
//! `["number", "1", 1, "integer"]`, `["{}", …]`, a plain `" "` for
//! whitespace, and so on. The test suites compare trees through this form so
//! that source positions do not participate in equality; it is equally
//! useful for debugging output.

use serde_json::{json, Value};

use crate::ast::{Node, NodeKind};

/// Converts a list of nodes into its JSON form
pub fn nodes_to_json(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(node_to_json).collect())
}

/// Converts a single node into its JSON form
pub fn node_to_json(node: &Node) -> Value {
    match &node.kind {
        NodeKind::Whitespace => json!(" "),
        NodeKind::Literal { value } => json!(value),
        NodeKind::Ident { value, .. } => json!(["ident", value]),
        NodeKind::AtKeyword { value, .. } => json!(["at-keyword", value]),
        NodeKind::Hash { value, is_identifier } => {
            let flag = if *is_identifier { "id" } else { "unrestricted" };
            json!(["hash", value, flag])
        }
        NodeKind::QuotedString { value } => json!(["string", value]),
        NodeKind::Url { value } => json!(["url", value]),
        NodeKind::UnicodeRange { start, end } => json!(["unicode-range", start, end]),
        NodeKind::Number {
            value,
            int_value,
            representation,
        } => numeric_to_json("number", representation, *value, *int_value, None),
        NodeKind::Percentage {
            value,
            int_value,
            representation,
        } => numeric_to_json("percentage", representation, *value, *int_value, None),
        NodeKind::Dimension {
            value,
            int_value,
            representation,
            unit,
            ..
        } => numeric_to_json("dimension", representation, *value, *int_value, Some(unit.as_str())),
        NodeKind::Comment { value } => json!(["comment", value]),
        NodeKind::ParenBlock { content } => block_to_json("()", content),
        NodeKind::SquareBlock { content } => block_to_json("[]", content),
        NodeKind::CurlyBlock { content } => block_to_json("{}", content),
        NodeKind::Function {
            name, arguments, ..
        } => {
            let mut items = vec![json!("function"), json!(name)];
            items.extend(arguments.iter().map(node_to_json));
            Value::Array(items)
        }
        NodeKind::ParseError { kind, .. } => json!(["error", kind.to_string()]),
        NodeKind::Declaration {
            name,
            value,
            important,
            ..
        } => json!(["declaration", name, nodes_to_json(value), important]),
        NodeKind::QualifiedRule { prelude, content } => {
            json!(["qualified rule", nodes_to_json(prelude), nodes_to_json(content)])
        }
        NodeKind::AtRule {
            at_keyword,
            prelude,
            content,
            ..
        } => {
            let content = match content {
                Some(content) => nodes_to_json(content),
                None => Value::Null,
            };
            json!(["at-rule", at_keyword, nodes_to_json(prelude), content])
        }
    }
}

fn numeric_to_json(
    kind: &str,
    representation: &str,
    value: f64,
    int_value: Option<i64>,
    unit: Option<&str>,
) -> Value {
    let mut items = vec![json!(kind), json!(representation)];
    match int_value {
        Some(int_value) => {
            items.push(json!(int_value));
            items.push(json!("integer"));
        }
        None => {
            items.push(json!(value));
            items.push(json!("number"));
        }
    }
    if let Some(unit) = unit {
        items.push(json!(unit));
    }
    Value::Array(items)
}

fn block_to_json(marker: &str, content: &[Node]) -> Value {
    let mut items = vec![json!(marker)];
    items.extend(content.iter().map(node_to_json));
    Value::Array(items)
}
