//! Serialization of component value trees back to CSS syntax.
//!
//! The contract is that re-tokenizing the serialization of a tokenized input
//! yields the same tree. Numeric tokens write their exact source
//! representation; identifiers are re-escaped; and when two adjacent nodes
//! would merge into a different token under re-tokenization, an empty
//! comment `/**/` is inserted between them.

use crate::ast::{Node, NodeKind};
use crate::errors::ErrorKind;

/// Serialize a list of nodes to CSS syntax
pub fn serialize(nodes: &[Node]) -> String {
    let mut output = String::new();
    serialize_to(nodes, &mut output);
    output
}

pub(crate) fn serialize_to(nodes: &[Node], output: &mut String) {
    let mut previous: Option<&Node> = None;

    for node in nodes {
        if let Some(previous) = previous {
            if merges_with_next(previous, node) {
                output.push_str("/**/");
            } else if previous.is_literal("\\") {
                // A lone backslash must stay a delimiter. Anything but a
                // newline after it would be picked up as an escape.
                output.push('\n');
            }
        }

        write_node(node, output);
        previous = Some(node);
    }
}

fn write_node(node: &Node, output: &mut String) {
    match &node.kind {
        NodeKind::Whitespace => output.push(' '),
        NodeKind::Literal { value } => output.push_str(value),
        NodeKind::Ident { value, .. } => output.push_str(&serialize_identifier(value)),
        NodeKind::AtKeyword { value, .. } => {
            output.push('@');
            output.push_str(&serialize_identifier(value));
        }
        NodeKind::Hash { value, is_identifier } => {
            output.push('#');
            if *is_identifier {
                output.push_str(&serialize_identifier(value));
            } else {
                output.push_str(&serialize_name(value));
            }
        }
        NodeKind::QuotedString { value } => {
            output.push('"');
            output.push_str(&serialize_string_value(value));
            output.push('"');
        }
        NodeKind::Url { value } => {
            output.push_str("url(\"");
            output.push_str(&serialize_string_value(value));
            output.push_str("\")");
        }
        NodeKind::UnicodeRange { start, end } => {
            if start == end {
                output.push_str(&format!("U+{start:X}"));
            } else {
                output.push_str(&format!("U+{start:X}-{end:X}"));
            }
        }
        NodeKind::Number { representation, .. } => output.push_str(representation),
        NodeKind::Percentage { representation, .. } => {
            output.push_str(representation);
            output.push('%');
        }
        NodeKind::Dimension {
            representation,
            unit,
            ..
        } => {
            output.push_str(representation);
            // a unit spelled e/E would read as scientific notation
            if unit == "e" || unit == "E" || unit.starts_with("e-") || unit.starts_with("E-") {
                output.push_str("\\65 ");
                output.push_str(&serialize_name(&unit[1..]));
            } else {
                output.push_str(&serialize_identifier(unit));
            }
        }
        NodeKind::Comment { value } => {
            output.push_str("/*");
            output.push_str(value);
            output.push_str("*/");
        }
        NodeKind::ParenBlock { content } => {
            output.push('(');
            serialize_to(content, output);
            output.push(')');
        }
        NodeKind::SquareBlock { content } => {
            output.push('[');
            serialize_to(content, output);
            output.push(']');
        }
        NodeKind::CurlyBlock { content } => {
            output.push('{');
            serialize_to(content, output);
            output.push('}');
        }
        NodeKind::Function {
            name, arguments, ..
        } => {
            output.push_str(&serialize_identifier(name));
            output.push('(');
            serialize_to(arguments, output);
            output.push(')');
        }
        NodeKind::ParseError { kind, .. } => match kind {
            ErrorKind::BadString => output.push_str("\"[bad string]\n"),
            ErrorKind::BadUrl => output.push_str("url([bad url])"),
            ErrorKind::UnmatchedCloseParen => output.push(')'),
            ErrorKind::UnmatchedCloseSquare => output.push(']'),
            ErrorKind::UnmatchedCloseCurly => output.push('}'),
            // structural errors have no source form
            ErrorKind::Empty | ErrorKind::ExtraInput | ErrorKind::Invalid => {}
        },
        NodeKind::Declaration {
            name,
            value,
            important,
            ..
        } => {
            output.push_str(&serialize_identifier(name));
            output.push(':');
            serialize_to(value, output);
            if *important {
                output.push_str(" !important");
            }
            output.push(';');
        }
        NodeKind::QualifiedRule { prelude, content } => {
            serialize_to(prelude, output);
            output.push('{');
            serialize_to(content, output);
            output.push('}');
        }
        NodeKind::AtRule {
            at_keyword,
            prelude,
            content,
            ..
        } => {
            output.push('@');
            output.push_str(&serialize_identifier(at_keyword));
            serialize_to(prelude, output);
            match content {
                Some(content) => {
                    output.push('{');
                    serialize_to(content, output);
                    output.push('}');
                }
                None => output.push(';'),
            }
        }
    }
}

/// Serialize any string as a CSS identifier
pub fn serialize_identifier(value: &str) -> String {
    if value == "-" {
        return "\\-".to_string();
    }

    if let Some(stripped) = value.strip_prefix("--") {
        return format!("--{}", serialize_name(stripped));
    }

    let mut result = String::new();
    let mut remainder = value;
    if let Some(stripped) = value.strip_prefix('-') {
        result.push('-');
        remainder = stripped;
    }

    let mut chars = remainder.chars();
    let Some(first) = chars.next() else {
        return result;
    };

    if first.is_ascii_alphabetic() || first == '_' || !first.is_ascii() {
        result.push(first);
    } else if first.is_ascii_digit() || matches!(first, '\n' | '\r' | '\u{000C}') {
        result.push_str(&format!("\\{:x} ", first as u32));
    } else {
        result.push('\\');
        result.push(first);
    }

    result.push_str(&serialize_name(chars.as_str()));
    result
}

/// Serialize any string as a CSS name (the part of an identifier after its
/// first character, or the value of an unrestricted hash)
pub fn serialize_name(value: &str) -> String {
    let mut result = String::new();

    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            result.push(c);
        } else if matches!(c, '\n' | '\r' | '\u{000C}') {
            result.push_str(&format!("\\{:x} ", c as u32));
        } else {
            result.push('\\');
            result.push(c);
        }
    }

    result
}

/// Serialize any string as the contents of a double-quoted CSS string
pub fn serialize_string_value(value: &str) -> String {
    let mut result = String::new();

    for c in value.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' | '\r' | '\u{000C}' => result.push_str(&format!("\\{:x} ", c as u32)),
            _ => result.push(c),
        }
    }

    result
}

/// Classification of a node for the token-separation table
#[derive(Clone, Copy, PartialEq)]
enum SerializationClass {
    Ident,
    AtKeyword,
    Hash,
    Dimension,
    Number,
    Percentage,
    UnicodeRange,
    Function,
    Url,
    BadUrl,
    ParenBlock,
    Cdc,
    Delim(char),
    Other,
}

fn classify(node: &Node) -> SerializationClass {
    use SerializationClass::*;

    match &node.kind {
        NodeKind::Ident { .. } => Ident,
        NodeKind::AtKeyword { .. } => AtKeyword,
        NodeKind::Hash { .. } => Hash,
        NodeKind::Dimension { .. } => Dimension,
        NodeKind::Number { .. } => Number,
        NodeKind::Percentage { .. } => Percentage,
        NodeKind::UnicodeRange { .. } => UnicodeRange,
        NodeKind::Function { .. } => Function,
        NodeKind::Url { .. } => Url,
        NodeKind::ParenBlock { .. } => ParenBlock,
        NodeKind::ParseError { kind, .. } if *kind == ErrorKind::BadUrl => BadUrl,
        NodeKind::Literal { value } => {
            if value == "-->" {
                Cdc
            } else {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Delim(c),
                    _ => Other,
                }
            }
        }
        _ => Other,
    }
}

/// The token pairs whose serializations re-merge into different tokens when
/// written back to back (the css-syntax serialization table, extended with
/// the match-operator literals this tokenizer still produces).
#[allow(clippy::match_like_matches_macro)]
fn merges_with_next(previous: &Node, next: &Node) -> bool {
    use SerializationClass::*;

    let previous = classify(previous);
    let next = classify(next);

    match (previous, next) {
        (Ident, Ident | Function | Url | BadUrl | Number | Percentage | Dimension) => true,
        (Ident, UnicodeRange | Cdc | ParenBlock) => true,
        // a trailing u/U followed by a '+' could restart a unicode range
        (Ident, Delim('-') | Delim('+')) => true,
        (Delim('+'), Delim('?')) => true,
        (
            AtKeyword | Hash | Dimension,
            Ident | Function | Url | BadUrl | Number | Percentage | Dimension,
        ) => true,
        (AtKeyword | Hash | Dimension, UnicodeRange | Cdc) => true,
        (AtKeyword | Hash | Dimension, Delim('-')) => true,
        (Number, Ident | Function | Url | BadUrl | Number | Percentage | Dimension) => true,
        (Number, UnicodeRange | Cdc) => true,
        (Number, Delim('%')) => true,
        (
            Delim('#') | Delim('-'),
            Ident | Function | Url | BadUrl | Number | Percentage | Dimension,
        ) => true,
        (Delim('#') | Delim('-'), UnicodeRange | Cdc) => true,
        (Delim('#') | Delim('-'), Delim('-')) => true,
        (Delim('@'), Ident | Function | Url | BadUrl | UnicodeRange | Cdc) => true,
        (Delim('@'), Delim('-')) => true,
        (UnicodeRange, Ident | Function | Url | BadUrl | Number | Percentage | Dimension) => true,
        (UnicodeRange, Delim('?')) => true,
        (Delim('.') | Delim('+'), Number | Percentage | Dimension) => true,
        (Delim('/'), Delim('*')) => true,
        (Delim('~' | '|' | '^' | '$' | '*'), Delim('=')) => true,
        (Delim('|'), Delim('|')) => true,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json::nodes_to_json;
    use crate::tokenizer::parse_component_value_list;
    use moss_shared::byte_stream::Location;

    fn roundtrips(css: &str) {
        let parsed = parse_component_value_list(css, false);
        let serialized = serialize(&parsed);
        let reparsed = parse_component_value_list(&serialized, false);
        assert_eq!(
            nodes_to_json(&parsed),
            nodes_to_json(&reparsed),
            "css: {css} serialized: {serialized}"
        );
    }

    #[test]
    fn roundtrip_component_values() {
        for css in [
            "a { color: #123; background: url(x.png) }",
            "12px 50% 1.5em +3 -4.5e2 .5",
            "foo[bar=\"baz\"], #id:hover>f(1, 2/3)",
            "@media screen { a{} }",
            "u+1-2f U+a?? u0 1e3 e3",
            "\"str\\\"ing\" 'single' url(\"q\")",
            "/* comment */ a /* unterminated",
            "{ ] } ) weird",
            "\\\nfoo \\66 oo",
            "a !important;b:1",
            "#0f0 #zzz #-x",
            "~= |= ^= $= *= || ~ | <!-- --> @media @ # . +",
        ] {
            roundtrips(css);
        }
    }

    #[test]
    fn identifiers_are_reescaped() {
        assert_eq!(serialize_identifier("-"), "\\-");
        assert_eq!(serialize_identifier("--x"), "--x");
        assert_eq!(serialize_identifier("3d"), "\\33 d");
        assert_eq!(serialize_identifier("-4x"), "-\\34 x");
        assert_eq!(serialize_identifier("hello"), "hello");
        assert_eq!(serialize_identifier("a b"), "a\\ b");
        assert_eq!(serialize_identifier("a\nb"), "a\\a b");
        assert_eq!(serialize_identifier("céleste"), "céleste");

        // everything must re-tokenize to the original ident
        for value in ["3d", "-4x", "a b", "a\nb", "-", "--", "_x", "é"] {
            let tokens = parse_component_value_list(&serialize_identifier(value), false);
            assert_eq!(
                nodes_to_json(&tokens),
                serde_json::json!([["ident", value]]),
                "value: {value:?}"
            );
        }
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(serialize_string_value("a\"b"), "a\\\"b");
        assert_eq!(serialize_string_value("a\\b"), "a\\\\b");
        assert_eq!(serialize_string_value("a\nb"), "a\\a b");
    }

    #[test]
    fn scientific_units_are_disambiguated() {
        // the escape resolves to a harmless 'em' and needs no re-escaping
        let tokens = parse_component_value_list("3\\65 m", false);
        assert_eq!(serialize(&tokens), "3em");

        // a bare 'e' unit would read as scientific notation
        let tokens = parse_component_value_list("5\\65", false);
        assert_eq!(serialize(&tokens), "5\\65 ");

        // a hand-built dimension with unit "e-x"
        let node = Node::new(
            NodeKind::Dimension {
                value: 3.0,
                int_value: Some(3),
                representation: "3".to_string(),
                unit: "e-x".to_string(),
                lower_unit: "e-x".to_string(),
            },
            Location::default(),
        );
        assert_eq!(node.serialize(), "3\\65 -x");
    }

    #[test]
    fn adjacent_tokens_get_a_separating_comment() {
        let mut tokens = parse_component_value_list("a b", false);
        // deleting the whitespace forces the guard comment
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "a/**/b");

        let mut tokens = parse_component_value_list("5 px", false);
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "5/**/px");

        let mut tokens = parse_component_value_list("~ =", false);
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "~/**/=");

        // 'u+?' would re-merge into a unicode-range token
        let mut tokens = parse_component_value_list("u +?", false);
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "u/**/+/**/?");
        let reparsed = parse_component_value_list(&serialize(&tokens), true);
        assert_eq!(nodes_to_json(&reparsed), nodes_to_json(&tokens));

        // no comment when no merge can happen
        let mut tokens = parse_component_value_list("a (", false);
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "a/**/()");

        let mut tokens = parse_component_value_list("; ;", false);
        tokens.remove(1);
        assert_eq!(serialize(&tokens), ";;");
    }

    #[test]
    fn backslash_delimiter_keeps_its_newline() {
        let mut tokens = parse_component_value_list("\\\nfoo", false);
        assert_eq!(serialize(&tokens), "\\\n foo");

        // deleting the whitespace reproduces the source exactly
        tokens.remove(1);
        assert_eq!(serialize(&tokens), "\\\nfoo");
    }

    #[test]
    fn bad_tokens_serialize_to_recoverable_forms() {
        let tokens = parse_component_value_list("\"bad\nx", false);
        let serialized = serialize(&tokens);
        assert!(serialized.starts_with("\"[bad string]\n"));

        let tokens = parse_component_value_list("url(b(d)", false);
        assert_eq!(serialize(&tokens), "url([bad url])");

        let tokens = parse_component_value_list("}", false);
        assert_eq!(serialize(&tokens), "}");
    }

    #[test]
    fn unterminated_comment_is_closed() {
        let tokens = parse_component_value_list("/* foo ", false);
        assert_eq!(serialize(&tokens), "/* foo */");
    }
}
