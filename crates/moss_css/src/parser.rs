//! Parsing declarations, qualified rules and at-rules out of the component
//! value stream, following the consume algorithms of
//! [css-syntax-3](https://www.w3.org/TR/css-syntax-3/#parser-entry-points).
//!
//! All errors are in-band: the entry points return parse-error nodes instead
//! of failing, and list entry points recover and continue after an error.

use moss_shared::byte_stream::Location;

use crate::ast::{Node, NodeKind};
use crate::errors::ErrorKind;
use crate::tokenizer::parse_component_value_list;

/// Input accepted by the parse functions: raw CSS text, which is tokenized
/// first, or an already-tokenized component value sequence.
pub enum Input<'i> {
    Text(&'i str),
    Values(Vec<Node>),
}

impl<'i> From<&'i str> for Input<'i> {
    fn from(css: &'i str) -> Self {
        Input::Text(css)
    }
}

impl From<Vec<Node>> for Input<'_> {
    fn from(values: Vec<Node>) -> Self {
        Input::Values(values)
    }
}

impl From<Node> for Input<'_> {
    fn from(value: Node) -> Self {
        Input::Values(vec![value])
    }
}

impl Input<'_> {
    /// Tokenizes the text branch; sequences pass through unchanged. On the
    /// sequence branch `skip_comments` is left to the caller's own top-level
    /// filtering.
    fn into_values(self, skip_comments: bool) -> Vec<Node> {
        match self {
            Input::Text(css) => parse_component_value_list(css, skip_comments),
            Input::Values(values) => values,
        }
    }
}

/// Returns the next significant (neither whitespace nor comment) token
fn next_significant(tokens: &mut impl Iterator<Item = Node>) -> Option<Node> {
    tokens.find(Node::is_significant)
}

fn empty_error() -> Node {
    Node::new_parse_error(
        ErrorKind::Empty,
        "Input is empty".to_string(),
        Location::default(),
    )
}

/// Parse a single component value.
///
/// Returns the only significant value in the input, an `empty` error when
/// there is none, or an `extra-input` error when there is more than one.
pub fn parse_one_component_value<'i>(input: impl Into<Input<'i>>, skip_comments: bool) -> Node {
    let mut tokens = input.into().into_values(skip_comments).into_iter();

    let Some(first) = next_significant(&mut tokens) else {
        return empty_error();
    };
    if let Some(second) = next_significant(&mut tokens) {
        return Node::new_parse_error(
            ErrorKind::ExtraInput,
            "Got more than one component value".to_string(),
            second.location,
        );
    }

    first
}

/// Parse a single declaration, such as an `@supports` test or the payload of
/// a style attribute with exactly one property.
///
/// Whitespace and comments before the `:` are dropped; the value keeps them.
pub fn parse_one_declaration<'i>(input: impl Into<Input<'i>>, skip_comments: bool) -> Node {
    let mut tokens = input.into().into_values(skip_comments).into_iter();

    let Some(first) = next_significant(&mut tokens) else {
        return empty_error();
    };
    let rest: Vec<Node> = tokens.collect();
    parse_declaration(&first, &rest)
}

/// Parse a declaration out of its complete token list: `first` is the name
/// candidate, `tokens` everything after it (the colon included).
fn parse_declaration(first: &Node, tokens: &[Node]) -> Node {
    log::trace!("parse_declaration at {:?}", first.location);

    let NodeKind::Ident {
        value: name,
        lower_value: lower_name,
    } = &first.kind
    else {
        return Node::new_parse_error(
            ErrorKind::Invalid,
            "Expected <ident> for declaration name".to_string(),
            first.location,
        );
    };

    let mut iter = tokens.iter();
    let Some(colon) = iter.find(|token| token.is_significant()) else {
        return Node::new_parse_error(
            ErrorKind::Invalid,
            "Expected ':' after declaration name, got EOF".to_string(),
            first.location,
        );
    };
    if !colon.is_literal(":") {
        return Node::new_parse_error(
            ErrorKind::Invalid,
            "Expected ':' after declaration name".to_string(),
            colon.location,
        );
    }

    #[derive(PartialEq)]
    enum State {
        Value,
        Bang,
        Important,
    }

    let mut value: Vec<Node> = Vec::new();
    let mut state = State::Value;
    let mut bang_position = 0;

    for token in iter {
        if state == State::Value && token.is_literal("!") {
            state = State::Bang;
            bang_position = value.len();
        } else if state == State::Bang
            && matches!(&token.kind, NodeKind::Ident { lower_value, .. } if lower_value == "important")
        {
            state = State::Important;
        } else if token.is_significant() {
            state = State::Value;
        }
        value.push(token.clone());
    }

    let important = state == State::Important;
    if important {
        value.truncate(bang_position);
    }

    // Scored after the trailing `!important` is stripped, so that an
    // incomplete bang sequence still counts as ordinary content
    let mut block_count = 0;
    let mut other_count = 0;
    for token in value.iter().filter(|token| token.is_significant()) {
        if token.is_curly_block() {
            block_count += 1;
        } else {
            other_count += 1;
        }
    }

    // A block mixed with anything else is not a valid declaration value
    if block_count >= 1 && (other_count >= 1 || block_count >= 2) {
        return Node::new_parse_error(
            ErrorKind::Invalid,
            "Declaration value contains a {} block and other content".to_string(),
            colon.location,
        );
    }

    Node::new(
        NodeKind::Declaration {
            name: name.clone(),
            lower_name: lower_name.clone(),
            value,
            important,
        },
        first.location,
    )
}

/// Parse a single qualified rule or at-rule, dropping surrounding whitespace
/// and comments.
pub fn parse_one_rule<'i>(input: impl Into<Input<'i>>, skip_comments: bool) -> Node {
    let mut tokens = input.into().into_values(skip_comments).into_iter();

    let Some(first) = next_significant(&mut tokens) else {
        return empty_error();
    };
    let rule = consume_rule(first, &mut tokens);
    if let Some(next) = next_significant(&mut tokens) {
        return Node::new_parse_error(
            ErrorKind::ExtraInput,
            "Expected a single rule".to_string(),
            next.location,
        );
    }

    rule
}

/// Parse a top-level rule sequence. The HTML legacy `<!--` and `-->` tokens
/// are ignored at the top level; use [`parse_rule_list`] to keep them in
/// play.
pub fn parse_stylesheet<'i>(
    input: impl Into<Input<'i>>,
    skip_comments: bool,
    skip_whitespace: bool,
) -> Vec<Node> {
    let mut tokens = input.into().into_values(skip_comments).into_iter();
    let mut result = Vec::new();

    while let Some(token) = tokens.next() {
        if token.is_whitespace() {
            if !skip_whitespace {
                result.push(token);
            }
        } else if token.is_comment() {
            if !skip_comments {
                result.push(token);
            }
        } else if !token.is_literal("<!--") && !token.is_literal("-->") {
            result.push(consume_rule(token, &mut tokens));
        }
    }

    result
}

/// Parse a non-top-level rule sequence, e.g. the content of `@media`.
pub fn parse_rule_list<'i>(
    input: impl Into<Input<'i>>,
    skip_comments: bool,
    skip_whitespace: bool,
) -> Vec<Node> {
    let mut tokens = input.into().into_values(skip_comments).into_iter();
    let mut result = Vec::new();

    while let Some(token) = tokens.next() {
        if token.is_whitespace() {
            if !skip_whitespace {
                result.push(token);
            }
        } else if token.is_comment() {
            if !skip_comments {
                result.push(token);
            }
        } else {
            result.push(consume_rule(token, &mut tokens));
        }
    }

    result
}

/// Parse a `;`-separated declaration and at-rule sequence.
///
/// This is the legacy declaration-list algorithm that was removed from
/// css-syntax-3; it does not know about nested rules. Use
/// [`parse_blocks_contents`] for the current behavior.
pub fn parse_declaration_list<'i>(
    input: impl Into<Input<'i>>,
    skip_comments: bool,
    skip_whitespace: bool,
) -> Vec<Node> {
    let mut tokens = input.into().into_values(skip_comments).into_iter();
    let mut result = Vec::new();

    while let Some(token) = tokens.next() {
        if token.is_whitespace() {
            if !skip_whitespace {
                result.push(token);
            }
        } else if token.is_comment() {
            if !skip_comments {
                result.push(token);
            }
        } else if token.is_at_keyword() {
            result.push(consume_at_rule(token, &mut tokens));
        } else if !token.is_literal(";") {
            result.push(consume_declaration_in_list(token, &mut tokens));
        }
    }

    result
}

/// Parse a block's contents: declarations, at-rules and nested qualified
/// rules, per the "consume a block's contents" algorithm of css-syntax-3.
pub fn parse_blocks_contents<'i>(
    input: impl Into<Input<'i>>,
    skip_comments: bool,
    skip_whitespace: bool,
) -> Vec<Node> {
    let mut tokens = input.into().into_values(skip_comments).into_iter();
    let mut result = Vec::new();

    while let Some(token) = tokens.next() {
        if token.is_whitespace() {
            if !skip_whitespace {
                result.push(token);
            }
        } else if token.is_comment() {
            if !skip_comments {
                result.push(token);
            }
        } else if token.is_at_keyword() {
            result.push(consume_at_rule(token, &mut tokens));
        } else if !token.is_literal(";") {
            result.push(consume_blocks_content(token, &mut tokens));
        }
    }

    result
}

/// Parse a qualified rule or at-rule, consuming just enough of the stream
fn consume_rule(first_token: Node, tokens: &mut impl Iterator<Item = Node>) -> Node {
    if first_token.is_at_keyword() {
        consume_at_rule(first_token, tokens)
    } else {
        consume_qualified_rule(first_token, tokens, false)
    }
}

/// Parse an at-rule: a prelude up to either a `{}` block (block form) or a
/// `;` (semicolon-terminated form, without content)
fn consume_at_rule(at_keyword: Node, tokens: &mut impl Iterator<Item = Node>) -> Node {
    log::trace!("consume_at_rule at {:?}", at_keyword.location);

    let location = at_keyword.location;
    let (value, lower_value) = match at_keyword.kind {
        NodeKind::AtKeyword { value, lower_value } => (value, lower_value),
        // the callers dispatch on is_at_keyword
        _ => (String::new(), String::new()),
    };

    let mut prelude = Vec::new();
    let mut content = None;

    for token in tokens {
        if let NodeKind::CurlyBlock { content: block } = token.kind {
            content = Some(block);
            break;
        }
        if token.is_literal(";") {
            break;
        }
        prelude.push(token);
    }

    Node::new(
        NodeKind::AtRule {
            at_keyword: value,
            lower_at_keyword: lower_value,
            prelude,
            content,
        },
        location,
    )
}

fn rule_error(token: &Node, what: &str) -> Node {
    Node::new_parse_error(
        ErrorKind::Invalid,
        format!("{what} reached before {{}} block for a qualified rule"),
        token.location,
    )
}

/// Consume a qualified rule: a prelude up to its `{}` block. When
/// `stop_at_semicolon` is set (nested context) a top-level `;` aborts the
/// rule with an error instead.
fn consume_qualified_rule(
    first_token: Node,
    tokens: &mut impl Iterator<Item = Node>,
    stop_at_semicolon: bool,
) -> Node {
    log::trace!("consume_qualified_rule at {:?}", first_token.location);

    if stop_at_semicolon && first_token.is_literal(";") {
        return rule_error(&first_token, "Stop token");
    }

    let location = first_token.location;
    if let NodeKind::CurlyBlock { content } = first_token.kind {
        return Node::new(
            NodeKind::QualifiedRule {
                prelude: Vec::new(),
                content,
            },
            location,
        );
    }

    let mut prelude = vec![first_token];
    for token in tokens {
        if stop_at_semicolon && token.is_literal(";") {
            return rule_error(&token, "Stop token");
        }
        if let NodeKind::CurlyBlock { content } = token.kind {
            return Node::new(NodeKind::QualifiedRule { prelude, content }, location);
        }
        prelude.push(token);
    }

    match prelude.last() {
        Some(last) => rule_error(last, "EOF"),
        None => empty_error(),
    }
}

/// Consume one declaration out of a `;`-separated list (legacy behavior:
/// everything up to the next `;` belongs to the declaration)
fn consume_declaration_in_list(first_token: Node, tokens: &mut impl Iterator<Item = Node>) -> Node {
    let mut declaration_tokens = Vec::new();

    for token in tokens {
        if token.is_literal(";") {
            break;
        }
        declaration_tokens.push(token);
    }

    parse_declaration(&first_token, &declaration_tokens)
}

/// Consume a declaration or a nested qualified rule.
///
/// The tokens up to the next `;` (or through the first `{}` block) are tried
/// as a declaration first; when that fails and the stream continues in rule
/// shape, the same tokens are re-interpreted as the prelude and block of a
/// qualified rule.
fn consume_blocks_content(first_token: Node, tokens: &mut impl Iterator<Item = Node>) -> Node {
    let mut declaration_tokens: Vec<Node> = Vec::new();
    let mut semicolon_token: Vec<Node> = Vec::new();

    if !first_token.is_literal(";") && !first_token.is_curly_block() {
        for token in tokens.by_ref() {
            if token.is_literal(";") {
                semicolon_token.push(token);
                break;
            }
            let was_block = token.is_curly_block();
            declaration_tokens.push(token);
            if was_block {
                break;
            }
        }
    }

    let declaration = parse_declaration(&first_token, &declaration_tokens);
    if declaration.is_declaration() {
        return declaration;
    }

    log::trace!(
        "not a declaration at {:?}, retrying as a qualified rule",
        first_token.location
    );
    let mut rest = declaration_tokens
        .into_iter()
        .chain(semicolon_token)
        .chain(tokens);
    consume_qualified_rule(first_token, &mut rest, true)
}
