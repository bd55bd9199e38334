//! Data structures for the CSS component value tree.
//!
//! A `Node` is a token, a bracket/function block holding nested nodes, or one
//! of the structural results (declaration, qualified rule, at-rule). Literal
//! nodes regroup what the syntax specification calls delim, colon, semicolon,
//! comma, CDO, CDC and the match-operator tokens: one to four characters
//! exactly as they appeared in the source.

use moss_shared::byte_stream::Location;

use crate::errors::ErrorKind;
use crate::utils::ascii_lower;

/// A component value, declaration or rule, with its source position. The
/// position points at the start of the construct: the `{` of a `{}` block,
/// the ident of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A run of whitespace; serializes as a single space
    Whitespace,
    /// One to four source characters: any single delimiter, `<!--`, `-->`,
    /// or a match operator such as `~=`. Commas inside function arguments
    /// are literals too.
    Literal { value: String },
    /// `lower_value` has only ASCII A-Z folded, for keyword comparison
    Ident { value: String, lower_value: String },
    /// The value does not include the `@` marker
    AtKeyword { value: String, lower_value: String },
    /// `is_identifier` is true when the characters after `#` form a valid
    /// identifier; only such hashes are valid ID selectors
    Hash { value: String, is_identifier: bool },
    /// The value does not include the quotes; escapes are resolved
    QuotedString { value: String },
    /// The `url(`/`)` markers, optional quotes and surrounding whitespace are
    /// stripped; escapes are resolved
    Url { value: String },
    /// Inclusive code point range with `start <= end`
    UnicodeRange { start: u32, end: u32 },
    /// `representation` is the exact source spelling of the literal;
    /// `int_value` is present iff the literal had no `.` and no exponent
    Number {
        value: f64,
        int_value: Option<i64>,
        representation: String,
    },
    /// The trailing `%` is not part of the representation
    Percentage {
        value: f64,
        int_value: Option<i64>,
        representation: String,
    },
    /// The unit is an ident directly after the number; it is never `%`
    Dimension {
        value: f64,
        int_value: Option<i64>,
        representation: String,
        unit: String,
        lower_unit: String,
    },
    /// Content between `/*` and `*/`, both exclusive
    Comment { value: String },
    /// The `(` and `)` markers are not represented in the content
    ParenBlock { content: Vec<Node> },
    /// The `[` and `]` markers are not represented in the content
    SquareBlock { content: Vec<Node> },
    /// The `{` and `}` markers are not represented in the content
    CurlyBlock { content: Vec<Node> },
    /// `name` is the ident before the `(`; arguments keep commas as literals
    Function {
        name: String,
        lower_name: String,
        arguments: Vec<Node>,
    },
    /// An in-band syntax error; see [`ErrorKind`]
    ParseError { kind: ErrorKind, message: String },
    /// `value` is everything between `:` and the end of the declaration,
    /// with a trailing `!important` stripped when `important` is set
    Declaration {
        name: String,
        lower_name: String,
        value: Vec<Node>,
        important: bool,
    },
    /// `content` is the component value sequence inside the rule's `{}` block
    QualifiedRule { prelude: Vec<Node>, content: Vec<Node> },
    /// `content` is absent for semicolon-terminated at-rules
    AtRule {
        at_keyword: String,
        lower_at_keyword: String,
        prelude: Vec<Node>,
        content: Option<Vec<Node>>,
    },
}

impl Node {
    /// Returns a new node for the given kind on the given location
    pub fn new(kind: NodeKind, location: Location) -> Node {
        Node { kind, location }
    }

    pub(crate) fn new_whitespace(location: Location) -> Node {
        Node::new(NodeKind::Whitespace, location)
    }

    pub(crate) fn new_literal(value: &str, location: Location) -> Node {
        Node::new(
            NodeKind::Literal {
                value: value.to_string(),
            },
            location,
        )
    }

    pub(crate) fn new_ident(value: String, location: Location) -> Node {
        let lower_value = ascii_lower(&value);
        Node::new(NodeKind::Ident { value, lower_value }, location)
    }

    pub(crate) fn new_at_keyword(value: String, location: Location) -> Node {
        let lower_value = ascii_lower(&value);
        Node::new(NodeKind::AtKeyword { value, lower_value }, location)
    }

    pub(crate) fn new_hash(value: String, is_identifier: bool, location: Location) -> Node {
        Node::new(NodeKind::Hash { value, is_identifier }, location)
    }

    pub(crate) fn new_string(value: String, location: Location) -> Node {
        Node::new(NodeKind::QuotedString { value }, location)
    }

    pub(crate) fn new_url(value: String, location: Location) -> Node {
        Node::new(NodeKind::Url { value }, location)
    }

    pub(crate) fn new_unicode_range(start: u32, end: u32, location: Location) -> Node {
        Node::new(NodeKind::UnicodeRange { start, end }, location)
    }

    pub(crate) fn new_number(
        value: f64,
        int_value: Option<i64>,
        representation: String,
        location: Location,
    ) -> Node {
        Node::new(
            NodeKind::Number {
                value,
                int_value,
                representation,
            },
            location,
        )
    }

    pub(crate) fn new_percentage(
        value: f64,
        int_value: Option<i64>,
        representation: String,
        location: Location,
    ) -> Node {
        Node::new(
            NodeKind::Percentage {
                value,
                int_value,
                representation,
            },
            location,
        )
    }

    pub(crate) fn new_dimension(
        value: f64,
        int_value: Option<i64>,
        representation: String,
        unit: String,
        location: Location,
    ) -> Node {
        let lower_unit = ascii_lower(&unit);
        Node::new(
            NodeKind::Dimension {
                value,
                int_value,
                representation,
                unit,
                lower_unit,
            },
            location,
        )
    }

    pub(crate) fn new_comment(value: String, location: Location) -> Node {
        Node::new(NodeKind::Comment { value }, location)
    }

    pub(crate) fn new_function(name: String, arguments: Vec<Node>, location: Location) -> Node {
        let lower_name = ascii_lower(&name);
        Node::new(
            NodeKind::Function {
                name,
                lower_name,
                arguments,
            },
            location,
        )
    }

    pub(crate) fn new_parse_error(kind: ErrorKind, message: String, location: Location) -> Node {
        Node::new(NodeKind::ParseError { kind, message }, location)
    }
}

impl Node {
    /// True for literal nodes whose value equals the given string. Literal
    /// nodes are the only nodes that compare against plain text this way.
    pub fn is_literal(&self, value: &str) -> bool {
        matches!(&self.kind, NodeKind::Literal { value: v } if v == value)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, NodeKind::Whitespace)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment { .. })
    }

    /// True for everything except whitespace and comments
    pub fn is_significant(&self) -> bool {
        !self.is_whitespace() && !self.is_comment()
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.kind, NodeKind::Ident { .. })
    }

    pub fn is_at_keyword(&self) -> bool {
        matches!(self.kind, NodeKind::AtKeyword { .. })
    }

    pub fn is_curly_block(&self) -> bool {
        matches!(self.kind, NodeKind::CurlyBlock { .. })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::Declaration { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.kind, NodeKind::ParseError { .. })
    }

    /// Serialize this node back to CSS syntax
    pub fn serialize(&self) -> String {
        crate::serializer::serialize(std::slice::from_ref(self))
    }
}
