//! Failure modes a parse-error node can carry.

use thiserror::Error;

/// Machine-readable kind of an in-band parse error. The `Display` form is the
/// short string consumers dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Input was empty where content was required
    #[error("empty")]
    Empty,
    /// A single-value entry point found more than one value
    #[error("extra-input")]
    ExtraInput,
    /// Structural violation: missing declaration name or colon, unexpected
    /// token in a declaration, EOF before the `{}` block of a rule
    #[error("invalid")]
    Invalid,
    /// Unescaped newline inside a quoted string
    #[error("bad-string")]
    BadString,
    /// Invalid character in an unquoted url() body or missing closing `)`
    #[error("bad-url")]
    BadUrl,
    /// A `)` with no matching opener in context
    #[error(")")]
    UnmatchedCloseParen,
    /// A `]` with no matching opener in context
    #[error("]")]
    UnmatchedCloseSquare,
    /// A `}` with no matching opener in context
    #[error("}}")]
    UnmatchedCloseCurly,
}

impl ErrorKind {
    /// The kind for an unmatched closing bracket, if the character is one
    pub fn for_closer(c: char) -> Option<ErrorKind> {
        match c {
            ')' => Some(ErrorKind::UnmatchedCloseParen),
            ']' => Some(ErrorKind::UnmatchedCloseSquare),
            '}' => Some(ErrorKind::UnmatchedCloseCurly),
            _ => None,
        }
    }
}
