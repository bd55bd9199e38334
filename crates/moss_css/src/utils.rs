//! Small helpers for working with component value lists.

use cow_utils::CowUtils;

use crate::ast::Node;

/// Transform (only) ASCII letters to lower case: A-Z maps to a-z.
///
/// This is the folding to use for CSS keywords, which are case-insensitive
/// within the ASCII range only. Full unicode lowercasing is wrong here: it
/// can map non-ASCII characters into the ASCII range (the Kelvin sign
/// becomes `k`).
pub fn ascii_lower(string: &str) -> String {
    string.cow_to_ascii_lowercase().into_owned()
}

/// Removes leading and trailing whitespace tokens.
pub fn strip_whitespace_tokens(tokens: &[Node]) -> &[Node] {
    let Some(start) = tokens.iter().position(|token| !token.is_whitespace()) else {
        return &[];
    };
    let end = tokens
        .iter()
        .rposition(|token| !token.is_whitespace())
        .unwrap_or(start);
    &tokens[start..=end]
}

/// Splits on top-level comma tokens, stripping whitespace from each part.
pub fn split_on_comma_tokens(tokens: &[Node]) -> Vec<&[Node]> {
    tokens
        .split(|token| token.is_literal(","))
        .map(strip_whitespace_tokens)
        .collect()
}
