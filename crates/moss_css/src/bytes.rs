//! Parsing stylesheets straight from bytes, with encoding detection.

use encoding_rs::Encoding;
use moss_shared::decode::decode_css_bytes;

use crate::ast::Node;
use crate::parser::parse_stylesheet;

/// Parse a stylesheet from bytes.
///
/// The encoding is determined from the protocol-level label (e.g. the
/// `charset` parameter of a `Content-Type` header), a leading `@charset`
/// rule, the encoding of the referring document, or UTF-8, in that order.
/// Returns the rule sequence and the encoding that was used.
pub fn parse_stylesheet_bytes(
    css_bytes: &[u8],
    protocol_encoding: Option<&str>,
    environment_encoding: Option<&str>,
    skip_comments: bool,
    skip_whitespace: bool,
) -> (Vec<Node>, &'static Encoding) {
    let (css, encoding) = decode_css_bytes(css_bytes, protocol_encoding, environment_encoding);
    let rules = parse_stylesheet(css.as_str(), skip_comments, skip_whitespace);

    (rules, encoding)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json::nodes_to_json;
    use serde_json::json;

    #[test]
    fn parse_utf8_bytes() {
        let (rules, encoding) = parse_stylesheet_bytes(b"a { v: \xC3\xA9 }", None, None, true, true);
        assert_eq!(encoding.name(), "UTF-8");
        assert_eq!(
            nodes_to_json(&rules),
            json!([[
                "qualified rule",
                [["ident", "a"], " "],
                [" ", ["ident", "v"], ":", " ", ["ident", "é"], " "]
            ]])
        );
    }

    #[test]
    fn charset_rule_selects_the_encoding() {
        let (rules, encoding) = parse_stylesheet_bytes(
            b"@charset \"ISO-8859-1\"; a { v: \xE9 }",
            None,
            None,
            true,
            true,
        );
        assert_eq!(encoding.name(), "windows-1252");

        // the @charset rule itself still parses as a regular at-rule
        let json = nodes_to_json(&rules);
        assert_eq!(json[0][0], "at-rule");
        assert_eq!(json[0][1], "charset");
        assert_eq!(json[1][0], "qualified rule");
    }

    #[test]
    fn protocol_encoding_wins_over_charset() {
        let (_, encoding) = parse_stylesheet_bytes(
            b"@charset \"ISO-8859-5\"; a{}",
            Some("utf-8"),
            None,
            true,
            true,
        );
        assert_eq!(encoding.name(), "UTF-8");
    }

    #[test]
    fn environment_encoding_is_a_fallback() {
        let (_, encoding) = parse_stylesheet_bytes(b"a{}", None, Some("ISO-8859-5"), true, true);
        assert_eq!(encoding.name(), "ISO-8859-5");
    }
}
