//! Determining the character encoding of a stylesheet and decoding it.
//!
//! Implements the "determine the fallback encoding" steps of the CSS syntax
//! specification: a protocol-level label wins, then an `@charset` rule at the
//! very start of the byte stream, then the encoding of the referring
//! document, then UTF-8.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// `@charset "`: the rule is only honored when spelled exactly like this,
/// double quote included.
const CHARSET_PREFIX: &[u8] = b"@charset \"";

/// Maximum number of bytes scanned for the closing quote of an `@charset`
/// rule. No encoding label is longer than this.
const CHARSET_SCAN_END: usize = 100;

/// Determine the character encoding of a stylesheet and decode it.
///
/// Decoding never fails: malformed sequences become U+FFFD and a leading BOM
/// for the chosen encoding is stripped. A BOM that identifies a different
/// encoding takes precedence over the fallback, per the WHATWG decode
/// algorithm. Returns the decoded text and the encoding that was used.
pub fn decode_css_bytes(
    css_bytes: &[u8],
    protocol_encoding: Option<&str>,
    environment_encoding: Option<&str>,
) -> (String, &'static Encoding) {
    let label_of = |label: Option<&str>| label.and_then(|l| Encoding::for_label(l.as_bytes()));

    if let Some(encoding) = label_of(protocol_encoding) {
        return decode_with(css_bytes, encoding);
    }

    if let Some(label) = charset_rule_label(css_bytes) {
        if let Some(encoding) = Encoding::for_label(label) {
            // A UTF-16 label cannot be correct: the rule itself was readable
            // as ASCII. The specification says to decode as UTF-8 instead.
            let encoding = if encoding == UTF_16BE || encoding == UTF_16LE {
                UTF_8
            } else {
                encoding
            };
            return decode_with(css_bytes, encoding);
        }
    }

    if let Some(encoding) = label_of(environment_encoding) {
        return decode_with(css_bytes, encoding);
    }

    decode_with(css_bytes, UTF_8)
}

/// Extracts the label bytes of a leading `@charset "<label>";` rule, if any.
fn charset_rule_label(css_bytes: &[u8]) -> Option<&[u8]> {
    if !css_bytes.starts_with(CHARSET_PREFIX) {
        return None;
    }

    let window = &css_bytes[CHARSET_PREFIX.len()..css_bytes.len().min(CHARSET_SCAN_END)];
    let end_quote = window.iter().position(|&b| b == b'"')?;
    if css_bytes.get(CHARSET_PREFIX.len() + end_quote + 1) == Some(&b';') {
        Some(&window[..end_quote])
    } else {
        None
    }
}

fn decode_with(css_bytes: &[u8], encoding: &'static Encoding) -> (String, &'static Encoding) {
    let (text, used_encoding, _had_errors) = encoding.decode(css_bytes);
    (text.into_owned(), used_encoding)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn utf8_by_default() {
        let (text, encoding) = decode_css_bytes(b"a { color: red }", None, None);
        assert_eq!(text, "a { color: red }");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn protocol_encoding_wins() {
        let (text, encoding) = decode_css_bytes(b"a:\xE9", Some("latin1"), None);
        assert_eq!(text, "a:é");
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn charset_rule() {
        let (text, encoding) =
            decode_css_bytes(b"@charset \"ISO-8859-1\"; a:\xE9", None, None);
        assert_eq!(text, "@charset \"ISO-8859-1\"; a:\u{E9}");
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn charset_rule_must_be_exact() {
        // Missing semicolon: the rule is ignored and UTF-8 wins.
        let (_, encoding) = decode_css_bytes(b"@charset \"ISO-8859-1\" a{}", None, None);
        assert_eq!(encoding, UTF_8);

        // Single quotes do not count either.
        let (_, encoding) = decode_css_bytes(b"@charset 'ISO-8859-1'; a{}", None, None);
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn utf16_charset_label_decodes_as_utf8() {
        let (text, encoding) = decode_css_bytes(b"@charset \"utf-16le\"; a{}", None, None);
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "@charset \"utf-16le\"; a{}");
    }

    #[test]
    fn environment_encoding_is_last_fallback() {
        let (text, encoding) = decode_css_bytes(b"a:\xE9", None, Some("latin1"));
        assert_eq!(text, "a:é");
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn bom_overrides_fallback() {
        let (text, encoding) = decode_css_bytes(b"\xEF\xBB\xBFa{}", Some("latin1"), None);
        assert_eq!(text, "a{}");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        let (text, _) = decode_css_bytes(b"a{\xFF}", None, None);
        assert_eq!(text, "a{\u{FFFD}}");
    }
}
