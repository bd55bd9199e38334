//! A low-level CSS syntax engine.
//!
//! The crate implements the tokenization and parsing algorithms of
//! [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/) and the color
//! value grammar of [CSS Color Level 4](https://www.w3.org/TR/css-color-4/):
//!
//! - byte decoding with `@charset`/protocol/environment encoding detection,
//! - a tokenizer producing a component value tree,
//! - a structural parser for declarations, qualified rules and at-rules,
//! - a color parser covering keywords, hex notation and the color functions,
//! - a serializer that round-trips trees back to equivalent CSS text.
//!
//! The engine is purely functional: every entry point takes an immutable
//! input and returns an owned tree, and errors are in-band parse-error
//! nodes rather than panics or results.

pub mod ast;
pub mod bytes;
pub mod colors;
pub mod errors;
pub mod json;
pub mod parser;
pub mod serializer;
pub mod tokenizer;
mod unicode;
pub mod utils;

pub use ast::{Node, NodeKind};
pub use bytes::parse_stylesheet_bytes;
pub use colors::{parse_color, Color, ColorSpace, ParsedColor};
pub use errors::ErrorKind;
pub use parser::{
    parse_blocks_contents, parse_declaration_list, parse_one_component_value,
    parse_one_declaration, parse_one_rule, parse_rule_list, parse_stylesheet, Input,
};
pub use serializer::{serialize, serialize_identifier, serialize_name, serialize_string_value};
pub use tokenizer::parse_component_value_list;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{node_to_json, nodes_to_json};
    use serde_json::json;
    use simple_logger::SimpleLogger;

    fn init_logging() {
        SimpleLogger::new().init().ok();
    }

    #[test]
    fn stylesheet_to_color_pipeline() {
        init_logging();

        let sheet = parse_stylesheet("#foo { color : #369 }", false, true);
        assert_eq!(sheet.len(), 1);

        let NodeKind::QualifiedRule { prelude, content } = &sheet[0].kind else {
            panic!("expected a qualified rule");
        };
        assert_eq!(node_to_json(&prelude[0]), json!(["hash", "foo", "id"]));

        let declarations = parse_blocks_contents(content.clone(), false, true);
        assert_eq!(declarations.len(), 1);
        let NodeKind::Declaration {
            lower_name,
            value,
            important,
            ..
        } = &declarations[0].kind
        else {
            panic!("expected a declaration");
        };
        assert_eq!(lower_name, "color");
        assert!(!important);

        let color_tokens: Vec<Node> = value
            .iter()
            .filter(|token| token.is_significant())
            .cloned()
            .collect();
        let Some(ParsedColor::Color(color)) = parse_color(color_tokens) else {
            panic!("expected a color");
        };
        assert_eq!(color.space, ColorSpace::Srgb);
        for (channel, expected) in color.params.iter().zip([0.2, 0.4, 0.6]) {
            assert!((channel - expected).abs() < 1e-6);
        }
        assert!((color.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn important_is_stripped_from_the_value() {
        let rules = parse_stylesheet("a { b: 1 ! important }", false, true);
        let NodeKind::QualifiedRule { content, .. } = &rules[0].kind else {
            panic!("expected a qualified rule");
        };

        let declarations = parse_blocks_contents(content.clone(), false, true);
        assert_eq!(
            nodes_to_json(&declarations),
            json!([[
                "declaration",
                "b",
                [" ", ["number", "1", 1, "integer"], " "],
                true
            ]])
        );
    }

    #[test]
    fn unterminated_comment_round_trips_closed() {
        let tokens = parse_component_value_list("/* foo ", false);
        assert_eq!(nodes_to_json(&tokens), json!([["comment", " foo "]]));
        assert_eq!(serialize(&tokens), "/* foo */");
    }

    #[test]
    fn tokenize_serialize_tokenize_is_stable() {
        for css in [
            "#foo { color : #369 }",
            "a { b: 1 ! important }",
            "@media (min-width: 10px) { a { color: rgb(1 2 3 / 0.5) } }",
            "x { y: url(\"q\") 1e3 2E-4 5.5px 50% U+1-5F; }",
            "bad { string: \"q\n; }",
        ] {
            let first = parse_component_value_list(css, false);
            let second = parse_component_value_list(&serialize(&first), false);
            let third = parse_component_value_list(&serialize(&second), false);
            assert_eq!(nodes_to_json(&first), nodes_to_json(&second), "css: {css}");
            assert_eq!(nodes_to_json(&second), nodes_to_json(&third), "css: {css}");
        }
    }

    #[test]
    fn ill_formed_bytes_never_panic() {
        // a CESU-8 encoded lone surrogate is not valid UTF-8; the decoder
        // substitutes replacement characters
        let (rules, _) = parse_stylesheet_bytes(b"@\xED\xB2\xA9 x;", None, None, true, true);
        assert_eq!(rules.len(), 1);
        let NodeKind::AtRule { at_keyword, .. } = &rules[0].kind else {
            panic!("expected an at-rule");
        };
        assert!(at_keyword.starts_with('\u{FFFD}'));

        let (text, _) = moss_shared::decode::decode_css_bytes(b"background:\xED\xB2\xA9", None, None);
        let declaration = parse_one_declaration(text.as_str(), true);
        let NodeKind::Declaration { value, .. } = &declaration.kind else {
            panic!("expected a declaration");
        };
        let significant: Vec<&Node> = value.iter().filter(|t| t.is_significant()).collect();
        assert_eq!(significant.len(), 1);
        let NodeKind::Ident { value: ident, .. } = &significant[0].kind else {
            panic!("expected an ident");
        };
        assert!(ident.chars().all(|c| c == '\u{FFFD}'));
    }

    #[test]
    fn rgb_channels_stay_unclamped_through_the_public_api() {
        let Some(ParsedColor::Color(color)) = parse_color("rgb(-10%, 120%, 0%)") else {
            panic!("expected a color");
        };
        for (channel, expected) in color.params.iter().zip([-0.1, 1.2, 0.0]) {
            assert!((channel - expected).abs() < 1e-6);
        }
        assert!((color.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hsl_space_and_conversion() {
        let Some(ParsedColor::Color(color)) = parse_color("hsl(120 50% 50%)") else {
            panic!("expected a color");
        };
        assert_eq!(color.space, ColorSpace::Hsl);

        let Some(srgb) = color.to(ColorSpace::Srgb) else {
            panic!("expected a conversion");
        };
        for (channel, expected) in srgb.params.iter().zip([0.25, 0.75, 0.25]) {
            assert!((channel - expected).abs() < 1e-6);
        }
    }
}
