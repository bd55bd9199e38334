//! CSS tokenizer according to the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Unlike a flat token stream, the tokenizer materializes the component value
//! tree directly: `{}` / `[]` / `()` blocks and functions own their content,
//! and the closing bracket of a block is not represented in it.

use moss_shared::byte_stream::Character::{Ch, StreamEnd};
use moss_shared::byte_stream::{CharStream, Character, Location, LocationHandler};

use crate::ast::{Node, NodeKind};
use crate::errors::ErrorKind;
use crate::unicode::UnicodeChar;

/// Tokenizer configuration as given by the caller
pub struct TokenizerConfig {
    /// Drop comment nodes from the produced tree
    pub skip_comments: bool,
    /// Produce unicode-range tokens for `U+…` sequences. When disabled the
    /// characters tokenize as idents and numbers instead.
    pub unicode_ranges: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            skip_comments: false,
            unicode_ranges: true,
        }
    }
}

/// Tokenizes the given text into a list of component values.
///
/// This is the tokenizer entry point every text-accepting parse function
/// goes through. `skip_comments` drops comment nodes from the whole tree.
pub fn parse_component_value_list(css: &str, skip_comments: bool) -> Vec<Node> {
    let mut stream = CharStream::new();
    stream.read_from_str(css);
    stream.close();

    let config = TokenizerConfig {
        skip_comments,
        ..Default::default()
    };

    Tokenizer::new(&mut stream, config, Location::default()).tokenize()
}

/// A block or function whose closer has not been seen yet. `parent` is the
/// token list the finished node will be appended to.
struct OpenBlock {
    parent: Vec<Node>,
    end_char: char,
    kind: OpenKind,
    location: Location,
}

enum OpenKind {
    Paren,
    Square,
    Curly,
    Function { name: String },
}

pub struct Tokenizer<'stream> {
    stream: &'stream mut CharStream,
    /// Line/column administration; the stream itself only counts characters
    location: LocationHandler,
    config: TokenizerConfig,
}

impl<'stream> Tokenizer<'stream> {
    /// Creates a new tokenizer on the given stream. The start location does
    /// not have to be 1:1, e.g. for inline style attributes.
    pub fn new(stream: &'stream mut CharStream, config: TokenizerConfig, start: Location) -> Self {
        Self {
            stream,
            location: LocationHandler::new(start),
            config,
        }
    }

    /// Consumes the whole stream and returns the component value tree. Any
    /// block still open at EOF is closed there.
    pub fn tokenize(&mut self) -> Vec<Node> {
        let mut tokens: Vec<Node> = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();

        loop {
            let loc = self.current_location();
            let c = match self.current_char() {
                Ch(c) => c,
                StreamEnd => break,
            };

            match c {
                ' ' | '\t' | '\n' => {
                    self.consume_whitespace();
                    tokens.push(Node::new_whitespace(loc));
                }
                'u' | 'U' if self.config.unicode_ranges && self.starts_unicode_range() => {
                    tokens.push(self.consume_unicode_range(loc));
                }
                // <!-- and --> must win from ident and number starts
                '-' if self.look_ahead_slice(3) == "-->" => {
                    self.consume_chars(3);
                    tokens.push(Node::new_literal("-->", loc));
                }
                _ if self.next_chars_start_ident_seq(0) => {
                    let value = self.consume_ident();

                    if self.current_char() != Ch('(') {
                        tokens.push(Node::new_ident(value, loc));
                        continue;
                    }

                    // consume '('
                    self.next_char();

                    if value.eq_ignore_ascii_case("url") && !self.url_argument_is_quoted() {
                        tokens.push(self.consume_url(loc));
                        continue;
                    }

                    stack.push(OpenBlock {
                        parent: std::mem::take(&mut tokens),
                        end_char: ')',
                        kind: OpenKind::Function { name: value },
                        location: loc,
                    });
                }
                _ if self.starts_number() => {
                    tokens.push(self.consume_numeric_token(loc));
                }
                '@' => {
                    // consume '@'
                    self.next_char();

                    if self.next_chars_start_ident_seq(0) {
                        tokens.push(Node::new_at_keyword(self.consume_ident(), loc));
                    } else {
                        tokens.push(Node::new_literal("@", loc));
                    }
                }
                '#' => {
                    // consume '#'
                    self.next_char();

                    if self.is_name_char(self.current_char()) || self.is_start_of_escape(0) {
                        let is_identifier = self.next_chars_start_ident_seq(0);
                        tokens.push(Node::new_hash(self.consume_ident(), is_identifier, loc));
                    } else {
                        tokens.push(Node::new_literal("#", loc));
                    }
                }
                '{' | '[' | '(' => {
                    self.next_char();

                    let (end_char, kind) = match c {
                        '{' => ('}', OpenKind::Curly),
                        '[' => (']', OpenKind::Square),
                        _ => (')', OpenKind::Paren),
                    };
                    stack.push(OpenBlock {
                        parent: std::mem::take(&mut tokens),
                        end_char,
                        kind,
                        location: loc,
                    });
                }
                '}' | ']' | ')' => {
                    self.next_char();

                    if stack.last().map(|open| open.end_char) == Some(c) {
                        if let Some(open) = stack.pop() {
                            let OpenBlock {
                                parent,
                                kind,
                                location,
                                ..
                            } = open;
                            let content = std::mem::replace(&mut tokens, parent);
                            tokens.push(Self::block_node(kind, content, location));
                        }
                        continue;
                    }

                    // A closer without a matching opener ends every open
                    // block; the stray closer is recorded where parsing
                    // resumes so that serialization reproduces it.
                    Self::unwind(&mut stack, &mut tokens);
                    if let Some(kind) = ErrorKind::for_closer(c) {
                        log::warn!("unmatched '{c}' at {loc:?}");
                        tokens.push(Node::new_parse_error(kind, format!("Unmatched {c}"), loc));
                    }
                }
                '"' | '\'' => {
                    tokens.push(self.consume_string_token(loc));
                }
                '/' if self.look_ahead_slice(2) == "/*" => {
                    let value = self.consume_comment();
                    if !self.config.skip_comments {
                        tokens.push(Node::new_comment(value, loc));
                    }
                }
                '<' if self.look_ahead_slice(4) == "<!--" => {
                    self.consume_chars(4);
                    tokens.push(Node::new_literal("<!--", loc));
                }
                '|' if self.look_ahead_slice(2) == "||" => {
                    self.consume_chars(2);
                    tokens.push(Node::new_literal("||", loc));
                }
                '~' | '|' | '^' | '$' | '*' if self.stream.look_ahead(1) == Ch('=') => {
                    let value = self.consume_chars(2);
                    tokens.push(Node::new_literal(&value, loc));
                }
                _ => {
                    self.next_char();
                    tokens.push(Node::new_literal(&c.to_string(), loc));
                }
            }
        }

        // EOF closes whatever is still open
        Self::unwind(&mut stack, &mut tokens);

        tokens
    }

    fn unwind(stack: &mut Vec<OpenBlock>, tokens: &mut Vec<Node>) {
        while let Some(open) = stack.pop() {
            let OpenBlock {
                parent,
                kind,
                location,
                ..
            } = open;
            let content = std::mem::replace(tokens, parent);
            tokens.push(Self::block_node(kind, content, location));
        }
    }

    fn block_node(kind: OpenKind, content: Vec<Node>, location: Location) -> Node {
        match kind {
            OpenKind::Paren => Node::new(NodeKind::ParenBlock { content }, location),
            OpenKind::Square => Node::new(NodeKind::SquareBlock { content }, location),
            OpenKind::Curly => Node::new(NodeKind::CurlyBlock { content }, location),
            OpenKind::Function { name } => Node::new_function(name, content, location),
        }
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Returns the text between `/*` and `*/`. A comment left open at EOF is
    /// closed there.
    fn consume_comment(&mut self) -> String {
        // consume '/*'
        self.consume_chars(2);

        let mut value = String::new();
        while !self.stream.eof() && self.look_ahead_slice(2) != "*/" {
            if let Ch(c) = self.next_char() {
                value.push(c);
            }
        }

        // consume '*/' (consumes nothing at EOF)
        self.consume_chars(2);

        value
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    ///
    /// Returns a number, percentage or dimension node. The exact source
    /// spelling of the numeric literal is kept as its representation.
    fn consume_numeric_token(&mut self, loc: Location) -> Node {
        let start = self.stream.tell();
        let is_integer = self.consume_number();
        let representation = self.stream.slice(start, self.stream.tell());

        let value = representation.parse::<f64>().unwrap_or(0.0);
        let int_value = if is_integer {
            // An `as` cast saturates, which is the best we can do for
            // integers a f64 cannot represent exactly anyway.
            Some(representation.parse::<i64>().unwrap_or(value as i64))
        } else {
            None
        };

        if self.next_chars_start_ident_seq(0) {
            let unit = self.consume_ident();
            Node::new_dimension(value, int_value, representation, unit, loc)
        } else if self.current_char() == Ch('%') {
            // consume '%'
            self.next_char();
            Node::new_percentage(value, int_value, representation, loc)
        } else {
            Node::new_number(value, int_value, representation, loc)
        }
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Consumes the numeric literal and returns whether it was syntactically
    /// an integer (no decimal point, no exponent).
    fn consume_number(&mut self) -> bool {
        let mut is_integer = true;

        if matches!(self.current_char(), Ch('+' | '-')) {
            self.next_char();
        }
        self.consume_digits();

        if self.current_char() == Ch('.') && self.stream.look_ahead(1).is_digit() {
            self.consume_chars(2);
            self.consume_digits();
            is_integer = false;
        }

        let c1 = self.current_char();
        let c2 = self.stream.look_ahead(1);
        let c3 = self.stream.look_ahead(2);
        if matches!(c1, Ch('e' | 'E'))
            && (c2.is_digit() || (matches!(c2, Ch('+' | '-')) && c3.is_digit()))
        {
            // consume 'e' and the sign or first digit
            self.consume_chars(2);
            self.consume_digits();
            is_integer = false;
        }

        is_integer
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Returns a string node, or a bad-string parse error on an unescaped
    /// newline. The newline itself is not consumed. EOF closes the string.
    fn consume_string_token(&mut self, loc: Location) -> Node {
        // consume the opening quote
        let ending = self.next_char();
        let mut value = String::new();

        loop {
            let c = self.current_char();
            if c == ending {
                self.next_char();
                break;
            }

            match c {
                StreamEnd => break,
                Ch('\n') => {
                    log::warn!("newline in string at {loc:?}");
                    return Node::new_parse_error(
                        ErrorKind::BadString,
                        "Newline in string".to_string(),
                        loc,
                    );
                }
                Ch('\\') => match self.stream.look_ahead(1) {
                    // escaped newlines continue the string on the next line
                    Ch('\n') => {
                        self.consume_chars(2);
                    }
                    // a backslash at EOF is dropped
                    StreamEnd => {
                        self.next_char();
                    }
                    _ => {
                        self.next_char();
                        value.push(self.consume_escaped_char());
                    }
                },
                Ch(c) => {
                    value.push(c);
                    self.next_char();
                }
            }
        }

        Node::new_string(value, loc)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-a-url-token)
    ///
    /// Assumes `url(` was just consumed and the argument is not quoted.
    /// Returns either a url node or a bad-url parse error.
    fn consume_url(&mut self, loc: Location) -> Node {
        let mut url = String::new();

        self.consume_whitespace();

        loop {
            let c = self.current_char();
            match c {
                // EOF closes the url; a recoverable parse error upstream
                StreamEnd => break,
                Ch(')') => {
                    self.next_char();
                    break;
                }
                _ if c.is_whitespace() => {
                    // only trailing whitespace is allowed before the ')'
                    self.consume_whitespace();
                    match self.current_char() {
                        Ch(')') => {
                            self.next_char();
                        }
                        StreamEnd => {}
                        _ => return self.consume_remnants_of_bad_url(loc),
                    }
                    break;
                }
                Ch('"' | '\'' | '(') => return self.consume_remnants_of_bad_url(loc),
                _ if self.is_non_printable_char() => return self.consume_remnants_of_bad_url(loc),
                Ch('\\') => {
                    if self.is_start_of_escape(0) {
                        self.next_char();
                        url.push(self.consume_escaped_char());
                    } else {
                        return self.consume_remnants_of_bad_url(loc);
                    }
                }
                Ch(c) => {
                    url.push(c);
                    self.next_char();
                }
            }
        }

        Node::new_url(url, loc)
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// Consumes enough of the stream to reach a recovery point where normal
    /// tokenizing can resume: the next `)` or EOF. Escaped closers do not
    /// count.
    fn consume_remnants_of_bad_url(&mut self, loc: Location) -> Node {
        loop {
            match self.current_char() {
                StreamEnd => break,
                Ch(')') => {
                    self.next_char();
                    break;
                }
                Ch('\\') if self.is_start_of_escape(0) => {
                    self.next_char();
                    self.consume_escaped_char();
                }
                _ => {
                    self.next_char();
                }
            }
        }

        log::warn!("bad url at {loc:?}");
        Node::new_parse_error(ErrorKind::BadUrl, "Invalid URL token".to_string(), loc)
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point)
    ///
    /// Assumes the `\` was consumed and a valid escape follows. One to six
    /// hex digits with an optional single trailing whitespace produce a code
    /// point; zero, surrogate and out-of-range values produce U+FFFD; any
    /// other character is taken verbatim.
    fn consume_escaped_char(&mut self) -> char {
        if !self.current_char().is_hex_digit() {
            return match self.next_char() {
                Ch(c) => c,
                StreamEnd => UnicodeChar::REPLACEMENT_CHARACTER,
            };
        }

        let (value, _) = self.consume_hex_digits(6);
        if self.current_char().is_whitespace() {
            self.next_char();
        }

        match char::from_u32(value) {
            Some(c) if value != 0 => c,
            _ => UnicodeChar::REPLACEMENT_CHARACTER,
        }
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// The caller must have checked that the stream starts with an ident
    /// sequence (or, for hashes, a name).
    fn consume_ident(&mut self) -> String {
        let mut value = String::new();

        loop {
            match self.current_char() {
                c @ Ch(ch) if self.is_name_char(c) => {
                    value.push(ch);
                    self.next_char();
                }
                Ch('\\') if self.is_start_of_escape(0) => {
                    self.next_char();
                    value.push(self.consume_escaped_char());
                }
                _ => break,
            }
        }

        value
    }

    /// Consumes `u+` and the range that follows (§4.2.3 of css-syntax).
    /// `?` digits read as 0 for the start of the range and as F for the end.
    fn consume_unicode_range(&mut self, loc: Location) -> Node {
        const MAX_CODE_POINT: u32 = UnicodeChar::MAX_ALLOWED as u32;

        // consume 'u+'
        self.consume_chars(2);

        let (mut start, digits) = self.consume_hex_digits(6);
        let mut question_marks = 0u32;
        while digits + (question_marks as usize) < 6 && self.current_char() == Ch('?') {
            question_marks += 1;
            self.next_char();
        }

        let end = if question_marks > 0 {
            let span = 16u32.pow(question_marks);
            start *= span;
            start + span - 1
        } else if self.current_char() == Ch('-') && self.stream.look_ahead(1).is_hex_digit() {
            // consume '-'
            self.next_char();
            let (end, _) = self.consume_hex_digits(6);
            end
        } else {
            start
        };

        if start > MAX_CODE_POINT || end < start {
            return Node::new_parse_error(
                ErrorKind::Invalid,
                "Invalid unicode range".to_string(),
                loc,
            );
        }

        Node::new_unicode_range(start, end.min(MAX_CODE_POINT), loc)
    }

    fn consume_hex_digits(&mut self, max: usize) -> (u32, usize) {
        let mut value = 0;
        let mut count = 0;

        while count < max {
            match self.current_char() {
                Ch(c) if c.is_ascii_hexdigit() => {
                    value = value * 16 + c.to_digit(16).unwrap_or(0);
                    count += 1;
                    self.next_char();
                }
                _ => break,
            }
        }

        (value, count)
    }

    fn consume_digits(&mut self) {
        while self.current_char().is_digit() {
            self.next_char();
        }
    }

    fn consume_whitespace(&mut self) {
        while self.current_char().is_whitespace() {
            self.next_char();
        }
    }

    fn consume_chars(&mut self, mut len: usize) -> String {
        let mut value = String::new();

        while len > 0 {
            if let Ch(c) = self.next_char() {
                value.push(c);
            }
            len -= 1;
        }

        value
    }

    /// [ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
    fn is_ident_start(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
    }

    /// [ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
    fn is_name_char(&self, c: Character) -> bool {
        matches!(c, Ch(c) if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
    }

    /// def: [non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
    fn is_non_printable_char(&self) -> bool {
        if let Ch(c) = self.current_char() {
            c <= UnicodeChar::BACKSPACE
                || c == UnicodeChar::LINE_TABULATION
                || (UnicodeChar::SHIFT_OUT..=UnicodeChar::INFORMATION_SEPARATOR_ONE).contains(&c)
                || c == UnicodeChar::DELETE
        } else {
            false
        }
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_start_of_escape(&self, start: usize) -> bool {
        self.stream.look_ahead(start) == Ch('\\') && self.stream.look_ahead(start + 1) != Ch('\n')
    }

    /// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#check-if-three-code-points-would-start-an-ident-sequence)
    fn next_chars_start_ident_seq(&self, start: usize) -> bool {
        let first = self.stream.look_ahead(start);
        let second = self.stream.look_ahead(start + 1);

        match first {
            Ch('-') => {
                matches!(second, Ch(c) if self.is_ident_start(c))
                    || second == Ch('-')
                    || self.is_start_of_escape(start + 1)
            }
            Ch('\\') => self.is_start_of_escape(start),
            Ch(c) => self.is_ident_start(c),
            StreamEnd => false,
        }
    }

    /// True for `u`/`U` followed by `+` and a hex digit or `?`
    fn starts_unicode_range(&self) -> bool {
        self.stream.look_ahead(1) == Ch('+')
            && matches!(self.stream.look_ahead(2), Ch(c) if c.is_ascii_hexdigit() || c == '?')
    }

    /// True when the stream starts a numeric literal: a digit, `.` followed
    /// by a digit, or a sign followed by a digit or `.`-digit
    fn starts_number(&self) -> bool {
        let c1 = self.current_char();
        let c2 = self.stream.look_ahead(1);
        let c3 = self.stream.look_ahead(2);

        match c1 {
            _ if c1.is_digit() => true,
            Ch('.') => c2.is_digit(),
            Ch('+' | '-') => c2.is_digit() || (c2 == Ch('.') && c3.is_digit()),
            _ => false,
        }
    }

    /// Peeks past whitespace after `url(` for a quote character
    fn url_argument_is_quoted(&self) -> bool {
        let mut offset = 0;
        while self.stream.look_ahead(offset).is_whitespace() {
            offset += 1;
        }
        matches!(self.stream.look_ahead(offset), Ch('"' | '\''))
    }

    fn current_char(&self) -> Character {
        self.stream.look_ahead(0)
    }

    /// Reads the next character and keeps the location administration up to
    /// date
    fn next_char(&mut self) -> Character {
        let c = self.stream.read_and_next();
        self.location.inc(c);
        c
    }

    fn look_ahead_slice(&self, len: usize) -> String {
        let mut s = String::new();

        for i in 0..len {
            match self.stream.look_ahead(i) {
                Ch(c) => s.push(c),
                StreamEnd => break,
            }
        }

        s
    }

    fn current_location(&self) -> Location {
        self.location.location()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json::nodes_to_json;
    use serde_json::json;

    fn tokenize(css: &str) -> Vec<Node> {
        parse_component_value_list(css, false)
    }

    #[test]
    fn parse_idents_and_functions() {
        let cases = vec![
            ("red", json!([["ident", "red"]])),
            ("-ident", json!([["ident", "-ident"]])),
            ("--custom", json!([["ident", "--custom"]])),
            ("_123-ident", json!([["ident", "_123-ident"]])),
            ("\\26 b", json!([["ident", "&b"]])),
            ("rgb(", json!([["function", "rgb"]])),
            ("rgb()", json!([["function", "rgb"]])),
            ("rgbâ(1)", json!([["function", "rgbâ", ["number", "1", 1, "integer"]]])),
            ("rgba (", json!([["ident", "rgba"], " ", ["()"]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_numeric_tokens() {
        let cases = vec![
            ("12", json!([["number", "12", 12, "integer"]])),
            ("+34", json!([["number", "+34", 34, "integer"]])),
            ("-56", json!([["number", "-56", -56, "integer"]])),
            ("7.8", json!([["number", "7.8", 7.8, "number"]])),
            (".5", json!([["number", ".5", 0.5, "number"]])),
            ("1e3", json!([["number", "1e3", 1000.0, "number"]])),
            ("1E-3", json!([["number", "1E-3", 0.001, "number"]])),
            ("1.1rem", json!([["dimension", "1.1", 1.1, "number", "rem"]])),
            ("100%", json!([["percentage", "100", 100, "integer"]])),
            ("1 em", json!([["number", "1", 1, "integer"], " ", ["ident", "em"]])),
            // the unit may be escaped, even to an 'e'
            ("3\\65 m", json!([["dimension", "3", 3, "integer", "em"]])),
            (".", json!(["."])),
            ("+a", json!(["+", ["ident", "a"]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_hashes() {
        let cases = vec![
            ("#red0", json!([["hash", "red0", "id"]])),
            ("#-Red", json!([["hash", "-Red", "id"]])),
            ("#0red", json!([["hash", "0red", "unrestricted"]])),
            ("#\\.red", json!([["hash", ".red", "id"]])),
            ("#", json!(["#"])),
            ("# a", json!(["#", " ", ["ident", "a"]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_at_keywords() {
        let cases = vec![
            ("@media", json!([["at-keyword", "media"]])),
            ("@--x", json!([["at-keyword", "--x"]])),
            (
                "@0media",
                json!(["@", ["dimension", "0", 0, "integer", "media"]]),
            ),
            ("@ m", json!(["@", " ", ["ident", "m"]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_strings() {
        let cases = vec![
            ("\"double\"", json!([["string", "double"]])),
            ("'single'", json!([["string", "single"]])),
            ("\"other 'quote'\"", json!([["string", "other 'quote'"]])),
            ("\"\"", json!([["string", ""]])),
            ("\"eof", json!([["string", "eof"]])),
            ("\"esc\\aped\"", json!([["string", "esc\u{a}ped"]])),
            ("\"a\\\nb\"", json!([["string", "ab"]])),
            (
                "\"bad\nstring",
                json!([["error", "bad-string"], " ", ["ident", "string"]]),
            ),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_urls() {
        let cases = vec![
            ("url(https://moss.dev/)", json!([["url", "https://moss.dev/"]])),
            ("url(  moss.dev   )", json!([["url", "moss.dev"]])),
            ("url()", json!([["url", ""]])),
            ("url( )", json!([["url", ""]])),
            ("url(eof", json!([["url", "eof"]])),
            ("url(\\))", json!([["url", ")"]])),
            // quoted urls take the function path
            ("url('a')", json!([["function", "url", ["string", "a"]]])),
            ("url( 'a' )", json!([["function", "url", " ", ["string", "a"], " "]])),
            ("URL(x)", json!([["url", "x"]])),
            ("url(a b)", json!([["error", "bad-url"]])),
            ("url(a\u{0001})x", json!([["error", "bad-url"], ["ident", "x"]])),
            ("url(a(b)x", json!([["error", "bad-url"], ["ident", "x"]])),
            ("url('a\nb')", json!([["function", "url", ["error", "bad-string"], " ", ["ident", "b"], ["string", ")"]]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_unicode_ranges() {
        let cases = vec![
            ("u+26", json!([["unicode-range", 0x26, 0x26]])),
            ("U+0-7F", json!([["unicode-range", 0, 0x7F]])),
            ("U+45A-1002", json!([["unicode-range", 0x45A, 0x1002]])),
            ("U+3??", json!([["unicode-range", 0x300, 0x3FF]])),
            // ?????? overflows the unicode maximum; the end is clamped
            ("U+??????", json!([["unicode-range", 0, 0x0010_FFFF]])),
            ("U+10-5", json!([["error", "invalid"]])),
            // no hex digit or '?' after the '+': plain ident and delim
            ("u+g", json!([["ident", "u"], "+", ["ident", "g"]])),
            ("u1", json!([["ident", "u1"]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn unicode_ranges_can_be_disabled() {
        let mut stream = CharStream::new();
        stream.read_from_str("u+26");
        stream.close();

        let config = TokenizerConfig {
            skip_comments: false,
            unicode_ranges: false,
        };
        let tokens = Tokenizer::new(&mut stream, config, Location::default()).tokenize();

        assert_eq!(
            nodes_to_json(&tokens),
            json!([["ident", "u"], ["number", "+26", 38, "integer"]])
        );
    }

    #[test]
    fn parse_blocks_and_nesting() {
        let cases = vec![
            ("{}", json!([["{}"]])),
            ("[a]", json!([["[]", ["ident", "a"]]])),
            ("(1)", json!([["()", ["number", "1", 1, "integer"]]])),
            (
                "{ [a] (b) }",
                json!([[
                    "{}",
                    " ",
                    ["[]", ["ident", "a"]],
                    " ",
                    ["()", ["ident", "b"]],
                    " "
                ]]),
            ),
            // EOF closes open blocks
            ("{[", json!([["{}", ["[]"]]])),
            // a stray closer unwinds the open blocks and is kept in-band
            ("}", json!([["error", "}"]])),
            ("{)x", json!([["{}"], ["error", ")"], ["ident", "x"]])),
            ("f(a,1)", json!([[
                "function",
                "f",
                ["ident", "a"],
                ",",
                ["number", "1", 1, "integer"]
            ]])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn parse_comments_and_cdx() {
        let cases = vec![
            ("/* note */", json!([["comment", " note "]])),
            ("/* open", json!([["comment", " open"]])),
            ("/**/", json!([["comment", ""]])),
            ("<!-- -->", json!(["<!--", " ", "-->"])),
            ("a<!--b", json!([["ident", "a"], "<!--", ["ident", "b"]])),
            ("/ *", json!(["/", " ", "*"])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }

        assert_eq!(
            nodes_to_json(&parse_component_value_list("a/*x*/b", true)),
            json!([["ident", "a"], ["ident", "b"]])
        );
    }

    #[test]
    fn parse_multi_char_literals() {
        let cases = vec![
            ("~=", json!(["~="])),
            ("|=", json!(["|="])),
            ("^=", json!(["^="])),
            ("$=", json!(["$="])),
            ("*=", json!(["*="])),
            ("||", json!(["||"])),
            ("|||", json!(["||", "|"])),
            ("~", json!(["~"])),
            ("; : ,", json!([";", " ", ":", " ", ","])),
        ];

        for (css, expected) in cases {
            assert_eq!(nodes_to_json(&tokenize(css)), expected, "css: {css}");
        }
    }

    #[test]
    fn backslash_before_newline_is_a_delimiter() {
        let tokens = tokenize("\\\nfoo");
        assert_eq!(
            nodes_to_json(&tokens),
            json!(["\\", " ", ["ident", "foo"]])
        );
    }

    #[test]
    fn token_positions() {
        let tokens = tokenize("a {\n  b: url(x);\n}");

        assert_eq!(tokens[0].location, Location::new(1, 1, 0));
        // the block starts at its '{'
        assert_eq!(tokens[2].location, Location::new(1, 3, 2));

        let NodeKind::CurlyBlock { content } = &tokens[2].kind else {
            panic!("expected a block");
        };
        // 'b' on line 2, column 3
        assert_eq!(content[1].location, Location::new(2, 3, 6));
        // url(x) on line 2, column 6
        assert_eq!(content[4].location, Location::new(2, 6, 9));
    }

    #[test]
    fn positions_are_monotonic() {
        let tokens = tokenize("a b { c: 1px } /* x */ @media {}");
        let mut previous = Location::new(1, 1, 0);
        for token in &tokens {
            assert!(token.location.offset >= previous.offset);
            assert!(
                (token.location.line, token.location.column)
                    >= (previous.line, previous.column)
            );
            previous = token.location;
        }
    }

    #[test]
    fn null_and_surrogate_free_output() {
        // NUL is replaced before tokenization
        let tokens = tokenize("a\0b");
        assert_eq!(nodes_to_json(&tokens), json!([["ident", "a\u{FFFD}b"]]));

        // an escape above the unicode maximum becomes the replacement char
        let tokens = tokenize("\\110000 x");
        assert_eq!(nodes_to_json(&tokens), json!([["ident", "\u{FFFD}x"]]));

        // an escaped surrogate too
        let tokens = tokenize("\\d800 x");
        assert_eq!(nodes_to_json(&tokens), json!([["ident", "\u{FFFD}x"]]));
    }
}
