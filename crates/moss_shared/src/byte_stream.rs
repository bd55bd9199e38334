use std::char::REPLACEMENT_CHARACTER;
use std::fmt::{self, Debug, Formatter};

pub const CHAR_LF: char = '\u{000A}';
pub const CHAR_CR: char = '\u{000D}';
pub const CHAR_FF: char = '\u{000C}';

/// A single element in the stream. Either a decoded character, or the end of
/// the stream. Note that characters are not the same as bytes: decoding has
/// already happened when a stream is filled, so a `Ch` always holds a whole
/// code point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    /// Standard unicode character
    Ch(char),
    /// Stream buffer is exhausted and closed
    StreamEnd,
}

use Character::*;

/// Converts the given character to a char. End-of-stream converts to 0x0000.
impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            StreamEnd => 0x0000 as char,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ch(ch) => write!(f, "{ch}"),
            StreamEnd => write!(f, "StreamEnd"),
        }
    }
}

impl Character {
    /// Returns true when the character is CSS whitespace (space, tab or a
    /// newline; other newline forms have been normalized to LF on load).
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Ch(' ' | '\t' | '\n'))
    }

    /// Returns true when the character is an ASCII digit
    pub fn is_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_digit())
    }

    /// Returns true when the character is an ASCII hexadecimal digit
    pub fn is_hex_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_hexdigit())
    }
}

/// Configuration structure for a character stream. The flags implement the
/// input preprocessing of the CSS syntax specification and are applied when
/// the stream is filled, not on every read.
pub struct Config {
    /// Replace any U+0000 NULL with U+FFFD
    pub replace_nulls: bool,
    /// Treat CRLF pairs as a single LF, and replace lone CR and FF with LF
    pub normalize_newlines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replace_nulls: true,
            normalize_newlines: true,
        }
    }
}

/// Stream of already-decoded characters, filled from a string. The buffer is
/// immutable once filled; reading only moves the position.
pub struct CharStream {
    /// Preprocessed characters
    buffer: Vec<char>,
    /// Position of the NEXT character to read
    position: usize,
    /// True when no more data will be added to the buffer
    closed: bool,
    /// Configuration for the stream
    config: Config,
}

impl Default for CharStream {
    fn default() -> Self {
        Self::new()
    }
}

impl CharStream {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
            closed: false,
            config,
        }
    }

    /// Fills the stream with the given string, applying the configured
    /// preprocessing substitutions.
    pub fn read_from_str(&mut self, data: &str) {
        let mut buffer = Vec::with_capacity(data.len());
        let mut chars = data.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\0' if self.config.replace_nulls => buffer.push(REPLACEMENT_CHARACTER),
                CHAR_CR if self.config.normalize_newlines => {
                    if chars.peek() == Some(&CHAR_LF) {
                        chars.next();
                    }
                    buffer.push(CHAR_LF);
                }
                CHAR_FF if self.config.normalize_newlines => buffer.push(CHAR_LF),
                _ => buffer.push(c),
            }
        }

        self.buffer = buffer;
        self.position = 0;
    }

    /// Closes the stream (no more data can be added)
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true when the stream is closed
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Returns true when all characters have been read
    pub fn eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Read the current character without advancing
    pub fn read(&self) -> Character {
        self.look_ahead(0)
    }

    /// Read the current character and advance to the next
    pub fn read_and_next(&mut self) -> Character {
        let c = self.read();
        if c != StreamEnd {
            self.position += 1;
        }
        c
    }

    /// Looks ahead in the stream. `look_ahead(0)` is the character the next
    /// read will return.
    pub fn look_ahead(&self, offset: usize) -> Character {
        match self.buffer.get(self.position + offset) {
            Some(c) => Ch(*c),
            None => StreamEnd,
        }
    }

    /// Advance by one character
    pub fn next(&mut self) {
        self.next_n(1);
    }

    /// Advance by the given number of characters
    pub fn next_n(&mut self, offset: usize) {
        self.position = (self.position + offset).min(self.buffer.len());
    }

    /// Current position in characters from the start of the stream
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Retrieves the source spelling between two character offsets
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.buffer.len());
        if start >= end {
            return String::new();
        }
        self.buffer[start..end].iter().collect()
    }
}

/// Location holds the position of an element in the source
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
    /// Character offset, starting with 0
    pub offset: usize,
}

impl Default for Location {
    /// Default to line 1, column 1
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Location {
    /// Create a new Location
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// LocationHandler is a wrapper that deals with line/column bookkeeping while
/// a stream is being read
pub struct LocationHandler {
    /// The start offset of the location. Normally this is 1:1, but can be
    /// different in case of inline streams
    pub start_location: Location,
    /// The current location of the stream
    pub cur_location: Location,
}

impl LocationHandler {
    /// Create a new LocationHandler. `start_location` can be set in case the
    /// stream does not start at 1:1.
    pub fn new(start_location: Location) -> Self {
        Self {
            start_location,
            cur_location: Location::default(),
        }
    }

    /// Will increase the current location based on the given character
    pub fn inc(&mut self, ch: Character) {
        match ch {
            Ch(CHAR_LF) => {
                self.cur_location.line += 1;
                self.cur_location.column = 1;
                self.cur_location.offset += 1;
            }
            Ch(_) => {
                self.cur_location.column += 1;
                self.cur_location.offset += 1;
            }
            StreamEnd => {}
        }
    }

    /// Returns the current absolute location, taking the start location into
    /// account
    pub fn location(&self) -> Location {
        let mut loc = Location::new(
            self.cur_location.line,
            self.cur_location.column,
            self.cur_location.offset,
        );
        if loc.line == 1 {
            loc.column += self.start_location.column - 1;
        }
        loc.line += self.start_location.line - 1;
        loc
    }
}
