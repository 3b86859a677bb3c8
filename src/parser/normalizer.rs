//! Lexical normalizer for shell argument text
//!
//! Rewrites the permissive shell dialect into strict JSON in a single
//! left-to-right pass:
//!
//! - single-quoted strings become double-quoted strings
//! - unquoted and `$`-prefixed object keys are quoted
//! - trailing commas before `}`, `]` or end of input are dropped
//! - typed-literal constructors are rewritten into extended JSON
//!
//! String contents are copied through untouched. Comma handling, key quoting
//! and literal recognition only happen in the `Structure` state, which is what
//! keeps text like `"end, }"` or `"ObjectId(1)"` inside a string intact.
//!
//! The normalizer never fails. Text it cannot make sense of is copied as-is
//! and rejected later by the JSON parser.

use crate::parser::literals;

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal
    Structure,
    /// Inside a `"..."` literal
    DoubleQuoted,
    /// Inside a `'...'` literal
    SingleQuoted,
}

/// Normalize shell argument text into strict JSON text
///
/// # Arguments
/// * `input` - Raw argument text, e.g. `{name: 'Alice', tags: ['a',],}`
///
/// # Returns
/// * `String` - Normalized text, e.g. `{"name": "Alice","tags": ["a"]}`
pub fn normalize(input: &str) -> String {
    Normalizer::new(input).run().text
}

/// Normalizer output with a structural balance flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Normalized {
    pub text: String,

    /// Brackets never closed below depth zero, all opened brackets were
    /// closed, and no string literal was left open
    pub balanced: bool,
}

/// Normalize and report whether the input was structurally balanced
pub(crate) fn normalize_checked(input: &str) -> Normalized {
    Normalizer::new(input).run()
}

struct Normalizer {
    input: Vec<char>,
    pos: usize,
    out: String,
    state: ScanState,
    depth: i32,
    underflow: bool,
}

impl Normalizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            out: String::with_capacity(input.len() + 16),
            state: ScanState::Structure,
            depth: 0,
            underflow: false,
        }
    }

    fn run(mut self) -> Normalized {
        while let Some(ch) = self.current() {
            match self.state {
                ScanState::Structure => self.scan_structure(ch),
                ScanState::DoubleQuoted => self.scan_double_quoted(ch),
                ScanState::SingleQuoted => self.scan_single_quoted(ch),
            }
        }

        let balanced = self.state == ScanState::Structure && self.depth == 0 && !self.underflow;
        if !balanced {
            tracing::trace!(
                state = ?self.state,
                depth = self.depth,
                underflow = self.underflow,
                "normalizer reached end of input with unbalanced structure"
            );
        }
        tracing::trace!(output = %self.out, "normalized arguments");

        Normalized {
            text: self.out,
            balanced,
        }
    }

    fn scan_structure(&mut self, ch: char) {
        match ch {
            '"' => {
                self.out.push('"');
                self.pos += 1;
                self.state = ScanState::DoubleQuoted;
            }
            '\'' => {
                self.out.push('"');
                self.pos += 1;
                self.state = ScanState::SingleQuoted;
            }
            '{' => {
                self.out.push('{');
                self.pos += 1;
                self.depth += 1;
                self.quote_key();
            }
            '[' => {
                self.out.push('[');
                self.pos += 1;
                self.depth += 1;
            }
            '}' | ']' => {
                self.out.push(ch);
                self.pos += 1;
                self.depth -= 1;
                if self.depth < 0 {
                    self.underflow = true;
                }
            }
            ',' => self.scan_comma(),
            _ => match literals::try_match(&self.input[self.pos..]) {
                Some(m) => {
                    self.out.push_str(&m.replacement);
                    self.pos += m.consumed;
                }
                None => {
                    self.out.push(ch);
                    self.pos += 1;
                }
            },
        }
    }

    fn scan_double_quoted(&mut self, ch: char) {
        self.pos += 1;
        match ch {
            '\\' => {
                if let Some(escaped) = self.current() {
                    self.push_escaped(escaped);
                    self.pos += 1;
                } else {
                    self.out.push('\\');
                }
            }
            '"' => {
                self.out.push('"');
                self.state = ScanState::Structure;
            }
            _ => self.push_string_char(ch),
        }
    }

    fn scan_single_quoted(&mut self, ch: char) {
        self.pos += 1;
        match ch {
            '\\' => match self.current() {
                Some('\'') => {
                    self.out.push('\'');
                    self.pos += 1;
                }
                Some(escaped) => {
                    self.push_escaped(escaped);
                    self.pos += 1;
                }
                None => self.out.push('\\'),
            },
            '\'' => {
                self.out.push('"');
                self.state = ScanState::Structure;
            }
            '"' => self.out.push_str("\\\""),
            _ => self.push_string_char(ch),
        }
    }

    /// Copy the character after a backslash
    ///
    /// A backslash before a raw control character is dropped and the
    /// character itself is escaped.
    fn push_escaped(&mut self, escaped: char) {
        if escaped.is_control() {
            self.push_string_char(escaped);
        } else {
            self.out.push('\\');
            self.out.push(escaped);
        }
    }

    /// Copy one character of string content, escaping control characters
    fn push_string_char(&mut self, ch: char) {
        match ch {
            '\t' => self.out.push_str("\\t"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            c if c.is_control() => self.out.push_str(&format!("\\u{:04x}", c as u32)),
            c => self.out.push(c),
        }
    }

    /// Handle a comma in structural context
    ///
    /// A comma followed only by whitespace and then `}`, `]` or the end of
    /// input is dropped along with the whitespace. The closing character is
    /// left for the main loop.
    fn scan_comma(&mut self) {
        let next = self.skip_whitespace_from(self.pos + 1);
        match self.input.get(next) {
            Some('}' | ']') | None => self.pos = next,
            Some(_) => {
                self.out.push(',');
                self.pos += 1;
                self.quote_key();
            }
        }
    }

    /// Quote a bare object key at the current position, if there is one
    ///
    /// Skips whitespace, then looks for `[A-Za-z_$][A-Za-z0-9_$]*` followed by
    /// optional whitespace and `:`. Outside objects the pattern simply never
    /// matches, since array elements and values are not followed by `:`.
    fn quote_key(&mut self) {
        self.pos = self.skip_whitespace_from(self.pos);

        let start = self.pos;
        if !self.input.get(start).copied().is_some_and(is_key_start) {
            return;
        }

        let mut end = start + 1;
        while self.input.get(end).copied().is_some_and(is_key_char) {
            end += 1;
        }

        let colon = self.skip_whitespace_from(end);
        if self.input.get(colon) != Some(&':') {
            return;
        }

        self.out.push('"');
        self.out.extend(&self.input[start..end]);
        self.out.push_str("\":");
        self.pos = colon + 1;
    }

    fn skip_whitespace_from(&self, mut pos: usize) -> usize {
        while self.input.get(pos).is_some_and(|c| c.is_whitespace()) {
            pos += 1;
        }
        pos
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }
}

fn is_key_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
