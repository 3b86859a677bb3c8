//! Typed-literal recognizer
//!
//! Recognizes shell constructor calls such as `ObjectId("...")`,
//! `new Date('...')` or `NumberLong(42)` at a structural scan position and
//! rewrites them into extended-JSON text that a standard JSON parser accepts:
//!
//! | Constructor                  | Replacement               |
//! |------------------------------|---------------------------|
//! | `ObjectId`, `ObjectID`       | `{"$oid":"<hex>"}`        |
//! | `ISODate`, `Date`            | `{"$date":"<iso>"}`       |
//! | `NumberLong`                 | `{"$numberLong":"<n>"}`   |
//! | `NumberInt`                  | plain numeral             |
//!
//! Matching is anchored at the start of the input slice. The caller (the
//! normalizer) only invokes it outside string literals, which keeps
//! constructor-shaped text inside strings untouched.

/// Kind of literal a constructor produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    Identifier,
    Instant,
    Int64,
    Int32,
}

/// Constructor names in match order.
const CONSTRUCTORS: &[(&str, LiteralKind)] = &[
    ("ObjectId", LiteralKind::Identifier),
    ("ObjectID", LiteralKind::Identifier),
    ("ISODate", LiteralKind::Instant),
    ("Date", LiteralKind::Instant),
    ("NumberLong", LiteralKind::Int64),
    ("NumberInt", LiteralKind::Int32),
];

/// Successful constructor match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch {
    /// Extended-JSON text replacing the constructor call
    pub replacement: String,

    /// Number of input characters consumed
    pub consumed: usize,
}

/// Try to match a typed-literal constructor at the start of `input`
///
/// # Arguments
/// * `input` - Remaining characters from the current scan position
///
/// # Returns
/// * `Option<LiteralMatch>` - Replacement text and consumed length, or `None`
pub fn try_match(input: &[char]) -> Option<LiteralMatch> {
    // Cheap reject: every constructor starts with 'n' (new), 'O', 'I', 'D' or 'N'.
    if !matches!(input.first(), Some('n' | 'O' | 'I' | 'D' | 'N')) {
        return None;
    }

    CONSTRUCTORS
        .iter()
        .find_map(|&(name, kind)| Cursor::new(input).constructor(name, kind))
}

/// Character cursor used while matching a single constructor pattern
struct Cursor<'a> {
    input: &'a [char],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [char]) -> Self {
        Self { input, pos: 0 }
    }

    /// Match `[new <ws>+] <name> ( <ws>* <arg> <ws>* )`
    fn constructor(mut self, name: &str, kind: LiteralKind) -> Option<LiteralMatch> {
        self.new_keyword();

        if !self.keyword(name) || !self.eat('(') {
            return None;
        }
        self.skip_whitespace();

        let replacement = match kind {
            LiteralKind::Identifier => format!("{{\"$oid\":\"{}\"}}", self.quoted()?),
            LiteralKind::Instant => format!("{{\"$date\":\"{}\"}}", self.quoted()?),
            LiteralKind::Int64 => {
                format!("{{\"$numberLong\":\"{}\"}}", self.optionally_quoted_integer()?)
            }
            LiteralKind::Int32 => {
                let digits = self.optionally_quoted_integer()?;
                digits.parse::<i32>().ok()?.to_string()
            }
        };

        self.skip_whitespace();
        if !self.eat(')') {
            return None;
        }

        Some(LiteralMatch {
            replacement,
            consumed: self.pos,
        })
    }

    /// Consume an optional `new` keyword followed by at least one whitespace
    fn new_keyword(&mut self) {
        let start = self.pos;
        if self.keyword("new") && self.peek().is_some_and(char::is_whitespace) {
            self.skip_whitespace();
        } else {
            self.pos = start;
        }
    }

    /// Consume `word` exactly (case-sensitive)
    fn keyword(&mut self, word: &str) -> bool {
        let len = word.chars().count();
        let matched = self
            .input
            .get(self.pos..self.pos + len)
            .is_some_and(|slice| slice.iter().copied().eq(word.chars()));
        if matched {
            self.pos += len;
        }
        matched
    }

    /// Consume a quoted string argument and return its contents
    ///
    /// Contents containing quotes, backslashes or control characters are
    /// rejected so the replacement stays valid JSON without re-escaping.
    fn quoted(&mut self) -> Option<String> {
        let quote = self.peek().filter(|c| matches!(c, '"' | '\''))?;
        self.pos += 1;

        let mut value = String::new();
        loop {
            match self.peek()? {
                c if c == quote => {
                    self.pos += 1;
                    return Some(value);
                }
                '"' | '\'' | '\\' => return None,
                c if c.is_control() => return None,
                c => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Consume `[+-]?digits`, optionally wrapped in matching quotes
    ///
    /// A leading `+` is dropped from the returned text.
    fn optionally_quoted_integer(&mut self) -> Option<String> {
        let quote = self.peek().filter(|c| matches!(c, '"' | '\''));
        if quote.is_some() {
            self.pos += 1;
        }

        let mut value = String::new();
        match self.peek()? {
            '-' => {
                value.push('-');
                self.pos += 1;
            }
            '+' => self.pos += 1,
            _ => {}
        }

        let digits_start = self.pos;
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            value.push(c);
            self.pos += 1;
        }
        if self.pos == digits_start {
            return None;
        }

        if let Some(q) = quote
            && !self.eat(q)
        {
            return None;
        }

        Some(value)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(input: &str) -> Option<(String, usize)> {
        let chars: Vec<char> = input.chars().collect();
        try_match(&chars).map(|m| (m.replacement, m.consumed))
    }

    #[test]
    fn test_object_id() {
        let (replacement, consumed) =
            matched(r#"ObjectId("507f1f77bcf86cd799439011")"#).unwrap();
        assert_eq!(replacement, r#"{"$oid":"507f1f77bcf86cd799439011"}"#);
        assert_eq!(consumed, 36);
    }

    #[test]
    fn test_object_id_spellings() {
        let expected = r#"{"$oid":"507f1f77bcf86cd799439011"}"#;
        for input in [
            "ObjectID('507f1f77bcf86cd799439011')",
            "new ObjectId('507f1f77bcf86cd799439011')",
            "new  ObjectID( \"507f1f77bcf86cd799439011\" )",
        ] {
            assert_eq!(matched(input).unwrap().0, expected, "input: {input}");
        }
    }

    #[test]
    fn test_consumed_stops_at_closing_paren() {
        let (_, consumed) = matched("ISODate('2024-01-15T10:30:00Z') }").unwrap();
        assert_eq!(consumed, "ISODate('2024-01-15T10:30:00Z')".len());
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            matched("ISODate('2024-01-15T10:30:00Z')").unwrap().0,
            r#"{"$date":"2024-01-15T10:30:00Z"}"#
        );
        assert_eq!(
            matched("new Date(\"2024-01-15\")").unwrap().0,
            r#"{"$date":"2024-01-15"}"#
        );
    }

    #[test]
    fn test_number_long() {
        assert_eq!(
            matched("NumberLong(42)").unwrap().0,
            r#"{"$numberLong":"42"}"#
        );
        assert_eq!(
            matched("NumberLong('-9007199254740993')").unwrap().0,
            r#"{"$numberLong":"-9007199254740993"}"#
        );
        assert_eq!(
            matched("new NumberLong(+7)").unwrap().0,
            r#"{"$numberLong":"7"}"#
        );
    }

    #[test]
    fn test_number_int_is_plain() {
        assert_eq!(matched("NumberInt(5)").unwrap().0, "5");
        assert_eq!(matched("NumberInt('-12')").unwrap().0, "-12");
        assert_eq!(matched("NumberInt(007)").unwrap().0, "7");
        assert!(matched("NumberInt(3000000000)").is_none());
    }

    #[test]
    fn test_new_requires_whitespace() {
        assert!(matched("newObjectId('507f1f77bcf86cd799439011')").is_none());
    }

    #[test]
    fn test_case_sensitive() {
        assert!(matched("objectid('507f1f77bcf86cd799439011')").is_none());
        assert!(matched("New Date('2024-01-01')").is_none());
        assert!(matched("numberLong(1)").is_none());
    }

    #[test]
    fn test_rejects_malformed_calls() {
        assert!(matched("ObjectId").is_none());
        assert!(matched("ObjectId()").is_none());
        assert!(matched("ObjectId(123)").is_none());
        assert!(matched("ObjectId('abc\"def')").is_none());
        assert!(matched("ObjectId('abc\"").is_none());
        assert!(matched("ISODate('2024-01-01'").is_none());
        assert!(matched("NumberLong('12)").is_none());
        assert!(matched("NumberLong(1.5)").is_none());
        assert!(matched("NumberLong(-)").is_none());
    }

    #[test]
    fn test_not_anchored_elsewhere() {
        assert!(matched(" ObjectId('507f1f77bcf86cd799439011')").is_none());
        assert!(matched("x: ISODate('2024-01-01')").is_none());
    }
}
