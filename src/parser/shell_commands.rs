//! Command splitter
//!
//! Recognizes the three top-level input shapes and splits them into a
//! [`RawCommand`]:
//!
//! - `show dbs` / `show databases` / `show collections` / `show tables`
//! - `use <name>`
//! - `db.<method>(<args>)` and `db.<collection>.<method>(<args>)`
//!
//! These shapes are matched with plain string handling; argument text is left
//! for the normalizer.

use crate::parser::classifier::{SHOW_COLLECTIONS, SHOW_DATABASES, USE_DATABASE};
use crate::parser::command::{RawCommand, Scope};

/// Splitter for shell input lines
pub struct CommandSplitter;

impl CommandSplitter {
    /// Split an input line into a raw command
    ///
    /// Surrounding whitespace and trailing semicolons are ignored.
    ///
    /// # Returns
    /// * `Option<RawCommand>` - `None` when the line matches no known shape
    pub fn split(input: &str) -> Option<RawCommand> {
        let trimmed = input.trim().trim_end_matches(';').trim();

        if let Some(rest) = strip_keyword(trimmed, "show") {
            return Self::split_show(rest);
        }

        if let Some(rest) = strip_keyword(trimmed, "use") {
            return Self::split_use(rest);
        }

        Self::split_call(trimmed)
    }

    /// Split `show <target>`
    fn split_show(target: &str) -> Option<RawCommand> {
        let method = match target {
            "dbs" | "databases" => SHOW_DATABASES,
            "collections" | "tables" => SHOW_COLLECTIONS,
            _ => return None,
        };

        Some(RawCommand {
            scope: Scope::Show,
            target_path: vec![target.to_string()],
            method: method.to_string(),
            raw_args: String::new(),
        })
    }

    /// Split `use <name>`, taking only the first whitespace-delimited token
    fn split_use(rest: &str) -> Option<RawCommand> {
        let name = rest.split_whitespace().next()?;

        Some(RawCommand {
            scope: Scope::Use,
            target_path: vec![name.to_string()],
            method: USE_DATABASE.to_string(),
            raw_args: String::new(),
        })
    }

    /// Split `db[.<collection>].<method>(<args>)`
    ///
    /// The callee is everything before the first `(`, and the line must end
    /// with `)`. The arguments are everything in between.
    fn split_call(input: &str) -> Option<RawCommand> {
        let open = input.find('(')?;
        if !input.ends_with(')') {
            return None;
        }

        let callee = input[..open].trim_end();
        let raw_args = &input[open + 1..input.len() - 1];

        let segments: Vec<&str> = callee.split('.').collect();
        let (method, target_path) = segments.split_last()?;

        if target_path.first() != Some(&"db") || !segments.iter().all(|s| is_path_segment(s)) {
            return None;
        }

        Some(RawCommand {
            scope: Scope::Db,
            target_path: target_path.iter().map(|s| s.to_string()).collect(),
            method: method.to_string(),
            raw_args: raw_args.to_string(),
        })
    }
}

/// Strip a leading keyword that is followed by whitespace
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> RawCommand {
        CommandSplitter::split(input).unwrap_or_else(|| panic!("no match for {input:?}"))
    }

    #[test]
    fn test_show_databases() {
        for input in ["show dbs", "show databases", "  show   dbs ;"] {
            let raw = split(input);
            assert_eq!(raw.scope, Scope::Show);
            assert_eq!(raw.method, SHOW_DATABASES);
        }
    }

    #[test]
    fn test_show_collections() {
        for input in ["show collections", "show tables"] {
            assert_eq!(split(input).method, SHOW_COLLECTIONS);
        }
    }

    #[test]
    fn test_unknown_show_targets() {
        assert!(CommandSplitter::split("show users").is_none());
        assert!(CommandSplitter::split("show").is_none());
        assert!(CommandSplitter::split("show dbs extra").is_none());
        assert!(CommandSplitter::split("showdbs").is_none());
    }

    #[test]
    fn test_use_database() {
        let raw = split("use mydb");
        assert_eq!(raw.scope, Scope::Use);
        assert_eq!(raw.method, USE_DATABASE);
        assert_eq!(raw.target_path, vec!["mydb"]);

        assert_eq!(split("use  other trailing words").target_path, vec!["other"]);
        assert!(CommandSplitter::split("use").is_none());
        assert!(CommandSplitter::split("use   ").is_none());
    }

    #[test]
    fn test_collection_call() {
        let raw = split("db.users.find({ age: { $gt: 18 } })");
        assert_eq!(raw.scope, Scope::Db);
        assert_eq!(raw.target_path, vec!["db", "users"]);
        assert_eq!(raw.method, "find");
        assert_eq!(raw.raw_args, "{ age: { $gt: 18 } }");
        assert_eq!(raw.collection().as_deref(), Some("users"));
    }

    #[test]
    fn test_dotted_collection() {
        let raw = split("db.system.profile.find();");
        assert_eq!(raw.collection().as_deref(), Some("system.profile"));
        assert_eq!(raw.method, "find");
        assert_eq!(raw.raw_args, "");
    }

    #[test]
    fn test_database_call() {
        let raw = split("db.getName()");
        assert_eq!(raw.target_path, vec!["db"]);
        assert_eq!(raw.method, "getName");
        assert_eq!(raw.collection(), None);
    }

    #[test]
    fn test_args_keep_inner_parentheses() {
        let raw = split("db.x.find({s: '(a)'})");
        assert_eq!(raw.raw_args, "{s: '(a)'}");
    }

    #[test]
    fn test_rejected_calls() {
        for input in [
            "",
            "   ",
            ";;;",
            "invalid command",
            "db.users.find(",
            "db.users.find",
            "users.find()",
            "db.find",
            "db..find()",
            "db.my coll.find()",
            "database.users.find()",
            "print('hello')",
        ] {
            assert!(CommandSplitter::split(input).is_none(), "input: {input:?}");
        }
    }
}
