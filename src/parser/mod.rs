//! Shell query translator
//!
//! Turns one line of MongoDB shell syntax into a classified [`ParsedQuery`].
//!
//! # Architecture
//!
//! The parser is split into focused modules that form a pipeline:
//! - `shell_commands`: splits `show`, `use` and `db....method(args)` lines
//! - `normalizer`: rewrites shell argument syntax into strict JSON text
//! - `literals`: recognizes constructor calls like `ObjectId('...')`
//! - `materializer`: parses normalized text into [`TypedValue`]s
//! - `classifier`: read/write/admin tables and write-stage detection
//! - `command` and `value`: the types passed between the stages
//!
//! Translation never fails. Unrecognized lines become `QueryType::Unknown`
//! and arguments that cannot be materialized are kept as one raw string.
//!
//! # Examples
//!
//! ```
//! use mongoq::parser::{Parser, QueryType};
//!
//! let parser = Parser::new();
//!
//! let query = parser.parse("db.users.find({ age: { $gt: 18 } })");
//! assert_eq!(query.query_type, QueryType::Read);
//! assert_eq!(query.collection.as_deref(), Some("users"));
//!
//! let query = parser.parse("show dbs");
//! assert_eq!(query.query_type, QueryType::Admin);
//! ```

pub mod classifier;
mod command;
mod literals;
mod materializer;
mod normalizer;
mod shell_commands;
mod value;


// Re-export public API
pub use classifier::{
    classify_method, has_write_stage, is_read_only_aggregation, is_readonly_safe,
    is_writing_aggregation,
};
pub use command::{ParsedQuery, QueryType, RawCommand, Scope};
pub use literals::{LiteralMatch, try_match};
pub use materializer::{materialize, try_materialize};
pub use normalizer::normalize;
pub use shell_commands::CommandSplitter;
pub use value::TypedValue;

/// Translator for shell input lines
///
/// The parser holds no state; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self
    }

    /// Translate an input line into a classified query
    ///
    /// # Arguments
    ///
    /// * `input` - One line of shell syntax
    ///
    /// # Returns
    ///
    /// * `ParsedQuery` - The translated query; `QueryType::Unknown` if the
    ///   line has no recognized shape or the method is not in any table
    pub fn parse(&self, input: &str) -> ParsedQuery {
        let Some(raw) = CommandSplitter::split(input) else {
            tracing::debug!(input = %input.trim(), "unrecognized command shape");
            return ParsedQuery::unknown();
        };

        match raw.scope {
            Scope::Show => ParsedQuery::admin(raw.method, Vec::new()),
            Scope::Use => {
                let name = raw.target_path.into_iter().next().unwrap_or_default();
                ParsedQuery::admin(raw.method, vec![TypedValue::Text(name)])
            }
            Scope::Db => {
                let collection = raw.collection();
                let query_type = classify_method(collection.is_some(), &raw.method);
                if query_type == QueryType::Unknown {
                    tracing::debug!(
                        method = %raw.method,
                        collection = ?collection,
                        "unrecognized method"
                    );
                }

                ParsedQuery {
                    query_type,
                    collection,
                    method: Some(raw.method),
                    args: materialize(&raw.raw_args),
                }
            }
        }
    }
}

/// Translate an input line with a fresh [`Parser`]
pub fn translate(input: &str) -> ParsedQuery {
    Parser::new().parse(input)
}
