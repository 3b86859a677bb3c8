//! Session context
//!
//! Tracks the selected database across translated lines and decides whether a
//! translated command may run under the current session settings.

use crate::config::SessionConfig;
use crate::error::{ExecutionError, ParseError, Result};
use crate::executor::result::CheckResult;
use crate::parser::classifier::USE_DATABASE;
use crate::parser::{
    ParsedQuery, QueryType, is_read_only_aggregation, is_readonly_safe, is_writing_aggregation,
};

/// Longest database name accepted by `use`
const MAX_DB_NAME_LEN: usize = 64;

/// Selected database and read-only flag for a sequence of commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Currently selected database
    pub database: String,

    /// Refuse anything that is not read-only safe
    pub read_only: bool,
}

impl Session {
    /// Create a new session
    ///
    /// # Arguments
    /// * `database` - Initially selected database
    /// * `read_only` - Whether write commands are refused
    pub fn new(database: impl Into<String>, read_only: bool) -> Self {
        Self {
            database: database.into(),
            read_only,
        }
    }

    /// Create a session from configuration
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.database.clone(), config.read_only)
    }

    /// Decide whether a translated command may run
    ///
    /// # Arguments
    /// * `query` - Translated command
    ///
    /// # Returns
    /// * `Result<()>` - `UnsupportedOperation` for unknown commands,
    ///   `ReadOnlyViolation` for writes in read-only mode, `InvalidCommand`
    ///   for `use` with an unusable database name
    pub fn authorize(&self, query: &ParsedQuery) -> Result<()> {
        if query.query_type == QueryType::Unknown {
            let what = match &query.method {
                Some(method) => format!("method '{}'", method),
                None => "unrecognized command".to_string(),
            };
            tracing::warn!(%what, "refusing unsupported operation");
            return Err(ExecutionError::UnsupportedOperation(what).into());
        }

        let unverified_pipeline =
            query.method_name() == "aggregate" && !is_read_only_aggregation(query);
        if self.read_only && (!is_readonly_safe(query) || unverified_pipeline) {
            tracing::warn!(
                method = %query.method_name(),
                database = %self.database,
                "refusing write in read-only session"
            );
            return Err(ExecutionError::ReadOnlyViolation(query.method_name().to_string()).into());
        }

        if let Some(name) = use_target(query)
            && !is_valid_db_name(name)
        {
            tracing::warn!(database = %name, "refusing invalid database name");
            return Err(
                ParseError::InvalidCommand(format!("Invalid database name: {}", name)).into(),
            );
        }

        Ok(())
    }

    /// Apply the session side effects of a command
    ///
    /// Only `use <name>` has any: it switches the selected database. The
    /// command is authorized first, so a refused `use` leaves the session
    /// unchanged.
    pub fn apply(&mut self, query: &ParsedQuery) -> Result<()> {
        self.authorize(query)?;

        if let Some(name) = use_target(query) {
            tracing::debug!(from = %self.database, to = %name, "switching database");
            self.database = name.to_string();
        }

        Ok(())
    }

    /// Apply a command and report the verdict
    ///
    /// Refusals are recorded in the result rather than returned as errors, so
    /// a caller processing many lines can report each one and carry on.
    pub fn check(&mut self, query: ParsedQuery) -> CheckResult {
        let error = self.apply(&query).err().map(|e| e.to_string());
        let has_write_stage = (query.method_name() == "aggregate")
            .then(|| is_writing_aggregation(&query));

        CheckResult {
            namespace: self.namespace(&query),
            readonly_safe: is_readonly_safe(&query),
            has_write_stage,
            database: self.database.clone(),
            error,
            query,
        }
    }

    /// Full namespace (`<database>.<collection>`) targeted by a command
    pub fn namespace(&self, query: &ParsedQuery) -> Option<String> {
        query
            .collection
            .as_ref()
            .map(|collection| format!("{}.{}", self.database, collection))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Database name carried by a `use` command
fn use_target(query: &ParsedQuery) -> Option<&str> {
    if query.query_type != QueryType::Admin || query.method_name() != USE_DATABASE {
        return None;
    }
    query.args.first().and_then(|arg| arg.as_str())
}

/// Check a database name against the server's naming restrictions
///
/// Names must be non-empty, at most 64 bytes, and free of `/\. "$*<>:|?`
/// and the null character.
pub fn is_valid_db_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_DB_NAME_LEN {
        return false;
    }

    !name.chars().any(|ch| {
        matches!(
            ch,
            '/' | '\\' | '.' | ' ' | '"' | '$' | '*' | '<' | '>' | ':' | '|' | '?' | '\0'
        )
    })
}
