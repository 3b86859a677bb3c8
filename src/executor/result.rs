//! Check result types
//!
//! A [`CheckResult`] is what the front end reports for one translated line:
//! the query itself, the session it was checked against, and the verdict.

use serde_json::{Value, json};

use crate::parser::ParsedQuery;

/// Outcome of checking one translated line against a session
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Translated command
    pub query: ParsedQuery,

    /// Database selected after the command was applied
    pub database: String,

    /// `<database>.<collection>` for collection commands
    pub namespace: Option<String>,

    /// Whether the command is safe in read-only mode
    pub readonly_safe: bool,

    /// For `aggregate`, whether the pipeline writes to a collection
    pub has_write_stage: Option<bool>,

    /// Error message if the session refused the command
    pub error: Option<String>,
}

impl CheckResult {
    /// Whether the session allowed the command
    pub fn allowed(&self) -> bool {
        self.error.is_none()
    }

    /// Render as a single JSON object
    ///
    /// Keys of the translated query come first, followed by the verdict.
    pub fn to_json(&self) -> Value {
        let mut out = self.query.to_json();
        if let Value::Object(map) = &mut out {
            map.insert("database".to_string(), json!(self.database));
            map.insert("namespace".to_string(), json!(self.namespace));
            map.insert("readonly_safe".to_string(), json!(self.readonly_safe));
            if let Some(has_write_stage) = self.has_write_stage {
                map.insert("has_write_stage".to_string(), json!(has_write_stage));
            }
            map.insert("allowed".to_string(), json!(self.allowed()));
            if let Some(reason) = &self.error {
                map.insert("reason".to_string(), json!(reason));
            }
        }
        out
    }
}
