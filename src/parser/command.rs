//! Command type definitions for mongoq
//!
//! [`RawCommand`] is the splitter's view of an input line; [`ParsedQuery`] is
//! the fully translated command handed to a dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::parser::value::TypedValue;

/// Top-level shape of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `show <target>`
    Show,

    /// `use <name>`
    Use,

    /// `db[.<collection>].<method>(<args>)`
    Db,
}

/// Input line split into its structural parts
///
/// Arguments are still raw text at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub scope: Scope,

    /// `[target]` for show, `[name]` for use, `["db", <collection segments>...]`
    /// for calls
    pub target_path: Vec<String>,

    pub method: String,

    /// Text between the call parentheses, empty for show and use
    pub raw_args: String,
}

impl RawCommand {
    /// Collection name for collection-scoped calls
    ///
    /// Segments after `db` are joined with `.`, so `db.system.profile.find()`
    /// targets `system.profile`.
    pub fn collection(&self) -> Option<String> {
        match self.scope {
            Scope::Db if self.target_path.len() > 1 => Some(self.target_path[1..].join(".")),
            _ => None,
        }
    }
}

/// Classification of a translated command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Read,
    Write,
    Admin,
    Unknown,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryType::Read => "read",
            QueryType::Write => "write",
            QueryType::Admin => "admin",
            QueryType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Fully translated command
///
/// An `Unknown` query may still carry its method name for diagnostics, but
/// must never be dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub query_type: QueryType,
    pub collection: Option<String>,
    pub method: Option<String>,
    pub args: Vec<TypedValue>,
}

impl ParsedQuery {
    /// Query for input that matched none of the known shapes
    pub fn unknown() -> Self {
        Self {
            query_type: QueryType::Unknown,
            collection: None,
            method: None,
            args: Vec::new(),
        }
    }

    /// Create an admin query without a collection
    pub fn admin(method: impl Into<String>, args: Vec<TypedValue>) -> Self {
        Self {
            query_type: QueryType::Admin,
            collection: None,
            method: Some(method.into()),
            args,
        }
    }

    /// Whether the query may be handed to a dispatcher at all
    pub fn is_dispatchable(&self) -> bool {
        self.query_type != QueryType::Unknown && self.method.is_some()
    }

    /// Method name, or an empty string when the shape was not recognized
    pub fn method_name(&self) -> &str {
        self.method.as_deref().unwrap_or_default()
    }

    /// Render as JSON with arguments in relaxed extended JSON
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "type": self.query_type,
            "collection": self.collection,
            "method": self.method,
            "args": self.args.iter().map(TypedValue::to_extjson).collect::<Vec<_>>(),
        })
    }
}
