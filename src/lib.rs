//! MongoDB shell query translator
//!
//! This library turns single lines of the permissive query dialect used by
//! interactive MongoDB shells into structured, classified commands: target
//! collection, method name, typed argument values, and a read/write/admin
//! classification including detection of pipelines that write.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `executor`: Session state and read-only checks
//! - `parser`: Command splitting, normalization and classification
//!
//! # Example
//!
//! ```
//! use mongoq::{QueryType, Session, translate};
//!
//! let query = translate("db.orders.aggregate([{ $match: {} }, { $out: 'archive' }])");
//! assert_eq!(query.query_type, QueryType::Read);
//!
//! let session = Session::new("shop", true);
//! assert!(session.authorize(&query).is_err());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod parser;

// Re-export commonly used types
pub use config::Config;
pub use error::{MongoqError, Result};
pub use executor::{CheckResult, Session};
pub use parser::{ParsedQuery, Parser, QueryType, TypedValue, translate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
