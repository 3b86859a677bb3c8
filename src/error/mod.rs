//! Error handling module for mongoq.
//!
//! The translator itself never returns errors to its caller: argument
//! materialization failures degrade to a raw-string argument and unknown
//! shapes become `QueryType::Unknown`. The error kinds defined here are used
//! internally by the materializer, by the session checks that decide whether
//! a translated command may run, and by configuration loading.
//!
//! # Example
//!
//! ```rust
//! use mongoq::error::{ExecutionError, MongoqError, Result};
//!
//! fn refuse(method: &str) -> Result<()> {
//!     Err(ExecutionError::ReadOnlyViolation(method.to_string()).into())
//! }
//!
//! assert!(matches!(refuse("drop"), Err(MongoqError::Execution(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, ExecutionError, MongoqError, ParseError, Result};
