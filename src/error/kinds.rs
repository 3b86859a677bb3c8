use std::{fmt, io};

/// Crate-wide `Result` type using [`MongoqError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MongoqError>;

/// Top-level error type for mongoq operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum MongoqError {
    /// Command or argument parsing errors.
    Parse(ParseError),

    /// Errors raised when a translated command is checked against a session.
    Execution(ExecutionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),
}

/// Parsing-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input does not match any known command shape.
    InvalidCommand(String),

    /// Normalized argument text is not valid JSON.
    InvalidJson(String),

    /// A typed literal carries a value it cannot represent.
    InvalidLiteral { tag: String, reason: String },
}

/// Errors produced when a session refuses a translated command.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// Command shape or method is not supported.
    UnsupportedOperation(String),

    /// Command would write while the session is read-only.
    ReadOnlyViolation(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MongoqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MongoqError::Parse(e) => write!(f, "{e}"),
            MongoqError::Execution(e) => write!(f, "Execution error: {e}"),
            MongoqError::Config(e) => write!(f, "Configuration error: {e}"),
            MongoqError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidCommand(cmd) => write!(f, "Invalid command: {cmd}"),
            ParseError::InvalidJson(msg) => write!(f, "Invalid arguments: {msg}"),
            ParseError::InvalidLiteral { tag, reason } => {
                write!(f, "Invalid {tag} literal: {reason}")
            }
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::UnsupportedOperation(op) => {
                write!(f, "Unsupported operation: {op}")
            }
            ExecutionError::ReadOnlyViolation(op) => {
                write!(f, "Operation not allowed in read-only mode: {op}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for MongoqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MongoqError::Parse(e) => Some(e),
            MongoqError::Execution(e) => Some(e),
            MongoqError::Config(e) => Some(e),
            MongoqError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ParseError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to MongoqError ========================= */

impl From<io::Error> for MongoqError {
    fn from(err: io::Error) -> Self {
        MongoqError::Io(err)
    }
}

impl From<ParseError> for MongoqError {
    fn from(err: ParseError) -> Self {
        MongoqError::Parse(err)
    }
}

impl From<ExecutionError> for MongoqError {
    fn from(err: ExecutionError) -> Self {
        MongoqError::Execution(err)
    }
}

impl From<ConfigError> for MongoqError {
    fn from(err: ConfigError) -> Self {
        MongoqError::Config(err)
    }
}

impl From<serde_json::Error> for MongoqError {
    fn from(err: serde_json::Error) -> Self {
        MongoqError::Parse(ParseError::InvalidJson(err.to_string()))
    }
}
