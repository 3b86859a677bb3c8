//! Configuration management for mongoq
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::executor::is_valid_db_name;

/// Environment variable overriding `display.format`
pub const ENV_FORMAT: &str = "MONGOQ_FORMAT";

/// Environment variable overriding `session.database`
pub const ENV_DATABASE: &str = "MONGOQ_DATABASE";

/// Environment variable overriding `session.read_only`
pub const ENV_READ_ONLY: &str = "MONGOQ_READ_ONLY";

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "MONGOQ_LOG_LEVEL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (json, json-pretty)
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON format (single-line)
    ///
    /// One object per input line, suitable for piping to other tools.
    /// Example: `{"type":"read","collection":"users",...}`
    Json,

    /// Pretty-printed JSON format (multi-line)
    JsonPretty,
}

/// Session defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Database selected before any `use` command
    #[serde(default = "default_database")]
    pub database: String,

    /// Refuse commands that are not read-only safe
    #[serde(default)]
    pub read_only: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_format() -> OutputFormat {
    OutputFormat::Json
}

fn default_database() -> String {
    "test".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            read_only: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration from file and environment
    ///
    /// An explicitly named file must exist. Without one, the default path is
    /// used if present and defaults otherwise.
    ///
    /// # Arguments
    /// * `path` - Optional explicit configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Validated configuration or error
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// Variables are prefixed with MONGOQ_, e.g. `MONGOQ_FORMAT=json-pretty`.
    /// Values are checked the same way as the file's, so an unknown format
    /// is an error rather than silently ignored.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_FORMAT) {
            self.display.format = value.parse()?;
        }

        if let Some(value) = lookup(ENV_DATABASE) {
            self.session.database = value;
        }

        if let Some(value) = lookup(ENV_READ_ONLY) {
            self.session.read_only = parse_bool(ENV_READ_ONLY, &value)?;
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value.parse()?;
        }

        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongoq")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if !is_valid_db_name(&self.session.database) {
            return Err(invalid_value("session.database", &self.session.database));
        }
        Ok(())
    }
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = crate::error::MongoqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(invalid_value("logging.level", s)),
        }
    }
}

impl OutputFormat {
    /// Check if format requires pretty printing
    pub fn is_pretty(&self) -> bool {
        matches!(self, OutputFormat::JsonPretty)
    }

    /// Render a JSON value in this format
    pub fn render(&self, value: &serde_json::Value) -> Result<String> {
        let text = if self.is_pretty() {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

impl FromStr for OutputFormat {
    type Err = crate::error::MongoqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "pretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(invalid_value("display.format", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_value(field, value)),
    }
}

fn invalid_value(field: &str, value: &str) -> crate::error::MongoqError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}
