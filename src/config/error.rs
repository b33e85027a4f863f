//! Configuration errors
//!
//! This module defines error types for the configuration module.

use std::fmt;
use std::error::Error;
use std::path::PathBuf;

/// Configuration error type
#[derive(Debug)]
pub enum ConfigError {
    /// An unrecognized command line token
    UnknownArgument(String),

    /// A required value is empty or missing
    InvalidConfig(String),

    /// Error reading file
    FileReadError(PathBuf, String),

    /// Error parsing configuration
    ParseError(String),

    /// Invalid value for configuration option
    InvalidValue(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownArgument(arg) =>
                write!(f, "unknown argument {}", arg),

            ConfigError::InvalidConfig(msg) =>
                write!(f, "invalid config: {}", msg),

            ConfigError::FileReadError(path, err) =>
                write!(f, "Error reading configuration file {}: {}", path.display(), err),

            ConfigError::ParseError(msg) =>
                write!(f, "Error parsing configuration: {}", msg),

            ConfigError::InvalidValue(name, msg) =>
                write!(f, "Invalid value for '{}': {}", name, msg),
        }
    }
}

impl Error for ConfigError {}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
