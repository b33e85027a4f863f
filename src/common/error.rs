//! Error handling module
//!
//! This module defines the error types and result type aliases used in the application.

use thiserror::Error;
use std::io;

use crate::config::ConfigError;

/// TCP forwarder error type
#[derive(Error, Debug)]
pub enum ForwardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The listening socket could not be bound
    #[error("failed to create listener on {addr}: {source}")]
    Bind {
        /// Address the listener tried to bind
        addr: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The outbound target could not be resolved
    #[error("resolve failed for {0}")]
    Resolve(String),

    /// The outbound target could not be dialed
    #[error("dial failed for {addr}: {source}")]
    Dial {
        /// Resolved target address
        addr: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ForwardError`.
pub type Result<T> = std::result::Result<T, ForwardError>;
