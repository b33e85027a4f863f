//! Configuration module
//!
//! This module handles forwarder configuration, including loading from
//! different sources (defaults, a JSON file, environment variables and
//! command line arguments) and validating the result.
//!
//! Priority, lowest to highest:
//! 1. Default values
//! 2. Configuration file
//! 3. Environment variables (`TCPFW_*`)
//! 4. Command line arguments

pub mod builder;
pub mod defaults;
pub mod error;
pub mod source;
pub mod types;
pub mod validator;

pub use builder::ConfigBuilder;
pub use defaults::ENV_PREFIX;
pub use error::ConfigError;
pub use source::ConfigSource;
pub use types::{ConfigValues, ForwardConfig, ValueSource};
pub use validator::ConfigValidator;
