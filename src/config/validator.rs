//! Configuration validator
//!
//! This module provides functionality for validating configuration.

use crate::config::defaults::LOG_LEVELS;
use crate::config::error::{ConfigError, Result};
use crate::config::types::ForwardConfig;

/// Validate the configuration
pub fn validate_config(config: &ForwardConfig) -> Result<()> {
    validate_network_settings(config)?;
    validate_general_settings(config)?;

    Ok(())
}

/// Host and both ports must be non-empty
fn validate_network_settings(config: &ForwardConfig) -> Result<()> {
    let required = [
        ("host", config.host()),
        ("inport", config.in_port()),
        ("outport", config.out_port()),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(format!("{} must not be empty", name)));
        }
    }

    Ok(())
}

/// Buffer size must be non-zero
fn validate_general_settings(config: &ForwardConfig) -> Result<()> {
    if config.buffer_size() == 0 {
        return Err(ConfigError::InvalidValue(
            "buffer_size".to_string(),
            "Buffer size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Configuration validator trait
pub trait ConfigValidator {
    /// Check configuration for warnings
    ///
    /// Unlike validation, nothing here stops the forwarder from starting.
    fn check_warnings(&self) -> Vec<String>;
}

impl ConfigValidator for ForwardConfig {
    fn check_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level()) {
            warnings.push(format!("Invalid log level '{}', using default 'info'", self.log_level()));
        }

        if self.in_port() == self.out_port() {
            warnings.push(format!(
                "inport and outport are both {}; connections will be forwarded back to the listener",
                self.in_port()
            ));
        }

        if self.in_port().parse::<u16>().is_err() {
            warnings.push(format!("inport '{}' is not a numeric port", self.in_port()));
        }

        if self.out_port().parse::<u16>().is_err() {
            warnings.push(format!("outport '{}' is not a numeric port", self.out_port()));
        }

        warnings
    }
}
