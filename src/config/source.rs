//! Configuration sources
//!
//! This module defines traits and implementations for loading configuration
//! from different sources.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, warn};

use crate::config::defaults;
use crate::config::error::{ConfigError, Result};
use crate::config::types::{ConfigValues, ValueSource};

/// Configuration source trait
pub trait ConfigSource {
    /// Load the values this source knows about
    fn load(&self) -> Result<ConfigValues>;

    /// Get the source type
    fn source_type(&self) -> ValueSource;
}

/// Default configuration source
pub struct DefaultSource;

impl ConfigSource for DefaultSource {
    fn load(&self) -> Result<ConfigValues> {
        debug!("Loading default configuration");
        Ok(ConfigValues {
            host: Some(defaults::host()),
            in_port: None,
            out_port: None,
            buffer_size: Some(defaults::buffer_size()),
            log_level: Some(defaults::log_level()),
        })
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Default
    }
}

/// JSON file configuration source
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    /// Create a new file source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<ConfigValues> {
        debug!("Loading configuration from file: {}", self.path.display());

        if !self.path.exists() {
            warn!("Configuration file not found: {}", self.path.display());
            return Ok(ConfigValues::default());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::FileReadError(self.path.clone(), e.to_string()))?;

        serde_json::from_str::<ConfigValues>(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", self.path.display(), e)))
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::File
    }
}

/// Environment variable configuration source
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    /// Create a new environment source
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn get(&self, name: &str) -> Option<String> {
        env::var(format!("{}{}", self.prefix, name)).ok()
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<ConfigValues> {
        debug!("Loading configuration from environment variables with prefix {}", self.prefix);

        let buffer_size = match self.get("BUFFER_SIZE") {
            Some(value) => Some(value.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue(format!("{}BUFFER_SIZE", self.prefix), e.to_string())
            })?),
            None => None,
        };

        Ok(ConfigValues {
            host: self.get("HOST"),
            in_port: self.get("INPORT"),
            out_port: self.get("OUTPORT"),
            buffer_size,
            log_level: self.get("LOG_LEVEL"),
        })
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Environment
    }
}

/// Command line configuration source
///
/// Holds values already extracted from the argument list.
pub struct CliSource {
    values: ConfigValues,
}

impl CliSource {
    /// Create a new command line source
    pub fn new(values: ConfigValues) -> Self {
        Self { values }
    }
}

impl ConfigSource for CliSource {
    fn load(&self) -> Result<ConfigValues> {
        debug!("Loading configuration from command line arguments");
        Ok(self.values.clone())
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::CommandLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let source = FileSource::new("does-not-exist-tcpfw.json");
        let values = source.load().unwrap();
        assert_eq!(values, ConfigValues::default());
    }

    #[test]
    fn test_default_source() {
        let values = DefaultSource.load().unwrap();
        assert_eq!(values.host.as_deref(), Some("localhost"));
        assert_eq!(values.in_port, None);
        assert_eq!(values.out_port, None);
    }
}
