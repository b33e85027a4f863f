//! Configuration builder
//!
//! This module provides a builder pattern for constructing configuration.

use std::collections::HashMap;
use std::path::Path;
use log::debug;

use crate::config::error::Result;
use crate::config::source::{CliSource, ConfigSource, DefaultSource, EnvSource, FileSource};
use crate::config::types::{ConfigValues, ForwardConfig};

/// Configuration builder
///
/// Sources are applied in the order they are added, later ones winning.
pub struct ConfigBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add default source
    pub fn with_defaults(mut self) -> Self {
        debug!("Adding default configuration source");
        self.sources.push(Box::new(DefaultSource));
        self
    }

    /// Add file source
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        debug!("Adding file configuration source: {}", path.display());
        self.sources.push(Box::new(FileSource::new(path)));
        self
    }

    /// Add environment source
    pub fn with_env(mut self, prefix: &str) -> Self {
        debug!("Adding environment configuration source with prefix: {}", prefix);
        self.sources.push(Box::new(EnvSource::new(prefix)));
        self
    }

    /// Add command line source
    pub fn with_cli(mut self, values: ConfigValues) -> Self {
        debug!("Adding command line configuration source");
        self.sources.push(Box::new(CliSource::new(values)));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ForwardConfig> {
        let mut values = ConfigValues::default();
        let mut sources = HashMap::new();

        debug!("Building configuration from {} sources", self.sources.len());

        for source in self.sources {
            let source_type = source.source_type();
            debug!("Loading configuration from source: {}", source_type);

            values.merge(source.load()?, source_type, &mut sources);
        }

        ForwardConfig::from_values(values, sources)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
