//! Configuration types
//!
//! This module contains the main configuration types used throughout the application.

use std::collections::HashMap;
use serde::{Deserialize, Deserializer, Serialize};
use log::debug;

use crate::common::join_host_port;
use crate::config::defaults;
use crate::config::error::Result;
use crate::config::validator::validate_config;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// Default value
    Default,
    /// From configuration file
    File,
    /// From environment variable
    Environment,
    /// From command line argument
    CommandLine,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::File => write!(f, "file"),
            ValueSource::Environment => write!(f, "environment"),
            ValueSource::CommandLine => write!(f, "command line"),
        }
    }
}

/// Ports may be written as `"9000"` or `9000` in configuration files
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u16),
    }

    Ok(Option::<Port>::deserialize(deserializer)?.map(|port| match port {
        Port::Text(s) => s,
        Port::Number(n) => n.to_string(),
    }))
}

/// Configuration values
///
/// Every field is optional so that each source only sets what it knows about.
/// Field names match the command line flags (`inport`, `outport`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigValues {
    /// Host to listen on and forward to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port to listen on
    #[serde(default, rename = "inport", deserialize_with = "deserialize_port", skip_serializing_if = "Option::is_none")]
    pub in_port: Option<String>,

    /// Port to forward connections to
    #[serde(default, rename = "outport", deserialize_with = "deserialize_port", skip_serializing_if = "Option::is_none")]
    pub out_port: Option<String>,

    /// Chunk size used by each copy direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<usize>,

    /// Log level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl ConfigValues {
    /// Merge `other` on top of these values
    ///
    /// Fields set in `other` win. The winning source is recorded in `sources`.
    pub fn merge(
        &mut self,
        other: ConfigValues,
        source: ValueSource,
        sources: &mut HashMap<&'static str, ValueSource>,
    ) {
        macro_rules! take {
            ($field:ident, $name:literal) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                    sources.insert($name, source);
                }
            };
        }

        take!(host, "host");
        take!(in_port, "inport");
        take!(out_port, "outport");
        take!(buffer_size, "buffer_size");
        take!(log_level, "log_level");
    }
}

/// Forwarder configuration
///
/// Built once before the listener starts and read-only afterwards. Relay
/// tasks share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardConfig {
    host: String,
    in_port: String,
    out_port: String,
    buffer_size: usize,
    log_level: String,
    sources: HashMap<&'static str, ValueSource>,
}

impl ForwardConfig {
    /// Create a validated configuration with default buffer size and log level
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if any argument is empty.
    pub fn new(
        host: impl Into<String>,
        in_port: impl Into<String>,
        out_port: impl Into<String>,
    ) -> Result<Self> {
        let values = ConfigValues {
            host: Some(host.into()),
            in_port: Some(in_port.into()),
            out_port: Some(out_port.into()),
            ..ConfigValues::default()
        };

        Self::from_values(values, HashMap::new())
    }

    /// Build a configuration from merged values, filling defaults and validating
    pub fn from_values(
        values: ConfigValues,
        mut sources: HashMap<&'static str, ValueSource>,
    ) -> Result<Self> {
        let mut or_default = |name: &'static str, value: Option<String>, default: fn() -> String| {
            value.unwrap_or_else(|| {
                sources.entry(name).or_insert(ValueSource::Default);
                default()
            })
        };

        let host = or_default("host", values.host, defaults::host);
        let in_port = or_default("inport", values.in_port, String::new);
        let out_port = or_default("outport", values.out_port, String::new);
        let log_level = or_default("log_level", values.log_level, defaults::log_level);

        let buffer_size = values.buffer_size.unwrap_or_else(|| {
            sources.entry("buffer_size").or_insert(ValueSource::Default);
            defaults::buffer_size()
        });

        let config = Self {
            host,
            in_port,
            out_port,
            buffer_size,
            log_level,
            sources,
        };

        validate_config(&config)?;

        Ok(config)
    }

    /// Host to listen on and forward to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to listen on
    pub fn in_port(&self) -> &str {
        &self.in_port
    }

    /// Port to forward connections to
    pub fn out_port(&self) -> &str {
        &self.out_port
    }

    /// Chunk size used by each copy direction
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Log level
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Log level to hand to the logger
    ///
    /// Falls back to the default level when the configured one is not a
    /// known level, so a typo never silences logging.
    pub fn effective_log_level(&self) -> &str {
        if defaults::LOG_LEVELS.contains(&self.log_level.as_str()) {
            &self.log_level
        } else {
            defaults::LOG_LEVEL_STR
        }
    }

    /// Listening address as `host:inport`
    pub fn listen_addr(&self) -> String {
        join_host_port(&self.host, &self.in_port)
    }

    /// Forwarding target as `host:outport`
    pub fn target_addr(&self) -> String {
        join_host_port(&self.host, &self.out_port)
    }

    /// Where a value came from, if known
    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.sources.get(name).copied()
    }

    /// Log the effective configuration with source information
    pub fn log(&self) {
        let source = |name| {
            self.source(name)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        };

        debug!("  host: {} (from {})", self.host, source("host"));
        debug!("  inport: {} (from {})", self.in_port, source("inport"));
        debug!("  outport: {} (from {})", self.out_port, source("outport"));
        debug!("  buffer_size: {} (from {})", self.buffer_size, source("buffer_size"));
        debug!("  log_level: {} (from {})", self.log_level, source("log_level"));
    }
}
