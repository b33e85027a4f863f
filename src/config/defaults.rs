//! Default configuration values
//!
//! Single source of truth for defaults across the configuration sources.

/// Environment variable prefix for all configuration options
pub const ENV_PREFIX: &str = "TCPFW_";

/// Default host to listen on and forward to
pub const HOST_STR: &str = "localhost";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Log levels accepted by the logger
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Default host
pub fn host() -> String {
    HOST_STR.to_string()
}

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default copy buffer size (8KB)
pub fn buffer_size() -> usize {
    8192
}
