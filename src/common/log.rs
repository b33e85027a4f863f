//! Logging setup
//!
//! Wires the `log` facade to `env_logger`.

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. Calling this again after the
/// logger is installed leaves the existing logger in place.
///
/// # Parameters
///
/// * `level` - Fallback log level (error, warn, info, debug, trace)
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env).try_init();
}
