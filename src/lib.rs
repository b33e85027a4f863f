//! tcpfw: forwards TCP connections from one port to another
//!
//! The forwarder listens on `host:inport`. For every accepted connection it
//! dials a fresh connection to `host:outport` and copies bytes in both
//! directions until either side closes. The byte stream is forwarded
//! unmodified.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tcpfw::{ForwardConfig, Forwarder, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Arc::new(ForwardConfig::new("localhost", "9000", "9001")?);
//!
//!     let forwarder = Forwarder::bind(config).await?;
//!     println!("listening on {}", forwarder.local_addr()?);
//!
//!     forwarder.serve().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod proxy;

// Re-export commonly used structures and functions for convenience
pub use common::{ForwardError, Result};
pub use config::ForwardConfig;
pub use proxy::{run, Forwarder, RelayStats};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
