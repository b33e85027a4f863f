//! Common module
//!
//! This module contains shared errors and utility functions used throughout the application.

pub mod error;
pub mod log;
pub mod net;

// Re-export commonly used types and functions
pub use error::{ForwardError, Result};
pub use log::init_logger;
pub use net::{join_host_port, resolve_addr};
