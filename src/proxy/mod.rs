//! Forwarding module
//!
//! This module implements the forwarder itself: the listener loop in
//! `server`, the per-connection relay task in `handler`, and the
//! bidirectional copy in `forwarder`.

pub mod server;
mod handler;
mod forwarder;

pub use server::{run, Forwarder};
pub use handler::handle_connection;
pub use forwarder::{relay, Direction, RelayStats};
