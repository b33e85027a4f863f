//! Network utility functions
//!
//! Address formatting and outbound name resolution.

use std::net::SocketAddr;

use tokio::net::lookup_host;

use super::error::{ForwardError, Result};

/// Join a host and port into a `host:port` string
///
/// IPv6 literals are wrapped in brackets so the result parses as a socket address.
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Resolve `host:port` to a socket address
///
/// Resolution goes through the runtime's resolver and the first address wins.
///
/// # Errors
///
/// Returns `ForwardError::Resolve` if the lookup fails or yields no address.
pub async fn resolve_addr(host: &str, port: &str) -> Result<SocketAddr> {
    let target = join_host_port(host, port);

    let mut addrs = lookup_host(target.as_str())
        .await
        .map_err(|e| ForwardError::Resolve(format!("{}: {}", target, e)))?;

    addrs
        .next()
        .ok_or_else(|| ForwardError::Resolve(format!("{}: no addresses found", target)))
}
