//! Connection handler module
//!
//! This module handles individual client connections: resolve the target,
//! dial it, then relay until either side goes away.

use log::debug;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::common::{resolve_addr, ForwardError, Result};
use crate::config::ForwardConfig;
use super::forwarder::{relay, RelayStats};

/// Handle a single client connection
///
/// The target is resolved and dialed once per connection, with no retry. If
/// either step fails the client stream is dropped, which closes it.
///
/// # Parameters
///
/// * `config` - Shared forwarder configuration
/// * `client_stream` - Accepted client TCP stream
/// * `client_addr` - Client peer address, for logging
///
/// # Returns
///
/// Returns the relay byte counts once both directions have finished.
pub async fn handle_connection(
    config: Arc<ForwardConfig>,
    client_stream: TcpStream,
    client_addr: SocketAddr,
) -> Result<RelayStats> {
    let target_addr = resolve_addr(config.host(), config.out_port()).await?;

    let target_stream = TcpStream::connect(target_addr)
        .await
        .map_err(|source| ForwardError::Dial {
            addr: target_addr.to_string(),
            source,
        })?;

    debug!("Relaying {} <-> {}", client_addr, target_addr);

    Ok(relay(client_stream, target_stream, config.buffer_size()).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    /// A loopback port with nothing listening on it
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_dial_failure_closes_client() {
        let port = closed_port().await;
        let config = Arc::new(ForwardConfig::new("127.0.0.1", "0", port.to_string()).unwrap());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut client = TcpStream::connect(addr).await.unwrap();
        let (server_side, peer) = listener.accept().await.unwrap();

        let result = handle_connection(config, server_side, peer).await;
        assert!(matches!(result, Err(ForwardError::Dial { .. })));

        let mut buf = Vec::new();
        let read = timeout(Duration::from_secs(5), client.read_to_end(&mut buf))
            .await
            .expect("client should observe close");
        // Either a clean EOF or a reset, but never data
        if let Ok(n) = read {
            assert_eq!(n, 0);
        }
    }

    #[tokio::test]
    async fn test_resolve_failure() {
        let config = Arc::new(ForwardConfig::new("127.0.0.1", "0", "not-a-port").unwrap());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).await.unwrap();
        let (server_side, peer) = listener.accept().await.unwrap();

        let result = handle_connection(config, server_side, peer).await;
        assert!(matches!(result, Err(ForwardError::Resolve(_))));
    }
}
