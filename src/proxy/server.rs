//! Forwarder server module
//!
//! This module implements the listener loop: accept client connections and
//! hand each one to its own relay task.

use log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::common::{ForwardError, Result};
use crate::config::ForwardConfig;
use super::handler::handle_connection;

/// Forwarder server structure
///
/// Owns the bound listening socket and the shared configuration.
pub struct Forwarder {
    /// Bound listening socket
    listener: TcpListener,
    /// Forwarder configuration (wrapped in Arc for sharing with relay tasks)
    config: Arc<ForwardConfig>,
}

impl Forwarder {
    /// Bind the listening socket on `host:inport`
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::Bind` if the address cannot be bound. There is
    /// no retry; the binary treats this as fatal.
    pub async fn bind(config: Arc<ForwardConfig>) -> Result<Self> {
        let addr = config.listen_addr();

        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => return Err(ForwardError::Bind { addr, source }),
        };

        info!("Forwarder listening on {}", listener.local_addr()?);

        Ok(Self { listener, config })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared configuration
    pub fn config(&self) -> &Arc<ForwardConfig> {
        &self.config
    }

    /// Accept connections forever
    ///
    /// Every accepted connection is handled by a freshly spawned task that is
    /// never joined. Accept errors are logged and the loop carries on
    /// immediately, with no backoff.
    pub async fn serve(self) {
        loop {
            match self.listener.accept().await {
                Ok((client_stream, client_addr)) => {
                    info!("Accepted connection from {}", client_addr);

                    let config = Arc::clone(&self.config);

                    tokio::spawn(async move {
                        match handle_connection(config, client_stream, client_addr).await {
                            Ok(stats) => debug!(
                                "Connection from {} closed ({} bytes sent, {} bytes received)",
                                client_addr, stats.client_to_target, stats.target_to_client
                            ),
                            Err(e) => error!("{}: connection from {} abandoned", e, client_addr),
                        }
                    });
                }
                Err(e) => {
                    error!("{}: failed to accept connection", e);
                }
            }
        }
    }
}

/// Bind `host:inport` and forward connections until the process stops
///
/// Only returns on a bind failure.
pub async fn run(config: Arc<ForwardConfig>) -> Result<()> {
    Forwarder::bind(config).await?.serve().await;
    Ok(())
}
