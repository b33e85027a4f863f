//! Data forwarding module
//!
//! This module copies bytes in both directions between a client connection
//! and its target connection.

use std::fmt;

use bytes::BytesMut;
use log::{debug, error};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

/// One of the two copy loops of a relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes read from the client are written to the target
    ClientToTarget,
    /// Bytes read from the target are written to the client
    TargetToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ClientToTarget => write!(f, "client to target"),
            Direction::TargetToClient => write!(f, "target to client"),
        }
    }
}

/// Bytes copied by a finished relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes forwarded from the client to the target
    pub client_to_target: u64,
    /// Bytes forwarded from the target to the client
    pub target_to_client: u64,
}

/// Relay data between a client stream and a target stream
///
/// Each direction runs in its own task and copies until its reader reaches end
/// of stream or an error occurs. A finished direction shuts down its own write
/// half, which passes the close on to the peer, and leaves the other direction
/// running until that one stops by itself. This returns only after both
/// directions have finished, by which point every half of both streams has
/// been dropped and the underlying connections are closed.
///
/// # Parameters
///
/// * `client` - Inbound stream accepted by the listener
/// * `target` - Outbound stream dialed for this client
/// * `buffer_size` - Chunk size for each direction
pub async fn relay<C, T>(client: C, target: T, buffer_size: usize) -> RelayStats
where
    C: AsyncRead + AsyncWrite + Send + 'static,
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    let (client_reader, client_writer) = tokio::io::split(client);
    let (target_reader, target_writer) = tokio::io::split(target);

    let client_to_target = tokio::spawn(copy_direction(
        Direction::ClientToTarget,
        client_reader,
        target_writer,
        buffer_size,
    ));

    let target_to_client = tokio::spawn(copy_direction(
        Direction::TargetToClient,
        target_reader,
        client_writer,
        buffer_size,
    ));

    // Join barrier: both directions must stop before the relay is done
    let (client_to_target, target_to_client) = tokio::join!(
        joined(Direction::ClientToTarget, client_to_target),
        joined(Direction::TargetToClient, target_to_client),
    );

    RelayStats {
        client_to_target,
        target_to_client,
    }
}

/// Wait for a direction task and return its byte count
///
/// A direction whose task panicked is logged and counted as zero bytes.
async fn joined(direction: Direction, handle: JoinHandle<u64>) -> u64 {
    match handle.await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{} task failed: {}", direction, e);
            0
        }
    }
}

/// Copy from `reader` to `writer` until end of stream or an error
async fn copy_direction<R, W>(
    direction: Direction,
    mut reader: R,
    mut writer: W,
    buffer_size: usize,
) -> u64
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(buffer_size);
    let mut total_bytes = 0u64;

    loop {
        buffer.clear();

        match reader.read_buf(&mut buffer).await {
            Ok(0) => {
                debug!("{}: end of stream", direction);
                break;
            }
            Ok(n) => {
                if let Err(e) = writer.write_all(&buffer[..n]).await {
                    error!("error while copying {}: {}", direction, e);
                    break;
                }
                total_bytes += n as u64;
            }
            Err(e) => {
                error!("error while copying {}: {}", direction, e);
                break;
            }
        }
    }

    // Pass the close on to the peer; the other direction keeps running
    if let Err(e) = writer.shutdown().await {
        debug!("{}: shutdown failed: {}", direction, e);
    }

    debug!("{} transferred {} bytes total", direction, total_bytes);
    total_bytes
}
