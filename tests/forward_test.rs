//! Forwarding tests
//!
//! End-to-end tests over loopback sockets: a real target server, the
//! forwarder in front of it, and a client talking to the forwarder.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::timeout;

use tcpfw::{ForwardConfig, Forwarder};

const WAIT: Duration = Duration::from_secs(5);

/// Start a forwarder on an ephemeral port in front of `target_port`
async fn start_forwarder(target_port: u16) -> SocketAddr {
    let config = ForwardConfig::new("127.0.0.1", "0", target_port.to_string())
        .expect("valid config");
    let forwarder = Forwarder::bind(Arc::new(config)).await.expect("bind forwarder");
    let addr = forwarder.local_addr().unwrap();

    tokio::spawn(forwarder.serve());

    addr
}

/// Echo every connection back to its sender
async fn start_echo_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => continue,
            };
            tokio::spawn(async move {
                let (mut reader, mut writer) = stream.split();
                let _ = tokio::io::copy(&mut reader, &mut writer).await;
            });
        }
    });

    port
}

/// Echo each chunk back after a short delay, closing once the sender closes
async fn start_slow_echo_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                loop {
                    let n = match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => n,
                    };
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    if stream.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    port
}

#[tokio::test]
async fn test_echo_hello() {
    let target_port = start_echo_server().await;
    let addr = start_forwarder(target_port).await;

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"hello").await.unwrap();

    let mut buf = [0u8; 5];
    timeout(WAIT, client.read_exact(&mut buf))
        .await
        .expect("echo should arrive")
        .unwrap();
    assert_eq!(&buf, b"hello");
}

#[tokio::test]
async fn test_target_closes_immediately() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let target_port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    let addr = start_forwarder(target_port).await;
    let mut client = TcpStream::connect(addr).await.unwrap();

    let mut buf = Vec::new();
    let n = timeout(WAIT, client.read_to_end(&mut buf))
        .await
        .expect("client should observe EOF")
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_client_close_reaches_target() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let target_port = listener.local_addr().unwrap().port();
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let _ = stream.read_to_end(&mut received).await;
        let _ = done_tx.send(received);
    });

    let addr = start_forwarder(target_port).await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"last words").await.unwrap();
    drop(client);

    let received = timeout(WAIT, done_rx)
        .await
        .expect("target should observe close")
        .unwrap();
    assert_eq!(received, b"last words");
}

#[tokio::test]
async fn test_dial_failure_keeps_listening() {
    // Reserve a port, then free it so nothing is listening there
    let target_port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let addr = start_forwarder(target_port).await;

    for _ in 0..2 {
        let mut client = TcpStream::connect(addr).await.expect("listener should stay up");
        let mut buf = Vec::new();
        let read = timeout(WAIT, client.read_to_end(&mut buf))
            .await
            .expect("client should be closed");
        if let Ok(n) = read {
            assert_eq!(n, 0);
        }
        assert!(buf.is_empty());
    }
}

#[tokio::test]
async fn test_large_payload_in_order() {
    let target_port = start_echo_server().await;
    let addr = start_forwarder(target_port).await;

    let client = TcpStream::connect(addr).await.unwrap();
    let (mut reader, mut writer) = client.into_split();

    let payload: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
    let expected = payload.clone();

    let write_task = tokio::spawn(async move {
        writer.write_all(&payload).await.unwrap();
        writer
    });

    let mut received = vec![0u8; expected.len()];
    timeout(Duration::from_secs(30), reader.read_exact(&mut received))
        .await
        .expect("payload should be echoed")
        .unwrap();
    assert!(received == expected, "echoed bytes differ from sent bytes");

    let _writer = write_task.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_connections() {
    let target_port = start_echo_server().await;
    let addr = start_forwarder(target_port).await;

    let mut clients = Vec::new();
    for i in 0..20u32 {
        clients.push(tokio::spawn(async move {
            let mut client = TcpStream::connect(addr).await.unwrap();
            let message = format!("client {}", i);
            client.write_all(message.as_bytes()).await.unwrap();

            let mut buf = vec![0u8; message.len()];
            timeout(WAIT, client.read_exact(&mut buf)).await.unwrap().unwrap();
            assert_eq!(buf, message.as_bytes());
        }));
    }

    for client in clients {
        client.await.unwrap();
    }
}

#[tokio::test]
async fn test_half_closed_client_gets_reply() {
    let target_port = start_slow_echo_server().await;
    let addr = start_forwarder(target_port).await;

    for _ in 0..5 {
        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"hello").await.unwrap();
        client.shutdown().await.unwrap();

        let mut reply = Vec::new();
        timeout(WAIT, client.read_to_end(&mut reply))
            .await
            .expect("reply should arrive after half-close")
            .unwrap();
        assert_eq!(reply, b"hello");
    }
}
