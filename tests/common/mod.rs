//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use router_watchdog::health::{Probe, Target};
use router_watchdog::radio::{SocketState, SocketSwitch, TransmitError, TransmitResult};

/// Start a mock HTTP backend answering every request with `status`.
///
/// Binds an ephemeral port and returns its address.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                            status_text
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that accepts connections but never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Probe whose answers are set by the test.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    reachable: Mutex<HashMap<String, bool>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, address: &str, reachable: bool) {
        self.reachable
            .lock()
            .unwrap()
            .insert(address.to_string(), reachable);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for ScriptedProbe {
    async fn check(&self, target: &Target) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reachable
            .lock()
            .unwrap()
            .get(&target.address)
            .copied()
            .unwrap_or(false)
    }
}

/// Switch that records every transmission. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSwitch {
    sent: Arc<Mutex<Vec<SocketState>>>,
    fail: bool,
    delay: Duration,
}

impl RecordingSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A switch whose transmissions all fail after being recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A switch whose transmissions take `delay` before being recorded.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SocketState> {
        self.sent.lock().unwrap().clone()
    }
}

impl SocketSwitch for RecordingSwitch {
    async fn transmit(&self, state: SocketState) -> TransmitResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sent.lock().unwrap().push(state);
        if self.fail {
            Err(TransmitError::Timeout(1))
        } else {
            Ok(())
        }
    }
}

/// Short interval used by scheduler tests.
pub const TICK: Duration = Duration::from_secs(60);
