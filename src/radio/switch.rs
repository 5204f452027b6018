//! Socket switching capability.

use std::fmt;
use std::future::Future;

use thiserror::Error;

/// Target state of the mains socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketState {
    On,
    Off,
}

impl SocketState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketState::On => "on",
            SocketState::Off => "off",
        }
    }
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a single transmission attempt.
///
/// The radio link has no acknowledgment, so these only cover failures to hand
/// the code to the sender, never whether the socket actually switched.
#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("failed to spawn sender '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("sender exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("sender did not finish within {0} seconds")]
    Timeout(u64),
}

/// Result type for transmissions.
pub type TransmitResult = Result<(), TransmitError>;

/// Narrow capability over the radio-controlled socket.
pub trait SocketSwitch {
    /// Transmit the code for `state`.
    fn transmit(&self, state: SocketState) -> impl Future<Output = TransmitResult>;

    fn on(&self) -> impl Future<Output = TransmitResult> {
        self.transmit(SocketState::On)
    }

    fn off(&self) -> impl Future<Output = TransmitResult> {
        self.transmit(SocketState::Off)
    }
}

/// Switch that only logs what it would transmit.
#[derive(Debug, Clone, Default)]
pub struct DryRunSwitch;

impl SocketSwitch for DryRunSwitch {
    async fn transmit(&self, state: SocketState) -> TransmitResult {
        tracing::info!(state = %state, "Radio disabled, not transmitting");
        Ok(())
    }
}
