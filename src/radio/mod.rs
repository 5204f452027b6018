//! Radio-controlled socket subsystem.
//!
//! # Data Flow
//! ```text
//! Watchdog trip
//!     → SocketSwitch::off / ::on (switch.rs)
//!     → CommandTransmitter (command.rs): sender program encodes and sends
//!     → or DryRunSwitch: log only
//! ```
//!
//! # Design Decisions
//! - Fire-and-forget: the hardware has no acknowledgment channel
//! - Errors are returned to the caller, which logs and carries on

pub mod command;
pub mod switch;

pub use command::CommandTransmitter;
pub use switch::{DryRunSwitch, SocketState, SocketSwitch, TransmitError, TransmitResult};

use crate::config::RadioConfig;

/// The switch selected by configuration.
#[derive(Debug, Clone)]
pub enum RadioSwitch {
    Command(CommandTransmitter),
    DryRun(DryRunSwitch),
}

impl RadioSwitch {
    pub fn from_config(config: &RadioConfig) -> Self {
        if config.enabled {
            RadioSwitch::Command(CommandTransmitter::new(config))
        } else {
            RadioSwitch::DryRun(DryRunSwitch)
        }
    }
}

impl SocketSwitch for RadioSwitch {
    async fn transmit(&self, state: SocketState) -> TransmitResult {
        match self {
            RadioSwitch::Command(transmitter) => transmitter.transmit(state).await,
            RadioSwitch::DryRun(switch) => switch.transmit(state).await,
        }
    }
}
