//! Sender-program transmitter.
//!
//! # Responsibilities
//! - Render the sender's argument list for a code
//! - Run the sender with a deadline
//! - Surface spawn failures, nonzero exits and hangs as `TransmitError`
//!
//! # Design Decisions
//! - Encoding the 433MHz protocol is the sender's job, not ours
//! - One attempt per call; there is no feedback to justify retrying
//! - A hanging sender is killed when its deadline passes

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::config::RadioConfig;
use crate::radio::switch::{SocketState, SocketSwitch, TransmitError, TransmitResult};

/// Transmits socket codes by running an external sender program.
#[derive(Debug, Clone)]
pub struct CommandTransmitter {
    program: String,
    args: Vec<String>,
    pin: u32,
    protocol: u32,
    on_code: u64,
    off_code: u64,
    timeout: Duration,
}

impl CommandTransmitter {
    pub fn new(config: &RadioConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            pin: config.pin,
            protocol: config.protocol,
            on_code: config.on_code,
            off_code: config.off_code,
            timeout: config.transmit_timeout(),
        }
    }

    pub fn code(&self, state: SocketState) -> u64 {
        match state {
            SocketState::On => self.on_code,
            SocketState::Off => self.off_code,
        }
    }

    /// Argument list with placeholders filled in for `state`.
    pub fn render_args(&self, state: SocketState) -> Vec<String> {
        let code = self.code(state).to_string();
        let protocol = self.protocol.to_string();
        let pin = self.pin.to_string();

        self.args
            .iter()
            .map(|arg| {
                arg.replace("{code}", &code)
                    .replace("{protocol}", &protocol)
                    .replace("{pin}", &pin)
                    .replace("{state}", state.as_str())
            })
            .collect()
    }
}

impl SocketSwitch for CommandTransmitter {
    async fn transmit(&self, state: SocketState) -> TransmitResult {
        let args = self.render_args(state);
        tracing::debug!(
            state = %state,
            code = self.code(state),
            program = %self.program,
            args = ?args,
            "Transmitting socket code"
        );

        let mut command = Command::new(&self.program);
        command.args(&args).stdin(Stdio::null()).kill_on_drop(true);

        let output = time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| TransmitError::Timeout(self.timeout.as_secs()))?
            .map_err(|source| TransmitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransmitError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::info!(state = %state, code = self.code(state), "Socket code transmitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args_substitutes_placeholders() {
        let config = RadioConfig {
            args: vec![
                "-g".into(),
                "{pin}".into(),
                "-p".into(),
                "{protocol}".into(),
                "{code}".into(),
                "--label={state}".into(),
            ],
            ..RadioConfig::default()
        };
        let transmitter = CommandTransmitter::new(&config);

        assert_eq!(
            transmitter.render_args(SocketState::Off),
            vec!["-g", "17", "-p", "4", "4099212", "--label=off"]
        );
        assert_eq!(transmitter.render_args(SocketState::On)[4], "3323996");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let config = RadioConfig {
            program: "/nonexistent/rf-sender".into(),
            ..RadioConfig::default()
        };
        let err = CommandTransmitter::new(&config).on().await.unwrap_err();
        assert!(matches!(err, TransmitError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let config = RadioConfig {
            program: "sh".into(),
            args: vec!["-c".into(), "echo no transmitter >&2; exit 3".into()],
            ..RadioConfig::default()
        };
        let err = CommandTransmitter::new(&config).off().await.unwrap_err();
        match err {
            TransmitError::Exit { stderr, .. } => assert_eq!(stderr, "no transmitter"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_sender_times_out() {
        let config = RadioConfig {
            program: "sh".into(),
            args: vec!["-c".into(), "sleep 5".into()],
            transmit_timeout_secs: 1,
            ..RadioConfig::default()
        };

        let start = std::time::Instant::now();
        let err = CommandTransmitter::new(&config).off().await.unwrap_err();
        assert!(matches!(err, TransmitError::Timeout(1)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sender_receives_rendered_code() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("sent");
        let config = RadioConfig {
            program: "sh".into(),
            args: vec![
                "-c".into(),
                format!("echo {{state}} {{code}} >> {}", log.display()),
            ],
            ..RadioConfig::default()
        };
        let transmitter = CommandTransmitter::new(&config);

        transmitter.off().await.unwrap();
        transmitter.on().await.unwrap();

        let sent = std::fs::read_to_string(&log).unwrap();
        assert_eq!(sent, "off 4099212\non 3323996\n");
    }
}
