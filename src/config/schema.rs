//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watchdog.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::health::target::CheckMethod;

/// Root configuration for the watchdog.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Hosts to check each cycle.
    pub hosts: Vec<HostConfig>,

    /// Polling loop and trip policy.
    pub watchdog: LoopConfig,

    /// Reachability check settings.
    pub checks: CheckConfig,

    /// Radio socket settings.
    pub radio: RadioConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A host entry, either a bare address or a table with an explicit method.
///
/// ```toml
/// hosts = ["1.1.1.1", { address = "router.lan", method = "icmp" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HostConfig {
    /// Address only; the method is inferred from its shape.
    Address(String),
    /// Address with an explicit check method.
    Detailed {
        address: String,
        #[serde(default)]
        method: Option<CheckMethod>,
    },
}

impl HostConfig {
    /// The configured address, regardless of form.
    pub fn address(&self) -> &str {
        match self {
            HostConfig::Address(address) => address,
            HostConfig::Detailed { address, .. } => address,
        }
    }

    /// The explicitly configured method, if any.
    pub fn method(&self) -> Option<CheckMethod> {
        match self {
            HostConfig::Address(_) => None,
            HostConfig::Detailed { method, .. } => *method,
        }
    }
}

/// How a cycle's per-host results combine into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthPolicy {
    /// Healthy if at least one host is reachable.
    #[default]
    Any,
    /// Healthy only if every host is reachable.
    All,
}

/// Polling loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Seconds to sleep between cycles.
    pub interval_secs: u64,

    /// Consecutive degraded cycles before the socket is power-cycled.
    pub threshold: u32,

    /// Verdict policy for a cycle.
    pub policy: HealthPolicy,

    /// Extra passes over the host list before a cycle counts as degraded.
    pub retries: u32,

    /// Seconds between retry passes.
    pub retry_interval_secs: u64,

    /// Seconds the router needs to boot after a power cycle.
    pub restart_duration_secs: u64,

    /// Minimum seconds between two power cycles.
    pub min_restart_interval_secs: u64,

    /// File recording the last restart time, so the cooldown survives restarts.
    pub state_file: Option<PathBuf>,
}

impl LoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn restart_duration(&self) -> Duration {
        Duration::from_secs(self.restart_duration_secs)
    }

    pub fn min_restart_interval(&self) -> Duration {
        Duration::from_secs(self.min_restart_interval_secs)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            threshold: 3,
            policy: HealthPolicy::Any,
            retries: 0,
            retry_interval_secs: 10,
            restart_duration_secs: 300,
            min_restart_interval_secs: 1800,
            state_file: None,
        }
    }
}

/// Reachability check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Timeout for a single HTTP request or ICMP echo, in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with HTTP checks.
    pub user_agent: String,

    /// Route HTTP checks through the proxy from HTTP(S)_PROXY.
    pub system_proxy: bool,
}

impl CheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: concat!("router-watchdog/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// Radio socket configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Transmit for real. When false, transmissions are only logged.
    pub enabled: bool,

    /// Sender program that encodes and transmits a code.
    pub program: String,

    /// Sender arguments. `{code}`, `{protocol}`, `{pin}` and `{state}` are substituted.
    pub args: Vec<String>,

    /// GPIO pin wired to the transmitter.
    pub pin: u32,

    /// Radio protocol number understood by the sender.
    pub protocol: u32,

    /// Code switching the socket on.
    pub on_code: u64,

    /// Code switching the socket off.
    pub off_code: u64,

    /// Seconds between the off and on transmissions.
    pub settle_secs: u64,

    /// Seconds before a hanging sender is killed.
    pub transmit_timeout_secs: u64,

    /// Send a single "on" at startup.
    pub send_initial_on: bool,
}

impl RadioConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn transmit_timeout(&self) -> Duration {
        Duration::from_secs(self.transmit_timeout_secs)
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "rpi-rf_send".to_string(),
            args: vec![
                "-g".to_string(),
                "{pin}".to_string(),
                "-p".to_string(),
                "{protocol}".to_string(),
                "{code}".to_string(),
            ],
            pin: 17,
            protocol: 4,
            on_code: 3_323_996,
            off_code: 4_099_212,
            settle_secs: 10,
            transmit_timeout_secs: 10,
            send_initial_on: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) used when RUST_LOG is unset.
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
