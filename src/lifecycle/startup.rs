//! Startup orchestration.
//!
//! # Responsibilities
//! - Build probes, targets, switch and restart guard from a validated config
//! - Assemble the watchdog
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - An empty host list only warns; the loop will trip on schedule

use thiserror::Error;

use crate::config::WatchdogConfig;
use crate::health::target::{targets_from_config, TargetError};
use crate::health::{NetworkProbe, ReachabilityChecker};
use crate::radio::RadioSwitch;
use crate::watchdog::{RestartGuard, Watchdog, WatchdogSettings};

/// Errors assembling the watchdog.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid host: {0}")]
    Target(#[from] TargetError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The watchdog as wired for production.
pub type ProductionWatchdog = Watchdog<NetworkProbe, RadioSwitch>;

/// Build the production watchdog from configuration.
pub fn build_watchdog(config: &WatchdogConfig) -> Result<ProductionWatchdog, StartupError> {
    let targets = targets_from_config(&config.hosts)?;
    if targets.is_empty() {
        tracing::warn!("No hosts configured, every cycle will be degraded");
    }
    for target in &targets {
        tracing::debug!(host = %target.address, method = %target.method, "Configured host");
    }

    let probe = NetworkProbe::from_config(&config.checks)?;
    let checker = ReachabilityChecker::new(probe, targets, config.watchdog.policy)
        .with_retries(config.watchdog.retries, config.watchdog.retry_interval());

    let switch = RadioSwitch::from_config(&config.radio);

    let min_interval = config.watchdog.min_restart_interval();
    let guard = match &config.watchdog.state_file {
        Some(path) => RestartGuard::with_state_file(min_interval, path),
        None => RestartGuard::new(min_interval),
    };

    Ok(Watchdog::new(
        checker,
        switch,
        guard,
        WatchdogSettings::from_config(config),
    ))
}
