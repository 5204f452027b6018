//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each host resolves to a usable check method
//! - Validate value ranges (threshold > 0, interval > 0, timeouts > 0)
//! - Validate the metrics bind address when metrics are enabled
//! - Reject log levels the filter would silently ignore
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatchdogConfig → Result<(), Vec<ValidationError>>
//! - An empty host list is valid; every cycle is then degraded

use std::net::SocketAddr;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::WatchdogConfig;
use crate::health::target::{Target, TargetError};

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("hosts[{index}]: {source}")]
    Host { index: usize, source: TargetError },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("radio.program must not be empty")]
    EmptyProgram,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("observability.log_level '{0}' is not one of off, error, warn, info, debug, trace")]
    LogLevel(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &WatchdogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, host) in config.hosts.iter().enumerate() {
        if let Err(source) = Target::from_config(host) {
            errors.push(ValidationError::Host { index, source });
        }
    }

    let positive = [
        ("watchdog.interval_secs", config.watchdog.interval_secs),
        ("watchdog.threshold", u64::from(config.watchdog.threshold)),
        ("checks.timeout_secs", config.checks.timeout_secs),
        ("radio.transmit_timeout_secs", config.radio.transmit_timeout_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.radio.enabled && config.radio.program.trim().is_empty() {
        errors.push(ValidationError::EmptyProgram);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
