//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchdog_cycles_total` (counter): cycles by result
//! - `watchdog_host_checks_total` (counter): checks by method, result
//! - `watchdog_consecutive_failures` (gauge): current counter value
//! - `watchdog_trips_total` (counter): trips by outcome
//! - `watchdog_transmits_total` (counter): transmissions by state, result
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::{CheckMethod, CycleHealth};
use crate::radio::SocketState;
use crate::watchdog::TripOutcome;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn result_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}

pub fn record_cycle(health: CycleHealth) {
    counter!("watchdog_cycles_total", "result" => health.as_str()).increment(1);
}

pub fn record_host_check(method: CheckMethod, reachable: bool) {
    let result = if reachable { "reachable" } else { "unreachable" };
    counter!("watchdog_host_checks_total", "method" => method.as_str(), "result" => result)
        .increment(1);
}

pub fn set_consecutive_failures(failures: u32) {
    gauge!("watchdog_consecutive_failures").set(f64::from(failures));
}

pub fn record_trip(outcome: TripOutcome) {
    counter!("watchdog_trips_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_transmit(state: SocketState, ok: bool) {
    counter!("watchdog_transmits_total", "state" => state.as_str(), "result" => result_label(ok))
        .increment(1);
}
