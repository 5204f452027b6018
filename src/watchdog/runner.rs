//! Watchdog loop.
//!
//! # Responsibilities
//! - Run one check cycle and feed the verdict into the failure counter
//! - Power-cycle the socket when the counter reaches the threshold
//! - Sleep between cycles until a shutdown signal arrives
//!
//! # Design Decisions
//! - One thread of control; every probe, transmit and sleep is awaited in turn
//! - Shutdown interrupts checks and sleeps, never the off/on sequence
//! - Transmit errors are logged and swallowed

use std::future::Future;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::time;

use crate::config::WatchdogConfig;
use crate::health::{CycleHealth, Probe, ReachabilityChecker};
use crate::observability::metrics;
use crate::radio::{SocketState, SocketSwitch};
use crate::watchdog::restart::RestartGuard;
use crate::watchdog::state::{CounterEvent, FailureCounter, WatchdogState};

/// Timing and policy knobs of the loop.
#[derive(Debug, Clone)]
pub struct WatchdogSettings {
    pub threshold: u32,
    pub interval: Duration,
    pub settle: Duration,
    pub restart_duration: Duration,
    pub send_initial_on: bool,
}

impl WatchdogSettings {
    pub fn from_config(config: &WatchdogConfig) -> Self {
        Self {
            threshold: config.watchdog.threshold,
            interval: config.watchdog.interval(),
            settle: config.radio.settle(),
            restart_duration: config.watchdog.restart_duration(),
            send_initial_on: config.radio.send_initial_on,
        }
    }
}

/// Result of a trip attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripOutcome {
    /// Off and on were handed to the switch.
    PowerCycled,
    /// A restart happened too recently.
    Suppressed { remaining: Duration },
}

impl TripOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripOutcome::PowerCycled => "power_cycled",
            TripOutcome::Suppressed { .. } => "suppressed",
        }
    }
}

/// What one cycle observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub health: CycleHealth,
    /// Counter value after the cycle.
    pub failures: u32,
    pub trip: Option<TripOutcome>,
}

/// The watchdog: checker, counter and switch owned by a single loop.
#[derive(Debug)]
pub struct Watchdog<P, S> {
    checker: ReachabilityChecker<P>,
    switch: S,
    guard: RestartGuard,
    counter: FailureCounter,
    state: watch::Sender<WatchdogState>,
    settings: WatchdogSettings,
}

impl<P: Probe, S: SocketSwitch> Watchdog<P, S> {
    pub fn new(
        checker: ReachabilityChecker<P>,
        switch: S,
        guard: RestartGuard,
        settings: WatchdogSettings,
    ) -> Self {
        Self {
            checker,
            switch,
            guard,
            counter: FailureCounter::new(settings.threshold),
            state: watch::Sender::new(WatchdogState::Normal),
            settings,
        }
    }

    pub fn failures(&self) -> u32 {
        self.counter.failures()
    }

    pub fn state(&self) -> WatchdogState {
        *self.state.borrow()
    }

    /// Follow state changes, including the Tripped window of a power cycle.
    pub fn state_receiver(&self) -> watch::Receiver<WatchdogState> {
        self.state.subscribe()
    }

    /// When the socket was last switched back on, if ever.
    pub fn last_restart(&self) -> Option<SystemTime> {
        self.guard.last_restart()
    }

    pub fn switch(&self) -> &S {
        &self.switch
    }

    pub fn checker(&self) -> &ReachabilityChecker<P> {
        &self.checker
    }

    /// Check all hosts once and act on the verdict.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let health = self.checker.check_cycle().await;
        self.apply(health).await
    }

    /// Feed a cycle verdict into the counter, tripping if needed.
    pub async fn apply(&mut self, health: CycleHealth) -> CycleReport {
        metrics::record_cycle(health);

        let trip = match health {
            CycleHealth::Healthy => {
                if self.counter.failures() > 0 {
                    tracing::info!(
                        previous_failures = self.counter.failures(),
                        "Hosts reachable again"
                    );
                }
                self.counter.record_success();
                None
            }
            CycleHealth::Degraded => match self.counter.record_failure() {
                CounterEvent::Incremented(failures) => {
                    tracing::error!(
                        failures,
                        threshold = self.counter.threshold(),
                        "All hosts are unreachable"
                    );
                    None
                }
                CounterEvent::ThresholdReached(failures) => {
                    tracing::error!(
                        failures,
                        threshold = self.counter.threshold(),
                        "All hosts are unreachable, threshold reached"
                    );
                    Some(self.trip().await)
                }
            },
        };

        metrics::set_consecutive_failures(self.counter.failures());

        CycleReport {
            health,
            failures: self.counter.failures(),
            trip,
        }
    }

    /// Power-cycle the socket unless a restart happened too recently.
    async fn trip(&mut self) -> TripOutcome {
        if let Err(cooldown) = self.guard.check(SystemTime::now()) {
            tracing::warn!(
                remaining_secs = cooldown.remaining.as_secs(),
                "Restart skipped, last restart was too recent"
            );
            let outcome = TripOutcome::Suppressed {
                remaining: cooldown.remaining,
            };
            metrics::record_trip(outcome);
            return outcome;
        }

        self.state.send_replace(WatchdogState::Tripped);
        tracing::warn!("Power-cycling router socket");

        self.send(SocketState::Off).await;
        tracing::debug!(
            settle_secs = self.settings.settle.as_secs(),
            "Waiting before switching back on"
        );
        time::sleep(self.settings.settle).await;
        self.send(SocketState::On).await;

        // The cooldown runs from the moment power came back.
        self.guard.record(SystemTime::now());
        self.counter.reset();
        self.state.send_replace(WatchdogState::Normal);

        let outcome = TripOutcome::PowerCycled;
        metrics::record_trip(outcome);
        outcome
    }

    async fn send(&self, state: SocketState) {
        let result = self.switch.transmit(state).await;
        metrics::record_transmit(state, result.is_ok());
        if let Err(e) = result {
            tracing::error!(state = %state, error = %e, "Transmit failed");
        }
    }

    /// Run cycles until `shutdown` resolves.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if self.settings.send_initial_on {
            tracing::info!("Sending initial on");
            tokio::select! {
                _ = self.send(SocketState::On) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested before the initial on completed");
                    return;
                }
            }
        }

        tracing::info!(
            hosts = self.checker.targets().len(),
            interval_secs = self.settings.interval.as_secs(),
            threshold = self.settings.threshold,
            "Starting host checks"
        );

        loop {
            let health = tokio::select! {
                health = self.checker.check_cycle() => health,
                _ = &mut shutdown => break,
            };

            let report = self.apply(health).await;

            if report.trip == Some(TripOutcome::PowerCycled) {
                tracing::info!(
                    wait_secs = self.settings.restart_duration.as_secs(),
                    "Restarted, waiting for reboot to complete"
                );
                tokio::select! {
                    _ = time::sleep(self.settings.restart_duration) => {}
                    _ = &mut shutdown => break,
                }
            }

            tracing::info!(
                next_check_secs = self.settings.interval.as_secs(),
                "Next check scheduled"
            );
            tokio::select! {
                _ = time::sleep(self.settings.interval) => {}
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Watchdog loop stopped");
    }
}
