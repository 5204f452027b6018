//! Cycle evaluation.
//!
//! Runs one check cycle over all targets and folds the per-host results into
//! a single verdict according to the configured policy.

use std::time::Duration;

use tokio::time;

use crate::config::HealthPolicy;
use crate::health::active::Probe;
use crate::health::target::Target;

/// Verdict of a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleHealth {
    Healthy,
    Degraded,
}

impl CycleHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleHealth::Healthy => "healthy",
            CycleHealth::Degraded => "degraded",
        }
    }
}

/// Checks a fixed target list with a probe.
#[derive(Debug)]
pub struct ReachabilityChecker<P> {
    probe: P,
    targets: Vec<Target>,
    policy: HealthPolicy,
    retries: u32,
    retry_interval: Duration,
}

impl<P: Probe> ReachabilityChecker<P> {
    pub fn new(probe: P, targets: Vec<Target>, policy: HealthPolicy) -> Self {
        Self {
            probe,
            targets,
            policy,
            retries: 0,
            retry_interval: Duration::ZERO,
        }
    }

    /// Re-run the whole pass up to `retries` more times before giving up.
    pub fn with_retries(mut self, retries: u32, retry_interval: Duration) -> Self {
        self.retries = retries;
        self.retry_interval = retry_interval;
        self
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Run one cycle, including retry passes.
    pub async fn check_cycle(&self) -> CycleHealth {
        for attempt in 0..=self.retries {
            if self.check_pass().await == CycleHealth::Healthy {
                return CycleHealth::Healthy;
            }

            if attempt < self.retries {
                tracing::debug!(
                    attempt = attempt + 1,
                    retry_in_secs = self.retry_interval.as_secs(),
                    "No healthy verdict, retrying"
                );
                time::sleep(self.retry_interval).await;
            }
        }
        CycleHealth::Degraded
    }

    async fn check_pass(&self) -> CycleHealth {
        if self.targets.is_empty() {
            return CycleHealth::Degraded;
        }

        match self.policy {
            HealthPolicy::Any => {
                for target in &self.targets {
                    if self.probe.check(target).await {
                        return CycleHealth::Healthy;
                    }
                }
                CycleHealth::Degraded
            }
            HealthPolicy::All => {
                for target in &self.targets {
                    if !self.probe.check(target).await {
                        return CycleHealth::Degraded;
                    }
                }
                CycleHealth::Healthy
            }
        }
    }
}
