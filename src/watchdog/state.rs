//! Failure counter state machine.
//!
//! # States
//! - Normal: checking hosts, counting consecutive degraded cycles
//! - Tripped: power-cycling the socket
//!
//! # State Transitions
//! ```text
//! Normal → Normal:  healthy cycle (counter reset) or degraded below threshold
//! Normal → Tripped: consecutive degraded cycles >= threshold
//! Tripped → Normal: off/on transmitted, counter reset
//! ```

/// Watchdog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchdogState {
    #[default]
    Normal,
    Tripped,
}

/// Where a degraded cycle left the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    /// Degraded cycle below the threshold.
    Incremented(u32),
    /// Degraded cycle at or past the threshold.
    ThresholdReached(u32),
}

/// Consecutive degraded-cycle counter.
#[derive(Debug, Clone)]
pub struct FailureCounter {
    failures: u32,
    threshold: u32,
}

impl FailureCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: 0,
            threshold,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// A healthy cycle clears the counter.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    pub fn record_failure(&mut self) -> CounterEvent {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.threshold {
            CounterEvent::ThresholdReached(self.failures)
        } else {
            CounterEvent::Incremented(self.failures)
        }
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }
}
