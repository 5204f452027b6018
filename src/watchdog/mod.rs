//! Watchdog subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler (runner.rs):
//!     check cycle → verdict → state.rs
//!     → threshold reached → restart.rs cooldown check
//!     → radio off → settle → radio on → counter reset
//!     → sleep interval → repeat
//! ```
//!
//! # Design Decisions
//! - The counter lives in memory only; a process restart starts from zero
//! - The last restart time may be persisted to enforce the cooldown
//! - A suppressed trip keeps the counter so the next degraded cycle retries

pub mod restart;
pub mod runner;
pub mod state;

pub use restart::RestartGuard;
pub use runner::{CycleReport, TripOutcome, Watchdog, WatchdogSettings};
pub use state::{FailureCounter, WatchdogState};
