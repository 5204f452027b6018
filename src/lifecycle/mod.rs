//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build checker, switch, guard → Watchdog
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → watchdog loop returns → exit 0
//! ```

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{build_watchdog, ProductionWatchdog, StartupError};
