//! Router watchdog library.
//!
//! Checks reachability of a set of hosts on a fixed schedule and power-cycles
//! the router's radio-controlled mains socket after sustained failure.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod radio;
pub mod watchdog;

pub use config::schema::WatchdogConfig;
pub use lifecycle::build_watchdog;
pub use watchdog::Watchdog;
