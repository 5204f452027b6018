//! Reachability checking subsystem.
//!
//! # Data Flow
//! ```text
//! Host entries (target.rs):
//!     HostConfig → Target { address, method }
//!
//! Probes (active.rs):
//!     Target → HTTP GET or ICMP echo
//!     → reachable / unreachable
//!
//! Cycle evaluation (checker.rs):
//!     All targets → policy (any / all) → retries
//!     → Healthy / Degraded
//! ```
//!
//! # Design Decisions
//! - Every failure kind collapses into "unreachable"
//! - An empty target list is always degraded
//! - Probes sit behind a trait so cycles can be scripted in tests

pub mod active;
pub mod checker;
pub mod target;

pub use active::{HttpProbe, IcmpProbe, NetworkProbe, Probe};
pub use checker::{CycleHealth, ReachabilityChecker};
pub use target::{CheckMethod, Target};
