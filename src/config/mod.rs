//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WatchdogConfig (validated, immutable)
//!     → handed to lifecycle::startup to build the watchdog
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; changes require a process restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::WatchdogConfig;
pub use schema::{
    CheckConfig, HealthPolicy, HostConfig, LoopConfig, ObservabilityConfig, RadioConfig,
};
