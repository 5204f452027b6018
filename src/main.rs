//! Router Watchdog
//!
//! Power-cycles a router through a 433MHz radio socket when the internet
//! stops answering.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                       ROUTER WATCHDOG                        │
//!   │                                                              │
//!   │  ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌─────────┐  │
//!   │  │  config  │──▶│ lifecycle  │──▶│ watchdog │──▶│  radio  │──┼──▶ sender ──▶ socket
//!   │  │  (TOML)  │   │  startup   │   │   loop   │   │ switch  │  │
//!   │  └──────────┘   └────────────┘   └────┬─────┘   └─────────┘  │
//!   │                                       │                      │
//!   │                                       ▼                      │
//!   │                                 ┌──────────┐                 │
//!   │                                 │  health  │─────────────────┼──▶ HTTP / ICMP hosts
//!   │                                 │  checks  │                 │
//!   │                                 └──────────┘                 │
//!   │                                                              │
//!   │   observability: tracing logs, Prometheus metrics (opt-in)   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use router_watchdog::config::load_config;
use router_watchdog::lifecycle::{build_watchdog, shutdown_signal};
use router_watchdog::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "router-watchdog", version)]
#[command(
    about = "Power-cycles the router when configured hosts stop responding",
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "ROUTER_WATCHDOG_CONFIG", default_value = "watchdog.toml")]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        hosts = config.hosts.len(),
        interval_secs = config.watchdog.interval_secs,
        threshold = config.watchdog.threshold,
        radio_enabled = config.radio.enabled,
        "router-watchdog v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let watchdog = build_watchdog(&config)?;
    watchdog.run(shutdown_signal()).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
