//! Reachability probes against local mock backends.

use router_watchdog::config::{CheckConfig, HealthPolicy};
use router_watchdog::health::{
    CheckMethod, CycleHealth, HttpProbe, IcmpProbe, NetworkProbe, Probe, ReachabilityChecker,
    Target,
};

mod common;

fn http_target(addr: std::net::SocketAddr) -> Target {
    Target::new(format!("http://{}/", addr), CheckMethod::Http).unwrap()
}

fn fast_checks() -> CheckConfig {
    CheckConfig {
        timeout_secs: 1,
        system_proxy: false,
        ..CheckConfig::default()
    }
}

#[tokio::test]
async fn test_http_success_is_reachable() {
    let addr = common::start_mock_backend(200).await;
    let probe = HttpProbe::new(&fast_checks()).unwrap();

    assert!(probe.check(&http_target(addr)).await);
}

#[tokio::test]
async fn test_http_error_status_still_counts_as_reachable() {
    let addr = common::start_mock_backend(503).await;
    let probe = HttpProbe::new(&fast_checks()).unwrap();

    assert!(probe.check(&http_target(addr)).await);
}

#[tokio::test]
async fn test_http_connection_refused_is_unreachable() {
    let addr = common::closed_port().await;
    let probe = HttpProbe::new(&fast_checks()).unwrap();

    assert!(!probe.check(&http_target(addr)).await);
}

#[tokio::test]
async fn test_http_timeout_is_unreachable() {
    let addr = common::start_silent_backend().await;
    let probe = HttpProbe::new(&fast_checks()).unwrap();

    let start = std::time::Instant::now();
    assert!(!probe.check(&http_target(addr)).await);
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_network_probe_cycle_over_mixed_hosts() {
    let up = common::start_mock_backend(200).await;
    let down = common::closed_port().await;

    let checks = fast_checks();
    let probe = NetworkProbe::new(
        HttpProbe::new(&checks).unwrap(),
        IcmpProbe::new(&checks).with_program("/nonexistent/ping"),
    );
    let targets = vec![
        Target::new("192.0.2.1", CheckMethod::Icmp).unwrap(),
        http_target(down),
        http_target(up),
    ];

    let any = ReachabilityChecker::new(probe.clone(), targets.clone(), HealthPolicy::Any);
    assert_eq!(any.check_cycle().await, CycleHealth::Healthy);

    let all = ReachabilityChecker::new(probe, targets, HealthPolicy::All);
    assert_eq!(all.check_cycle().await, CycleHealth::Degraded);
}
