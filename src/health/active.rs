//! Active reachability probes.
//!
//! # Responsibilities
//! - Probe a single target with a bounded timeout
//! - Classify the outcome as reachable or unreachable
//!
//! # Design Decisions
//! - Any HTTP response counts as reachable, whatever its status
//! - ICMP goes through the system `ping` binary (no raw socket privileges)
//! - Timeouts, DNS and connection errors are all just "unreachable"

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::config::CheckConfig;
use crate::health::target::{CheckMethod, Target};
use crate::observability::metrics;

/// Grace period on top of the ping deadline before the child is killed.
const PING_GRACE: Duration = Duration::from_secs(2);

/// Something that can tell whether a target currently responds.
pub trait Probe {
    fn check(&self, target: &Target) -> impl Future<Output = bool>;
}

/// HTTP GET reachability probe.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(config: &CheckConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    async fn check(&self, target: &Target) -> bool {
        match self.client.get(&target.address).send().await {
            Ok(response) => {
                tracing::info!(
                    host = %target.address,
                    status = %response.status(),
                    "Host is reachable"
                );
                true
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(host = %target.address, "Host couldn't be reached: timeout");
                false
            }
            Err(e) => {
                tracing::warn!(host = %target.address, error = %e, "Host couldn't be reached");
                false
            }
        }
    }
}

/// ICMP echo probe backed by the system `ping` binary.
#[derive(Debug, Clone)]
pub struct IcmpProbe {
    program: String,
    timeout: Duration,
}

impl IcmpProbe {
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            program: "ping".to_string(),
            timeout: config.timeout(),
        }
    }

    /// Use a different ping binary (e.g. an absolute path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for a single echo request with the configured deadline.
    pub fn args(&self, address: &str) -> Vec<String> {
        if cfg!(windows) {
            vec![
                "-n".to_string(),
                "1".to_string(),
                "-w".to_string(),
                self.timeout.as_millis().to_string(),
                address.to_string(),
            ]
        } else {
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                self.timeout.as_secs().max(1).to_string(),
                address.to_string(),
            ]
        }
    }
}

impl Probe for IcmpProbe {
    async fn check(&self, target: &Target) -> bool {
        let args = self.args(&target.address);
        tracing::debug!(
            command = %format!("{} {}", self.program, args.join(" ")),
            "Executing ping"
        );

        let mut command = Command::new(&self.program);
        command.args(&args).stdin(Stdio::null()).kill_on_drop(true);

        let output = match time::timeout(self.timeout + PING_GRACE, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::error!(
                    host = %target.address,
                    program = %self.program,
                    error = %e,
                    "Failed to run ping"
                );
                return false;
            }
            Err(_) => {
                tracing::warn!(host = %target.address, "Ping did not finish in time");
                return false;
            }
        };

        let reachable = output.status.success();
        if reachable {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                tracing::debug!(host = %target.address, "{}", line);
            }
            tracing::info!(host = %target.address, "Host is reachable");
        } else {
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                tracing::warn!(host = %target.address, "{}", line);
            }
            tracing::warn!(
                host = %target.address,
                status = %output.status,
                "Host couldn't be reached"
            );
        }
        reachable
    }
}

/// Dispatches each target to the probe matching its method.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    http: HttpProbe,
    icmp: IcmpProbe,
}

impl NetworkProbe {
    pub fn new(http: HttpProbe, icmp: IcmpProbe) -> Self {
        Self { http, icmp }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(HttpProbe::new(config)?, IcmpProbe::new(config)))
    }
}

impl Probe for NetworkProbe {
    async fn check(&self, target: &Target) -> bool {
        let reachable = match target.method {
            CheckMethod::Http => self.http.check(target).await,
            CheckMethod::Icmp => self.icmp.check(target).await,
        };
        metrics::record_host_check(target.method, reachable);
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_args_carry_deadline() {
        let config = CheckConfig {
            timeout_secs: 15,
            ..CheckConfig::default()
        };
        let args = IcmpProbe::new(&config).args("1.1.1.1");
        assert_eq!(args.len(), 5);
        assert_eq!(args[1], "1");
        assert_eq!(args.last().map(String::as_str), Some("1.1.1.1"));
        if cfg!(windows) {
            assert_eq!(args[3], "15000");
        } else {
            assert_eq!(args[3], "15");
        }
    }

    #[tokio::test]
    async fn test_missing_ping_binary_is_unreachable() {
        let probe = IcmpProbe::new(&CheckConfig::default()).with_program("/nonexistent/ping");
        let target = Target::new("127.0.0.1", CheckMethod::Icmp).unwrap();
        assert!(!probe.check(&target).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_ping_is_killed_at_deadline() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ping");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = CheckConfig {
            timeout_secs: 1,
            ..CheckConfig::default()
        };
        let icmp = IcmpProbe::new(&config).with_program(script.to_string_lossy().into_owned());
        let target = Target::new("127.0.0.1", CheckMethod::Icmp).unwrap();

        let start = std::time::Instant::now();
        assert!(!icmp.check(&target).await);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(10));
    }
}
