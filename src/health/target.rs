//! Check targets.
//!
//! A target is a host address bound to the method used to check it. Bare
//! addresses infer their method: IP literals are pinged, everything else is
//! fetched over HTTP.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::schema::HostConfig;

/// How a host is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    Http,
    Icmp,
}

impl CheckMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckMethod::Http => "http",
            CheckMethod::Icmp => "icmp",
        }
    }

    /// Infer the method from the shape of an address.
    pub fn infer(address: &str) -> Self {
        if address.parse::<IpAddr>().is_ok() {
            CheckMethod::Icmp
        } else {
            CheckMethod::Http
        }
    }
}

impl fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a host entry cannot be turned into a target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("address is empty")]
    Empty,

    #[error("'{0}' is not a valid http(s) URL")]
    InvalidUrl(String),

    #[error("'{0}' is not a valid ping destination")]
    InvalidHost(String),
}

/// A validated host and its check method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub address: String,
    pub method: CheckMethod,
}

impl Target {
    pub fn new(address: impl Into<String>, method: CheckMethod) -> Result<Self, TargetError> {
        let address: String = address.into();
        let address = address.trim().to_string();
        if address.is_empty() {
            return Err(TargetError::Empty);
        }

        match method {
            CheckMethod::Http => {
                let valid = Url::parse(&address)
                    .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
                    .unwrap_or(false);
                if !valid {
                    return Err(TargetError::InvalidUrl(address));
                }
            }
            CheckMethod::Icmp => {
                // Passed to ping as a positional argument.
                if address.starts_with('-') || address.chars().any(char::is_whitespace) {
                    return Err(TargetError::InvalidHost(address));
                }
            }
        }

        Ok(Self { address, method })
    }

    /// Build a target from a host entry, inferring the method when absent.
    pub fn from_config(host: &HostConfig) -> Result<Self, TargetError> {
        let address = host.address().trim();
        let method = host.method().unwrap_or_else(|| CheckMethod::infer(address));
        Self::new(address, method)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.method)
    }
}

/// Build targets from every host entry, failing on the first invalid one.
pub fn targets_from_config(hosts: &[HostConfig]) -> Result<Vec<Target>, TargetError> {
    hosts.iter().map(Target::from_config).collect()
}
