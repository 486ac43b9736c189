//! Probe trait abstraction and scan data types.
//!
//! The coordinator only talks to the [`Probe`] trait, which keeps the
//! worker pool independent of the socket code and lets tests swap in
//! instrumented probes.

use crate::error::{ConfigError, ConfigResult, ScanResult};
use crate::types::{Port, PortRange, TargetPortSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Status of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A connection was established within the timeout.
    Open,
    /// Refused, timed out, unreachable or otherwise not accepting.
    Closed,
}

impl PortStatus {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The port that was probed.
    pub port: Port,
    /// Status determined by the probe.
    pub status: PortStatus,
    /// Service label, present only for open ports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ProbeOutcome {
    /// An open port annotated with its service label.
    pub fn open(port: Port, service: impl Into<String>) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service: Some(service.into()),
        }
    }

    pub fn closed(port: Port) -> Self {
        Self {
            port,
            status: PortStatus::Closed,
            service: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// The service label, or an empty string for closed ports.
    pub fn service_label(&self) -> &str {
        self.service.as_deref().unwrap_or_default()
    }
}

/// Configuration for one scan run.
///
/// Raw port values are `u32` so that out-of-range input is rejected by
/// [`ScanConfig::validate`] instead of being truncated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Hostname or IP address to scan.
    pub host: String,
    /// First port of the contiguous range.
    pub start_port: u32,
    /// Last port of the contiguous range (inclusive).
    pub end_port: u32,
    /// Additional ports merged into the range. Invalid values are dropped.
    pub extra_ports: Vec<u32>,
    /// Maximum number of probes in flight.
    pub max_concurrency: usize,
    /// Per-probe connect timeout.
    pub connect_timeout: Duration,
}

impl ScanConfig {
    /// Default extra ports: RDP, databases, VNC and alternate HTTP(S).
    pub const DEFAULT_EXTRA_PORTS: [u32; 7] = [1433, 3306, 3389, 5432, 5900, 8080, 8443];

    /// Create a configuration with the stock defaults for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            start_port: 1,
            end_port: 1024,
            extra_ports: Self::DEFAULT_EXTRA_PORTS.to_vec(),
            max_concurrency: 100,
            connect_timeout: Duration::from_millis(500),
        }
    }

    /// Set the contiguous port range.
    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.start_port = start;
        self.end_port = end;
        self
    }

    /// Replace the extra ports.
    pub fn with_extra_ports(mut self, ports: Vec<u32>) -> Self {
        self.extra_ports = ports;
        self
    }

    /// Set the worker pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.max_concurrency = concurrency;
        self
    }

    /// Set the per-probe connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Check every configuration invariant and return the validated range.
    pub fn validate(&self) -> ConfigResult<PortRange> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        let start = Port::from_u32(self.start_port).ok_or(ConfigError::PortOutOfRange {
            name: "start port",
            value: self.start_port,
        })?;
        let end = Port::from_u32(self.end_port).ok_or(ConfigError::PortOutOfRange {
            name: "end port",
            value: self.end_port,
        })?;
        let range = PortRange::new(start, end).ok_or(ConfigError::InvalidPortRange {
            start: self.start_port,
            end: self.end_port,
        })?;

        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(range)
    }

    /// Validate and build the set of ports this configuration scans.
    pub fn target_ports(&self) -> ConfigResult<TargetPortSet> {
        let range = self.validate()?;
        Ok(TargetPortSet::new(range, &self.extra_ports))
    }
}

/// A single-port connection probe.
///
/// Implementations must fold expected network failures into
/// [`PortStatus::Closed`] and return `Err` only for failures that should
/// abort the whole scan.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe one port on `target`.
    async fn probe(&self, target: IpAddr, port: Port) -> ScanResult<PortStatus>;
}
