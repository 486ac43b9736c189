//! Scanner module - coordinates the TCP port scan.
//!
//! [`run_scan`] validates the configuration, builds the target port set,
//! resolves the host and then hands the ports to a [`Coordinator`], which
//! fans probes out across a bounded [`WorkerPool`] and assembles the
//! sorted [`ScanReport`].

pub mod pool;
pub mod tcp;
pub mod traits;

use crate::error::{ConfigResult, ScanResult};
use crate::types::{ScanTarget, TargetPortSet};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub use pool::WorkerPool;
pub use tcp::TcpConnectProbe;
pub use traits::{PortStatus, Probe, ProbeOutcome, ScanConfig};

/// Final result of one scan: open ports only, ascending by port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Host as given by the caller.
    pub target: String,
    /// Address the host resolved to.
    pub ip_address: String,
    /// The contiguous range that was scanned, e.g. "1-1024".
    pub port_range: String,
    /// Number of distinct valid extra ports merged into the range.
    pub extra_ports: usize,
    /// Total number of ports probed.
    pub ports_scanned: usize,
    /// When probing started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the probe phase in milliseconds.
    pub duration_ms: u64,
    /// Open ports with their service labels.
    pub open_ports: Vec<ProbeOutcome>,
}

impl ScanReport {
    /// `(port, service label)` pairs for every open port, in port order.
    pub fn entries(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.open_ports
            .iter()
            .map(|o| (o.port.as_u16(), o.service_label()))
    }

    /// Open port numbers in ascending order.
    pub fn ports(&self) -> Vec<u16> {
        self.open_ports.iter().map(|o| o.port.as_u16()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.open_ports.is_empty()
    }

    /// One-line summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {} open of {} scanned [{:.2}s]",
            self.target,
            self.ip_address,
            self.open_ports.len(),
            self.ports_scanned,
            self.duration_ms as f64 / 1000.0
        )
    }
}

/// Runs probes over a target set and builds the report.
pub struct Coordinator {
    probe: Arc<dyn Probe>,
    pool: WorkerPool,
    progress: Option<ProgressBar>,
}

impl Coordinator {
    /// Create a coordinator with `max_concurrency` worker slots.
    ///
    /// Fails with [`ConfigError::ZeroConcurrency`](crate::error::ConfigError::ZeroConcurrency)
    /// when `max_concurrency` is zero.
    pub fn new(probe: Arc<dyn Probe>, max_concurrency: usize) -> ConfigResult<Self> {
        Ok(Self {
            probe,
            pool: WorkerPool::new(max_concurrency)?,
            progress: None,
        })
    }

    /// Report per-probe progress on the given bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Probe every port in `ports` on `target`.
    pub async fn scan(&self, target: &ScanTarget, ports: TargetPortSet) -> ScanResult<ScanReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let ports_scanned = ports.len();
        let port_range = ports.range().to_string();
        let extra_ports = ports.extra_count();

        info!(
            host = %target,
            ports = ports_scanned,
            range = %port_range,
            extras = extra_ports,
            workers = self.pool.size(),
            "starting scan"
        );

        if let Some(pb) = &self.progress {
            pb.set_length(ports_scanned as u64);
        }

        let mut open_ports = self
            .pool
            .run(Arc::clone(&self.probe), target.ip, ports, self.progress.as_ref())
            .await?;
        open_ports.sort_by_key(|o| o.port);

        if let Some(pb) = &self.progress {
            pb.finish_with_message("Scan complete");
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(open = open_ports.len(), duration_ms, "scan complete");

        Ok(ScanReport {
            target: target.original.clone(),
            ip_address: target.ip.to_string(),
            port_range,
            extra_ports,
            ports_scanned,
            started_at,
            duration_ms,
            open_ports,
        })
    }
}

/// Execute a complete port scan.
///
/// Configuration errors and host resolution failures are returned before
/// any port is probed.
pub async fn run_scan(config: &ScanConfig) -> ScanResult<ScanReport> {
    run_scan_with_progress(config, None).await
}

/// Like [`run_scan`], updating `progress` as probes complete.
pub async fn run_scan_with_progress(
    config: &ScanConfig,
    progress: Option<ProgressBar>,
) -> ScanResult<ScanReport> {
    let ports = config.target_ports()?;
    let target = ScanTarget::resolve(&config.host).await?;

    let probe = Arc::new(TcpConnectProbe::new(config.connect_timeout));
    let coordinator = Coordinator::new(probe, config.max_concurrency)?;
    let coordinator = match progress {
        Some(pb) => coordinator.with_progress(pb),
        None => coordinator,
    };

    coordinator.scan(&target, ports).await
}
