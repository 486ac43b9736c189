//! # ZenithScan - Local Security-Posture Scanner
//!
//! The core of ZenithScan is a concurrent TCP connect port scanner. Given a
//! host, a contiguous port range and a list of extra high-value ports, it
//! determines which ports accept connections using a bounded pool of
//! connect attempts, and labels open ports with well-known service names.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use zenithscan::{run_scan, ScanConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zenithscan::ScanError> {
//!     let config = ScanConfig::new("127.0.0.1")
//!         .with_range(1, 1024)
//!         .with_concurrency(100)
//!         .with_timeout(Duration::from_millis(500));
//!
//!     let report = run_scan(&config).await?;
//!     for (port, service) in report.entries() {
//!         println!("{port:>5}  {service}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`services`] - Static port to service label table
//! - [`types`] - Validated ports, the target port set, and host resolution
//! - [`scanner`] - The connect probe, the worker pool, and the coordinator
//! - [`config`] - XDG settings providing scan defaults
//! - [`output`] - Plain, JSON, and CSV report formatting
//! - [`cli`] - Command-line subcommands
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{
    run_scan, Coordinator, PortStatus, Probe, ProbeOutcome, ScanConfig, ScanReport,
    TcpConnectProbe, WorkerPool,
};
pub use types::{Port, PortRange, ScanTarget, TargetPortSet};
