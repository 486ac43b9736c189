//! Error types for zenithscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Configuration errors are
//! raised before any network activity; scan errors are fatal scan-level
//! failures. Per-port network failures never appear here: the probe folds
//! them into a closed port.
//!
//! Messages do not repeat their source; callers print the whole chain.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors in scan configuration or application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("target host must not be empty")]
    EmptyHost,

    #[error("{name} {value} is out of valid range (1-65535)")]
    PortOutOfRange { name: &'static str, value: u32 },

    #[error("invalid port range: start ({start}) > end ({end})")]
    InvalidPortRange { start: u32, end: u32 },

    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,

    #[error("connect timeout must be greater than zero")]
    ZeroTimeout,

    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },

    #[error("settings file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal scan-level errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to resolve host '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("no IP addresses found for host '{0}'")]
    NoAddresses(String),

    #[error("unexpected socket error probing port {port}")]
    Probe {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("scan worker failed: {0}")]
    Worker(String),

    #[error("worker pool closed before all ports were dispatched")]
    PoolClosed,
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors surfaced by CLI command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
