//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `zenithscan scan` - Scan a host for open TCP ports
//! - `zenithscan settings show|path|init` - Manage scan defaults
//! - `zenithscan services` - List the well-known service table

mod scan;
mod services;
mod settings;

pub use scan::ScanCommand;
pub use services::ServicesCommand;
pub use settings::{SettingsAction, SettingsCommand};

use crate::config::AppSettings;
use crate::error::CliResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ZenithScan - local security-posture scanner.
///
/// Probes a host for open TCP ports with a bounded pool of concurrent
/// connect attempts and reports each open port with its well-known
/// service name.
#[derive(Parser, Debug)]
#[command(name = "zenithscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local security-posture scanner", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (info logs, progress bar)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file (defaults to the XDG config location)
    #[arg(long, global = true, value_name = "PATH", env = "ZENITHSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load settings from `--config` or the default location.
    pub fn load_settings(&self) -> CliResult<AppSettings> {
        Ok(AppSettings::load_or_default(self.config.as_deref())?)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a host for open TCP ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Show or initialize scan defaults
    Settings(SettingsCommand),

    /// List known port to service mappings
    Services(ServicesCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from([
            "zenithscan",
            "scan",
            "--host",
            "10.0.0.2",
            "-s",
            "20",
            "-e",
            "30",
            "-x",
            "3389,5432",
            "-o",
            "json",
        ])
        .unwrap();

        let Commands::Scan(scan) = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(scan.host.as_deref(), Some("10.0.0.2"));
        assert_eq!(scan.start_port, Some(20));
        assert_eq!(scan.end_port, Some(30));
        assert_eq!(scan.extra_ports, Some(vec![3389, 5432]));
        assert_eq!(scan.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["zenithscan", "-v", "-q", "services"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
