//! Scan subcommand implementation.
//!
//! Handles `zenithscan scan`. Flags left unset fall back to the loaded
//! settings.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{run_scan_with_progress, ScanConfig};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

/// Pool sizes above this risk exhausting file descriptors.
const HIGH_CONCURRENCY: usize = 1000;

/// Scan a host for open TCP ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Host to scan (IP address or hostname)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// First port of the range
    #[arg(short = 's', long = "start-port", value_name = "PORT")]
    pub start_port: Option<u32>,

    /// Last port of the range (inclusive)
    #[arg(short = 'e', long = "end-port", value_name = "PORT")]
    pub end_port: Option<u32>,

    /// Extra ports to probe besides the range (e.g. "3389,5432")
    #[arg(short = 'x', long = "extra-ports", value_delimiter = ',', value_name = "PORTS")]
    pub extra_ports: Option<Vec<u32>>,

    /// Do not merge any extra ports into the range
    #[arg(long, conflicts_with = "extra_ports")]
    pub no_extra: bool,

    /// Maximum number of concurrent connection attempts
    #[arg(short = 'c', long, visible_alias = "threads", short_alias = 't')]
    pub concurrency: Option<usize>,

    /// Connection timeout per port in seconds (fractions allowed, e.g. 0.5)
    #[arg(short = 'T', long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl ScanCommand {
    /// Merge explicit flags over `settings` into a scan configuration.
    pub fn scan_config(&self, settings: &AppSettings) -> ScanConfig {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| settings.default_host.clone());
        let mut config = settings.scan_config(host);

        if let Some(start) = self.start_port {
            config.start_port = start;
        }
        if let Some(end) = self.end_port {
            config.end_port = end;
        }
        if self.no_extra {
            config.extra_ports.clear();
        } else if let Some(extra) = &self.extra_ports {
            config.extra_ports = extra.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.connect_timeout = timeout;
        }

        config
    }

    /// Resolve the output format from the flag or settings.
    pub fn output_format(&self, settings: &AppSettings) -> OutputFormat {
        self.output.unwrap_or_else(|| {
            settings
                .default_output_format
                .parse()
                .unwrap_or_else(|e: String| {
                    warn!(error = %e, "ignoring default output format from settings");
                    OutputFormat::Plain
                })
        })
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let config = self.scan_config(settings);
        let format = self.output_format(settings);
        let interactive = !quiet && format == OutputFormat::Plain;

        // Validate up front so the header reflects the real target set.
        let ports = config.target_ports()?;

        if config.max_concurrency > HIGH_CONCURRENCY && !quiet {
            output::print_warning(&format!(
                "concurrency {} may exhaust file descriptors; consider lowering it",
                config.max_concurrency
            ));
        }

        if interactive {
            output::print_scan_header(
                &config.host,
                &ports.range().to_string(),
                ports.extra_count(),
                ports.len(),
            );
        }

        let progress = (interactive && verbose).then(|| {
            let pb = ProgressBar::new(ports.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        });

        let report = run_scan_with_progress(&config, progress).await?;
        output::print_report(&report, format)?;

        if interactive {
            output::print_success(&format!("Scan finished: {}", report.summary()));
        }

        Ok(())
    }
}

/// Parse a timeout given in (possibly fractional) seconds.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid timeout '{}': expected seconds, e.g. 0.5", s))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid timeout '{}'", s))
}
