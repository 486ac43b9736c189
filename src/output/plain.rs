//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a report in plain text to stdout.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(&mut stdout.lock(), report)
}

/// Write a report in human-readable plain text format.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                 {} Port Scan Results",
        style("ZenithScan").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address)?;
    writeln!(
        out,
        "  {} {}",
        style("Started:").bold(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "  {} {} ports (range {} + {} extra) in {:.2}s",
        style("Scanned:").bold(),
        report.ports_scanned,
        report.port_range,
        report.extra_ports,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(out)?;

    if report.is_empty() {
        writeln!(
            out,
            "  {}",
            style("No open ports found in the scanned ranges.").dim()
        )?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<8}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for (port, service) in report.entries() {
            writeln!(
                out,
                "  {:>6}  {:<8}  {}",
                port,
                style("open").green().bold(),
                service
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {} open port(s) found",
            style(report.open_ports.len()).green().bold()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, range: &str, extras: usize, ports: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("ZenithScan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Target: {}", style("•").dim(), style(target).white().bold());
    eprintln!(
        "{} Scanning {} ports (range {} + {} extra)...",
        style("•").dim(),
        style(ports).white().bold(),
        range,
        extras
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}
