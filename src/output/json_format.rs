//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print a report in JSON format to stdout.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), report)
}

/// Write a report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::other)?;
    writeln!(out)
}
