//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print open ports in CSV format to stdout.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

/// Write one `port,service` row per open port, with a header.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "service"])?;
    for (port, service) in report.entries() {
        wtr.write_record([port.to_string().as_str(), service])?;
    }

    wtr.flush()
}
