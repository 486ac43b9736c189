//! Service detection based on well-known port numbers.
//!
//! Provides a process-wide, read-only mapping from port numbers to
//! human-readable service labels.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Label reported for ports missing from the table.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Static map of well-known ports to service labels.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (20, "FTP Data"),
        (21, "FTP Control"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (135, "RPC"),
        (139, "NetBIOS Session Service"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (445, "Microsoft-DS (SMB)"),
        (1433, "MS SQL Server"),
        (1521, "Oracle"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5000, "Dev Server"),
        (5432, "PostgreSQL"),
        (5900, "VNC"),
        (6379, "Redis"),
        (8000, "Dev Server"),
        (8080, "HTTP Alt"),
        (8443, "HTTPS Alt"),
        (27017, "MongoDB"),
    ])
});

/// Look up the service name for a given port.
///
/// Returns `None` if the port is not in the table.
pub fn service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Get the display label for the service on a port.
///
/// Returns [`UNKNOWN_SERVICE`] if the port is not recognized.
pub fn service_label(port: u16) -> &'static str {
    service_name(port).unwrap_or(UNKNOWN_SERVICE)
}

/// All known `(port, label)` pairs, sorted by port.
pub fn known_services() -> Vec<(u16, &'static str)> {
    let mut entries: Vec<_> = PORT_SERVICES.iter().map(|(&p, &s)| (p, s)).collect();
    entries.sort_unstable_by_key(|&(port, _)| port);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(service_name(22), Some("SSH"));
        assert_eq!(service_name(443), Some("HTTPS"));
        assert_eq!(service_name(3389), Some("RDP"));
        assert_eq!(service_name(5432), Some("PostgreSQL"));
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(service_name(12345), None);
        assert_eq!(service_label(12345), "Unknown");
    }

    #[test]
    fn test_known_services_sorted() {
        let entries = known_services();
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(entries.first(), Some(&(20, "FTP Data")));
    }
}
