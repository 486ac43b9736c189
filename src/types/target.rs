//! Scan target resolution.
//!
//! A target is given as an IP literal or a hostname. Hostnames are resolved
//! through `trust-dns-resolver` using the system resolver configuration,
//! and the first address wins.

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Resolve a host string to a single target address.
    ///
    /// IP literals are used as-is. Anything else must look like a hostname
    /// and is looked up via the system's nameservers and search domains
    /// (the hosts file is consulted first).
    pub async fn resolve(host: &str) -> ScanResult<Self> {
        let host = host.trim();

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self::new(host, ip));
        }

        if !is_valid_hostname(host) {
            return Err(ScanError::Resolution {
                host: host.to_string(),
                reason: "not an IP address or valid hostname".to_string(),
            });
        }

        let response = system_resolver()
            .lookup_ip(host)
            .await
            .map_err(|e| ScanError::Resolution {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let ip = response
            .iter()
            .next()
            .ok_or_else(|| ScanError::NoAddresses(host.to_string()))?;

        debug!(host, %ip, "resolved target");
        Ok(Self::new(host, ip))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Build a resolver from `/etc/resolv.conf` (or the platform equivalent).
///
/// Falls back to the built-in public nameservers when the system
/// configuration cannot be read.
fn system_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        warn!(error = %e, "system resolver configuration unavailable, using defaults");
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
    })
}

/// Check if a string is a syntactically valid hostname.
///
/// Underscores are accepted since hosts files and internal zones use them.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.starts_with(is_label_edge)
            && label.ends_with(is_label_edge)
            && label.chars().all(|c| is_label_edge(c) || c == '-')
    })
}

fn is_label_edge(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let target = ScanTarget::resolve("127.0.0.1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(target.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_resolve_ipv6_literal() {
        let target = ScanTarget::resolve(" ::1 ").await.unwrap();
        assert_eq!(target.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_host() {
        let result = ScanTarget::resolve("not a host!").await;
        assert!(matches!(result, Err(ScanError::Resolution { .. })));
    }

    #[tokio::test]
    async fn test_resolve_localhost_through_system_resolver() {
        let target = ScanTarget::resolve("localhost").await.unwrap();
        assert!(target.ip.is_loopback());
        assert_eq!(target.original, "localhost");
    }

    #[test]
    fn test_display_with_hostname() {
        let target = ScanTarget::new("db.local", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(target.to_string(), "db.local (10.0.0.5)");
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("my-server"));
        assert!(is_valid_hostname("my_host"));
        assert!(is_valid_hostname("_ldap._tcp.corp.internal"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("bad..dots"));
    }
}
