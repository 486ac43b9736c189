//! TCP connect probe.
//!
//! Completes a full TCP handshake using the operating system's socket API
//! and closes the connection immediately. No application data is sent or
//! read.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{PortStatus, Probe};
use crate::types::Port;
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{trace, warn};

/// TCP connect probe with a fixed per-attempt timeout.
///
/// Each call owns its socket for the duration of the attempt. The socket is
/// released on every exit path: dropped after a successful connect, closed
/// by the OS on error, or dropped with the connect future on timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectProbe {
    timeout: Duration,
}

impl TcpConnectProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    async fn probe(&self, target: IpAddr, port: Port) -> ScanResult<PortStatus> {
        let addr = SocketAddr::new(target, port.as_u16());

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(PortStatus::Open)
            }
            Ok(Err(e)) if is_network_failure(&e) => {
                trace!(%addr, error = %e, "port closed");
                Ok(PortStatus::Closed)
            }
            Ok(Err(e)) => {
                warn!(%addr, error = %e, "unexpected socket error");
                Err(ScanError::Probe {
                    port: port.as_u16(),
                    source: e,
                })
            }
            Err(_) => {
                trace!(%addr, "connect timed out");
                Ok(PortStatus::Closed)
            }
        }
    }
}

/// Whether an I/O error is an ordinary "nobody is listening here" outcome.
///
/// Anything outside this set (descriptor exhaustion, invalid input, ...)
/// points at a local problem and must not be reported as a closed port.
pub(crate) fn is_network_failure(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
            | ErrorKind::NetworkDown
            | ErrorKind::AddrNotAvailable
            | ErrorKind::NotConnected
            | ErrorKind::PermissionDenied
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn probe() -> TcpConnectProbe {
        TcpConnectProbe::new(Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let status = probe().probe(LOCALHOST, port).await.unwrap();
        assert_eq!(status, PortStatus::Open);
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        // Bind then release to get a port nobody is listening on.
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let status = probe().probe(LOCALHOST, port).await.unwrap();
        assert_eq!(status, PortStatus::Closed);
    }

    #[test]
    fn test_network_failures_classified() {
        for kind in [
            ErrorKind::ConnectionRefused,
            ErrorKind::TimedOut,
            ErrorKind::HostUnreachable,
            ErrorKind::NetworkUnreachable,
        ] {
            assert!(is_network_failure(&io::Error::from(kind)), "{kind:?}");
        }
    }

    #[test]
    fn test_unexpected_errors_not_swallowed() {
        for kind in [ErrorKind::InvalidInput, ErrorKind::OutOfMemory, ErrorKind::Other] {
            assert!(!is_network_failure(&io::Error::from(kind)), "{kind:?}");
        }
    }
}
