//! Bounded worker pool for probe fan-out.
//!
//! A semaphore holds one permit per worker slot. The dispatcher acquires a
//! permit *before* spawning each probe task, so ports beyond the pool size
//! wait in the dispatch loop until a slot frees. Open outcomes are pushed
//! into a shared accumulator, and draining the `JoinSet` is the single
//! fan-in barrier.

use crate::error::{ConfigError, ConfigResult, ScanError, ScanResult};
use crate::scanner::traits::{Probe, ProbeOutcome};
use crate::services::service_label;
use crate::types::Port;
use indicatif::ProgressBar;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

type Accumulator = Arc<Mutex<Vec<ProbeOutcome>>>;

/// A fixed-size pool of probe slots.
pub struct WorkerPool {
    size: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool with `size` concurrent slots.
    ///
    /// A zero-slot pool could never admit a probe, so it is rejected.
    pub fn new(size: usize) -> ConfigResult<Self> {
        if size == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(Self {
            size,
            permits: Arc::new(Semaphore::new(size)),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Probe every port and return the open outcomes in completion order.
    ///
    /// The first fatal probe error aborts all in-flight tasks and is
    /// returned in place of a partial result.
    pub async fn run<I>(
        &self,
        probe: Arc<dyn Probe>,
        target: IpAddr,
        ports: I,
        progress: Option<&ProgressBar>,
    ) -> ScanResult<Vec<ProbeOutcome>>
    where
        I: IntoIterator<Item = Port>,
    {
        let accumulator: Accumulator = Arc::new(Mutex::new(Vec::new()));
        let mut tasks: JoinSet<ScanResult<()>> = JoinSet::new();

        for port in ports {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .map_err(|_| ScanError::PoolClosed)?;

            // Surface fatal errors from finished workers without waiting
            // for the whole target set to be dispatched.
            while let Some(joined) = tasks.try_join_next() {
                settle(joined)?;
            }

            let probe = Arc::clone(&probe);
            let accumulator = Arc::clone(&accumulator);
            let progress = progress.cloned();

            tasks.spawn(async move {
                let _permit = permit;
                let status = probe.probe(target, port).await?;

                if status.is_open() {
                    let service = service_label(port.as_u16());
                    debug!(%port, service, "found open port");
                    if let Some(pb) = &progress {
                        pb.set_message(format!("Found open port: {} ({})", port, service));
                    }
                    accumulator.lock().await.push(ProbeOutcome::open(port, service));
                }

                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                Ok::<(), ScanError>(())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            settle(joined)?;
        }

        let outcomes = std::mem::take(&mut *accumulator.lock().await);
        Ok(outcomes)
    }
}

/// Turn a joined task result into a scan result.
fn settle(joined: Result<ScanResult<()>, JoinError>) -> ScanResult<()> {
    joined.map_err(|e| ScanError::Worker(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::PortStatus;
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TARGET: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn ports(range: std::ops::RangeInclusive<u16>) -> Vec<Port> {
        range.filter_map(Port::new).collect()
    }

    /// Counts how many probes are inside `probe` at the same time.
    #[derive(Default)]
    struct GaugeProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Probe for GaugeProbe {
        async fn probe(&self, _target: IpAddr, port: Port) -> ScanResult<PortStatus> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(15)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(if port.as_u16() % 10 == 0 {
                PortStatus::Open
            } else {
                PortStatus::Closed
            })
        }
    }

    /// Fails on one specific port with a non-network error.
    struct FailingProbe(u16);

    #[async_trait]
    impl Probe for FailingProbe {
        async fn probe(&self, _target: IpAddr, port: Port) -> ScanResult<PortStatus> {
            if port.as_u16() == self.0 {
                return Err(ScanError::Probe {
                    port: self.0,
                    source: std::io::Error::other("too many open files"),
                });
            }
            Ok(PortStatus::Closed)
        }
    }

    #[tokio::test]
    async fn test_concurrency_bounded_by_pool_size() {
        let gauge = Arc::new(GaugeProbe::default());
        let pool = WorkerPool::new(4).unwrap();

        let outcomes = pool
            .run(gauge.clone(), TARGET, ports(1..=40), None)
            .await
            .unwrap();

        assert_eq!(gauge.calls.load(Ordering::SeqCst), 40);
        assert_eq!(gauge.peak.load(Ordering::SeqCst), 4);
        assert_eq!(outcomes.len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_of_one_is_sequential() {
        let gauge = Arc::new(GaugeProbe::default());
        let pool = WorkerPool::new(1).unwrap();

        pool.run(gauge.clone(), TARGET, ports(1..=8), None)
            .await
            .unwrap();

        assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_outcomes_are_labelled() {
        let gauge = Arc::new(GaugeProbe::default());
        let pool = WorkerPool::new(8).unwrap();

        let mut outcomes = pool
            .run(gauge, TARGET, ports(75..=85), None)
            .await
            .unwrap();
        outcomes.sort_by_key(|o| o.port);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], ProbeOutcome::open(Port::new(80).unwrap(), "HTTP"));
        assert_eq!(outcomes[1].service.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_fatal_probe_error_aborts_scan() {
        let pool = WorkerPool::new(2).unwrap();
        let result = pool
            .run(Arc::new(FailingProbe(5)), TARGET, ports(1..=20), None)
            .await;

        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(ScanError::Probe { port: 5, .. })));
    }

    #[test]
    fn test_zero_sized_pool_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(ConfigError::ZeroConcurrency)));
    }

    #[tokio::test]
    async fn test_empty_port_list() {
        let pool = WorkerPool::new(3).unwrap();
        let outcomes = pool
            .run(Arc::new(GaugeProbe::default()), TARGET, Vec::<Port>::new(), None)
            .await;
        assert!(tokio_test::assert_ok!(outcomes).is_empty());
    }
}
