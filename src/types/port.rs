//! Port types and target set construction.
//!
//! The `Port` newtype guarantees a value in 1-65535. `PortRange` is a
//! validated inclusive range, and `TargetPortSet` is the ordered,
//! deduplicated set of ports a scan will probe.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A validated TCP port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = u16::MAX;

    /// Create a new Port, returning None for port 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Create a Port from a wider integer, returning None if out of range.
    #[inline]
    pub fn from_u32(port: u32) -> Option<Self> {
        u16::try_from(port).ok().and_then(Self::new)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// An inclusive range of ports with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range, or `None` if `start > end`.
    pub fn new(start: Port, end: Port) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Number of ports in this range. Never zero.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The ordered set of ports probed by one scan run.
///
/// Built from a contiguous range plus a list of extra high-value ports.
/// Extras outside 1-65535 are silently dropped, and extras already covered
/// by the range appear once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPortSet {
    range: PortRange,
    extra_count: usize,
    ports: Vec<Port>,
}

impl TargetPortSet {
    /// Build the target set. Pure and deterministic.
    pub fn new(range: PortRange, extra_ports: &[u32]) -> Self {
        let extras: BTreeSet<Port> = extra_ports
            .iter()
            .copied()
            .filter_map(Port::from_u32)
            .collect();

        let mut ports: BTreeSet<Port> = range.iter().collect();
        ports.extend(extras.iter().copied());

        Self {
            range,
            extra_count: extras.len(),
            ports: ports.into_iter().collect(),
        }
    }

    /// The contiguous range this set was built from.
    pub fn range(&self) -> PortRange {
        self.range
    }

    /// Number of distinct valid extra ports, including ones inside the range.
    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }
}

impl IntoIterator for TargetPortSet {
    type Item = Port;
    type IntoIter = std::vec::IntoIter<Port>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u16, end: u16) -> PortRange {
        PortRange::new(Port::new(start).unwrap(), Port::new(end).unwrap()).unwrap()
    }

    fn raw(set: &TargetPortSet) -> Vec<u16> {
        set.iter().map(Port::as_u16).collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
        assert!(Port::from_u32(65536).is_none());
        assert!(Port::from_u32(70000).is_none());
        assert_eq!(Port::from_u32(443).map(Port::as_u16), Some(443));
    }

    #[test]
    fn test_port_range() {
        assert_eq!(range(1, 100).len(), 100);
        assert_eq!(range(65535, 65535).len(), 1);
        assert_eq!(range(22, 25).to_string(), "22-25");
        assert!(PortRange::new(Port::new(10).unwrap(), Port::new(9).unwrap()).is_none());
    }

    #[test]
    fn test_invalid_extras_excluded() {
        let set = TargetPortSet::new(range(1, 10), &[0, 70000]);
        assert_eq!(raw(&set), (1..=10).collect::<Vec<_>>());
        assert_eq!(set.extra_count(), 0);
    }

    #[test]
    fn test_extras_merged_and_deduplicated() {
        let set = TargetPortSet::new(range(20, 25), &[3389, 22, 3389, 8080, 65535]);
        assert_eq!(raw(&set), vec![20, 21, 22, 23, 24, 25, 3389, 8080, 65535]);
        assert_eq!(set.extra_count(), 4);
    }

    #[test]
    fn test_sorted_when_extras_below_range() {
        let set = TargetPortSet::new(range(1000, 1002), &[80, 22]);
        assert_eq!(raw(&set), vec![22, 80, 1000, 1001, 1002]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let extras = [8443, 5432, 1, 0, 5432];
        let first = TargetPortSet::new(range(1, 50), &extras);
        let second = TargetPortSet::new(range(1, 50), &extras);
        assert_eq!(first, second);
        assert!(first.as_slice().windows(2).all(|w| w[0] < w[1]));
    }
}
