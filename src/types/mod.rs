//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{Port, PortRange, TargetPortSet};
pub use target::ScanTarget;
