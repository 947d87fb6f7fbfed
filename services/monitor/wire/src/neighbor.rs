//! Neighbor observations as carried by the neighbor-info record.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Field-selection mask for the neighbor-info record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NeighborFields: u32 {
        /// Link metric (path cost estimate, lower is better)
        const LINK_METRIC = 1 << 0;
        /// Number of link metric measurements behind the estimate
        const SAMPLE_COUNT = 1 << 1;
        /// Signed received signal strength
        const RSSI = 1 << 2;
    }
}

impl NeighborFields {
    /// Payload bytes one neighbor occupies beyond its 8-byte address
    /// suffix, for the selected fields.
    pub fn encoded_width(self) -> usize {
        let metric = if self.contains(Self::LINK_METRIC) { 2 } else { 0 };
        let samples = usize::from(self.contains(Self::SAMPLE_COUNT));
        let rssi = if self.contains(Self::RSSI) { 2 } else { 0 };
        metric + samples + rssi
    }
}

/// 128-bit mesh node address.
///
/// All nodes of one mesh share the upper 8 bytes (the network prefix); the
/// lower 8 bytes identify the node. The neighbor record exploits this by
/// sending the prefix once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress(pub [u8; 16]);

impl NodeAddress {
    /// Address width in bytes.
    pub const LEN: usize = 16;

    /// The shared network prefix (upper 8 bytes).
    pub fn prefix(&self) -> &[u8] {
        &self.0[..8]
    }

    /// The node-specific suffix (lower 8 bytes).
    pub fn suffix(&self) -> &[u8] {
        &self.0[8..]
    }
}

impl From<[u8; 16]> for NodeAddress {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.0.chunks(2).enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:02x}{:02x}", chunk[0], chunk[1])?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One observed neighbor, produced by the diagnostics layer during a
/// single per-tick iteration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborEntry {
    /// Neighbor address
    pub addr: NodeAddress,
    /// Link metric toward this neighbor (lower is better)
    pub link_metric: u16,
    /// Measurements behind the link metric estimate
    pub link_metric_samples: u8,
    /// Signed received signal strength
    pub rssi: i16,
}
