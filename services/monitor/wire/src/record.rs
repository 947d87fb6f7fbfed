//! Record identifiers and the record-selection mask.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Record types in a monitoring report or control datagram
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordId {
    /// Configuration message sent to the node
    Config = 1,
    /// MAC-layer statistics
    MacStats = 2,
    /// Curated neighbor info
    Neighbors = 4,
    /// Active configuration version, echoed for collector acks
    ConfigVersion = 6,
}

impl RecordId {
    /// Map a wire id to a known record type.
    ///
    /// Unknown ids are not an error: a report reader skips them by length.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(RecordId::Config),
            2 => Some(RecordId::MacStats),
            4 => Some(RecordId::Neighbors),
            6 => Some(RecordId::ConfigVersion),
            _ => None,
        }
    }
}

bitflags! {
    /// Record-selection mask in a configuration message.
    ///
    /// Bit positions here are selection indices, not record ids. Unknown
    /// bits are retained so a configuration written for newer firmware
    /// survives a round trip through this node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RecordSet: u32 {
        /// Emit the MAC-statistics record
        const MAC_STATS = 1 << 0;
        /// Emit the neighbor-info record
        const NEIGHBORS = 1 << 1;
        /// Emit the config-version record
        const CONFIG_VERSION = 1 << 2;
    }
}
