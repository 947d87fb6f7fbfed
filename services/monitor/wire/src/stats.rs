//! MAC-layer statistics carried by the statistics record.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Field-selection mask for the MAC-statistics record.
    ///
    /// Bit positions are the wire order of the fields; unknown bits are
    /// kept as received so a newer collector can enable fields this node
    /// does not know about yet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MacStatsFields: u32 {
        /// Packets sent to the all-nodes link-local multicast group
        const TX_ALL_LLMC_PACKETS = 1 << 0;
        /// Unicast packets sent
        const TX_UNICAST_PACKETS = 1 << 1;
        /// Packets sent to custom link-local multicast groups
        const TX_CUSTOM_LLMC_PACKETS = 1 << 2;
        /// Packets received on the all-nodes link-local multicast group
        const RX_ALL_LLMC_PACKETS = 1 << 3;
        /// Unicast packets received
        const RX_UNICAST_PACKETS = 1 << 4;
        /// Packets received on custom link-local multicast groups
        const RX_CUSTOM_LLMC_PACKETS = 1 << 5;
        /// Receive slots the radio failed to listen on
        const RX_MISSED_SLOTS = 1 << 6;
        /// Packets received but addressed to another node
        const RX_NOT_FOR_US_PACKETS = 1 << 7;
        /// Packets dropped before transmission
        const TX_DROPPED = 1 << 8;
        /// Transmissions that failed
        const TX_FAILED = 1 << 9;
        /// Current transmit queue depth
        const USED_TX_QUEUE = 1 << 10;
    }
}

impl MacStatsFields {
    /// Payload bytes the selected fields occupy (ten 2-byte counters plus
    /// the 1-byte queue depth when all bits are set).
    pub fn encoded_width(self) -> usize {
        let counters = (self & Self::all() & !Self::USED_TX_QUEUE)
            .bits()
            .count_ones() as usize;
        let queue = usize::from(self.contains(Self::USED_TX_QUEUE));
        counters * 2 + queue
    }
}

/// Snapshot of MAC-layer counters, as handed over by the diagnostics layer.
///
/// Counters are free-running and wrap; the collector differences successive
/// reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacStatistics {
    /// Packets sent to the all-nodes link-local multicast group
    pub tx_all_nodes_llmc_packets: u16,
    /// Unicast packets sent
    pub tx_unicast_packets: u16,
    /// Packets sent to custom link-local multicast groups
    pub tx_custom_llmc_packets: u16,
    /// Packets received on the all-nodes link-local multicast group
    pub rx_all_nodes_llmc_packets: u16,
    /// Unicast packets received
    pub rx_unicast_packets: u16,
    /// Packets received on custom link-local multicast groups
    pub rx_custom_llmc_packets: u16,
    /// Receive slots the radio failed to listen on
    pub rx_missed_slots: u16,
    /// Packets received but addressed to another node
    pub rx_not_for_us_packets: u16,
    /// Packets dropped before transmission
    pub tx_dropped: u16,
    /// Transmissions that failed
    pub tx_failed: u16,
    /// Current transmit queue depth
    pub used_tx_queue: u8,
}

impl MacStatistics {
    /// Worst-case payload width of the field block.
    pub const MAX_FIELD_BYTES: usize = 10 * 2 + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_width() {
        assert_eq!(MacStatsFields::empty().encoded_width(), 0);
        assert_eq!(MacStatsFields::all().encoded_width(), MacStatistics::MAX_FIELD_BYTES);
        assert_eq!(MacStatsFields::USED_TX_QUEUE.encoded_width(), 1);

        let two_counters = MacStatsFields::TX_UNICAST_PACKETS | MacStatsFields::RX_MISSED_SLOTS;
        assert_eq!(two_counters.encoded_width(), 4);

        // Unknown bits select nothing this node can emit.
        let with_unknown = MacStatsFields::from_bits_retain(1 << 20 | 1);
        assert_eq!(with_unknown.encoded_width(), 2);
    }

    #[test]
    fn test_known_mask_value() {
        assert_eq!(MacStatsFields::all().bits(), 0x7FF);
    }
}
