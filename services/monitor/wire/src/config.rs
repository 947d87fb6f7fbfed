//! The reporting configuration and its wire codec.
//!
//! The configuration is a plain value: the decoder parses a datagram into
//! a fresh [`ReportingConfig`] and the owner swaps the whole value in, so
//! a reader can never observe a half-applied update and a failed parse
//! leaves the live configuration untouched.

use crate::{mbi, MacStatsFields, NeighborFields, RecordSet, WireError};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Reporting interval used until a configuration message arrives.
pub const DEFAULT_SEND_INTERVAL_MIN: u32 = 1;

/// Which records and fields the node reports, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Version the collector uses to acknowledge configuration changes;
    /// echoed in reports via the config-version record once nonzero
    pub version: u8,
    /// Reporting interval in minutes, at least 1
    pub send_interval_min: u32,
    /// Which records to include; unknown bits are kept as received
    pub records: RecordSet,
    /// Field selection for the MAC-statistics record
    pub mac_stats_fields: MacStatsFields,
    /// Field selection for the neighbor-info record
    pub neighbor_fields: NeighborFields,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            version: 0,
            send_interval_min: DEFAULT_SEND_INTERVAL_MIN,
            records: RecordSet::MAC_STATS | RecordSet::NEIGHBORS,
            mac_stats_fields: MacStatsFields::all(),
            neighbor_fields: NeighborFields::all(),
        }
    }
}

impl ReportingConfig {
    /// Parse a configuration datagram against the current configuration,
    /// returning the replacement value.
    ///
    /// Datagram layout: `version: u8`, `interval: mbi`, `record_mask: mbi`,
    /// then one field-mask varint per known field-bearing record bit set,
    /// in ascending bit order (MAC statistics, then neighbors; the
    /// config-version record has no fields). A record bit left clear keeps
    /// the field mask already configured for that record. Trailing bytes
    /// are ignored.
    ///
    /// `self` is never touched; on error the caller keeps the live value.
    pub fn apply_datagram(&self, data: &[u8]) -> Result<ReportingConfig, WireError> {
        let mut pos = 0;
        let version = *data.get(pos).ok_or(WireError::Truncated)?;
        pos += 1;

        let send_interval_min = mbi::decode(data, &mut pos)?;
        if send_interval_min < 1 {
            return Err(WireError::Malformed);
        }

        let records = RecordSet::from_bits_retain(mbi::decode(data, &mut pos)?);

        let mut next = ReportingConfig {
            version,
            send_interval_min,
            records,
            ..*self
        };
        if records.contains(RecordSet::MAC_STATS) {
            next.mac_stats_fields = MacStatsFields::from_bits_retain(mbi::decode(data, &mut pos)?);
        }
        if records.contains(RecordSet::NEIGHBORS) {
            next.neighbor_fields = NeighborFields::from_bits_retain(mbi::decode(data, &mut pos)?);
        }

        Ok(next)
    }

    /// Encode this configuration as a datagram (the collector side of
    /// [`ReportingConfig::apply_datagram`]).
    pub fn encode_datagram(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(1 + 3 * mbi::MAX_GROUPS);
        buf.put_u8(self.version);
        mbi::encode_into(&mut buf, self.send_interval_min);
        mbi::encode_into(&mut buf, self.records.bits());
        if self.records.contains(RecordSet::MAC_STATS) {
            mbi::encode_into(&mut buf, self.mac_stats_fields.bits());
        }
        if self.records.contains(RecordSet::NEIGHBORS) {
            mbi::encode_into(&mut buf, self.neighbor_fields.bits());
        }
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_first_boot() {
        let config = ReportingConfig::default();
        assert_eq!(config.version, 0);
        assert_eq!(config.send_interval_min, 1);
        assert_eq!(config.records, RecordSet::MAC_STATS | RecordSet::NEIGHBORS);
        assert_eq!(config.mac_stats_fields.bits(), 0x7FF);
        assert_eq!(config.neighbor_fields.bits(), 0x7);
    }

    #[test]
    fn test_apply_full_datagram() {
        let current = ReportingConfig::default();
        // version 3, every 15 minutes, both field-bearing records, narrow masks
        let datagram = [0x03, 0x0F, 0x03, 0x41, 0x05];
        let next = current.apply_datagram(&datagram).unwrap();

        assert_eq!(next.version, 3);
        assert_eq!(next.send_interval_min, 15);
        assert_eq!(next.records.bits(), 0x03);
        assert_eq!(next.mac_stats_fields.bits(), 0x41);
        assert_eq!(next.neighbor_fields.bits(), 0x05);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let current = ReportingConfig::default();
        let datagram = [0x01, 0x00, 0x03, 0x7F, 0x07];
        assert_eq!(current.apply_datagram(&datagram), Err(WireError::Malformed));
    }

    #[test]
    fn test_truncated_datagram_rejected() {
        let current = ReportingConfig::default();
        assert_eq!(current.apply_datagram(&[]), Err(WireError::Truncated));
        // Record mask promises two field masks, only one present.
        assert_eq!(
            current.apply_datagram(&[0x01, 0x05, 0x03, 0x7F]),
            Err(WireError::Truncated)
        );
    }

    #[test]
    fn test_cleared_record_bit_keeps_field_mask() {
        let mut current = ReportingConfig::default();
        current.mac_stats_fields = MacStatsFields::from_bits_retain(0x41);

        // Only the neighbor record enabled; no MAC-stats mask in the datagram.
        let next = current.apply_datagram(&[0x02, 0x01, 0x02, 0x07]).unwrap();
        assert_eq!(next.records.bits(), 0x02);
        assert_eq!(next.mac_stats_fields.bits(), 0x41);
        assert_eq!(next.neighbor_fields.bits(), 0x07);
    }

    #[test]
    fn test_unknown_record_bits_retained_masks_not_read() {
        let current = ReportingConfig::default();
        // Bits 0 and 6 set; only the MAC-stats mask follows.
        let next = current.apply_datagram(&[0x01, 0x01, 0x41, 0x03]).unwrap();
        assert_eq!(next.records.bits(), 0x41);
        assert_eq!(next.mac_stats_fields.bits(), 0x03);
        // Neighbor mask untouched.
        assert_eq!(next.neighbor_fields, NeighborFields::all());
    }

    #[test]
    fn test_roundtrip_with_encoder() {
        let config = ReportingConfig {
            version: 9,
            send_interval_min: 720,
            records: RecordSet::MAC_STATS | RecordSet::NEIGHBORS | RecordSet::CONFIG_VERSION,
            mac_stats_fields: MacStatsFields::from_bits_retain(0x2A1),
            neighbor_fields: NeighborFields::from_bits_retain(0x3),
        };
        let datagram = config.encode_datagram();
        let decoded = ReportingConfig::default().apply_datagram(&datagram).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let current = ReportingConfig::default();
        let next = current
            .apply_datagram(&[0x01, 0x01, 0x03, 0x7F, 0x07, 0xDE, 0xAD])
            .unwrap();
        assert_eq!(next.version, 1);
    }
}
