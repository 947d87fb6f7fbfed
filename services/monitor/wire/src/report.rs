//! Report assembly and parsing.
//!
//! A report is an ordered sequence of `{id, length, payload}` records
//! followed by a single zero terminator byte. Builders run in a fixed
//! order and are skip-silent: a record that is disabled, has no data, or
//! would not fit is simply absent, and a shorter report is always
//! preferred over no report. Identical inputs produce byte-identical
//! reports.

use crate::cursor::{ReportCursor, RECORD_OVERHEAD};
use crate::{
    mbi, MacStatistics, MacStatsFields, NeighborEntry, NeighborFields, RecordId, RecordSet,
    ReportingConfig, WireError,
};
use bytes::Bytes;
use tracing::trace;

/// Terminator byte closing every report; doubles as the id of an empty
/// final record.
pub const REPORT_TERMINATOR: u8 = 0x00;

/// Assembles one report datagram from a configuration snapshot plus
/// whatever the diagnostics layer produced this tick.
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    config: &'a ReportingConfig,
    mac_stats: Option<&'a MacStatistics>,
    neighbors: &'a [NeighborEntry],
}

impl<'a> ReportBuilder<'a> {
    /// Start a report for the given configuration snapshot.
    pub fn new(config: &'a ReportingConfig) -> Self {
        Self {
            config,
            mac_stats: None,
            neighbors: &[],
        }
    }

    /// Provide this tick's MAC statistics snapshot, if the diagnostics
    /// layer had one.
    pub fn mac_stats(mut self, stats: Option<&'a MacStatistics>) -> Self {
        self.mac_stats = stats;
        self
    }

    /// Provide this tick's curated neighbor entries.
    pub fn neighbors(mut self, neighbors: &'a [NeighborEntry]) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Assemble the report into at most `max_len` bytes.
    ///
    /// Fails only with [`WireError::Capacity`] when not even the
    /// terminator fits; everything else degrades to omitted records.
    pub fn build(self, max_len: usize) -> Result<Bytes, WireError> {
        let mut cur = ReportCursor::new(max_len);

        self.add_config_version(&mut cur)?;
        self.add_mac_stats(&mut cur)?;
        self.add_neighbors(&mut cur)?;

        if !cur.fits(1) {
            return Err(WireError::Capacity(cur.len() + 1));
        }
        cur.put_u8(REPORT_TERMINATOR);
        Ok(cur.freeze())
    }

    fn add_config_version(&self, cur: &mut ReportCursor) -> Result<(), WireError> {
        if !self.config.records.contains(RecordSet::CONFIG_VERSION) || self.config.version == 0 {
            return Ok(());
        }
        if !cur.fits(RECORD_OVERHEAD + 1) {
            trace!("config-version record does not fit, skipping");
            return Ok(());
        }

        let slot = cur.begin_record(RecordId::ConfigVersion as u8);
        cur.put_u8(self.config.version);
        cur.end_record(slot)
    }

    fn add_mac_stats(&self, cur: &mut ReportCursor) -> Result<(), WireError> {
        if !self.config.records.contains(RecordSet::MAC_STATS) {
            return Ok(());
        }
        let Some(stats) = self.mac_stats else {
            trace!("mac statistics unavailable, skipping record");
            return Ok(());
        };

        let mask = self.config.mac_stats_fields;
        let worst = RECORD_OVERHEAD + mbi::encoded_len(mask.bits()) + MacStatistics::MAX_FIELD_BYTES;
        if !cur.fits(worst) {
            trace!("mac-statistics record does not fit, skipping");
            return Ok(());
        }

        let slot = cur.begin_record(RecordId::MacStats as u8);
        cur.put_mbi(mask.bits());
        put_mac_fields(cur, mask, stats);
        cur.end_record(slot)
    }

    fn add_neighbors(&self, cur: &mut ReportCursor) -> Result<(), WireError> {
        if !self.config.records.contains(RecordSet::NEIGHBORS) || self.neighbors.is_empty() {
            return Ok(());
        }

        let mask = self.config.neighbor_fields;
        let per_neighbor = 8 + mask.encoded_width();
        let payload = mbi::encoded_len(mask.bits()) + 8 + self.neighbors.len() * per_neighbor;
        if payload > u8::MAX as usize {
            // One length byte caps the record; a table this size cannot be
            // emitted at all.
            trace!(neighbors = self.neighbors.len(), "neighbor record oversize, skipping");
            return Ok(());
        }
        let need = RECORD_OVERHEAD + payload;
        if !cur.fits(need) {
            trace!(
                neighbors = self.neighbors.len(),
                "neighbor record does not fit, skipping"
            );
            return Ok(());
        }

        let slot = cur.begin_record(RecordId::Neighbors as u8);
        cur.put_mbi(mask.bits());
        cur.put_slice(self.neighbors[0].addr.prefix());
        for neighbor in self.neighbors {
            put_neighbor(cur, mask, neighbor);
        }
        cur.end_record(slot)
    }
}

fn put_mac_fields(cur: &mut ReportCursor, mask: MacStatsFields, stats: &MacStatistics) {
    if mask.contains(MacStatsFields::TX_ALL_LLMC_PACKETS) {
        cur.put_u16_le(stats.tx_all_nodes_llmc_packets);
    }
    if mask.contains(MacStatsFields::TX_UNICAST_PACKETS) {
        cur.put_u16_le(stats.tx_unicast_packets);
    }
    if mask.contains(MacStatsFields::TX_CUSTOM_LLMC_PACKETS) {
        cur.put_u16_le(stats.tx_custom_llmc_packets);
    }
    if mask.contains(MacStatsFields::RX_ALL_LLMC_PACKETS) {
        cur.put_u16_le(stats.rx_all_nodes_llmc_packets);
    }
    if mask.contains(MacStatsFields::RX_UNICAST_PACKETS) {
        cur.put_u16_le(stats.rx_unicast_packets);
    }
    if mask.contains(MacStatsFields::RX_CUSTOM_LLMC_PACKETS) {
        cur.put_u16_le(stats.rx_custom_llmc_packets);
    }
    if mask.contains(MacStatsFields::RX_MISSED_SLOTS) {
        cur.put_u16_le(stats.rx_missed_slots);
    }
    if mask.contains(MacStatsFields::RX_NOT_FOR_US_PACKETS) {
        cur.put_u16_le(stats.rx_not_for_us_packets);
    }
    if mask.contains(MacStatsFields::TX_DROPPED) {
        cur.put_u16_le(stats.tx_dropped);
    }
    if mask.contains(MacStatsFields::TX_FAILED) {
        cur.put_u16_le(stats.tx_failed);
    }
    if mask.contains(MacStatsFields::USED_TX_QUEUE) {
        cur.put_u8(stats.used_tx_queue);
    }
}

fn put_neighbor(cur: &mut ReportCursor, mask: NeighborFields, neighbor: &NeighborEntry) {
    cur.put_slice(neighbor.addr.suffix());
    if mask.contains(NeighborFields::LINK_METRIC) {
        cur.put_u16_le(neighbor.link_metric);
    }
    if mask.contains(NeighborFields::SAMPLE_COUNT) {
        cur.put_u8(neighbor.link_metric_samples);
    }
    if mask.contains(NeighborFields::RSSI) {
        cur.put_i16_le(neighbor.rssi);
    }
}

/// One record as read from a received report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Wire id, possibly one this node does not know
    pub id: u32,
    /// Record payload
    pub payload: &'a [u8],
}

impl RawRecord<'_> {
    /// The known record type, if any.
    pub fn record_id(&self) -> Option<RecordId> {
        RecordId::from_raw(self.id)
    }
}

/// Iterator over the records of a received report.
///
/// Stops cleanly at the zero terminator or the end of input; unknown
/// records are yielded like any other so callers can skip them by id.
#[derive(Debug)]
pub struct RecordIter<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> RecordIter<'a> {
    /// Iterate over the records in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<RawRecord<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.data.len() {
            return None;
        }

        let id = match mbi::decode(self.data, &mut self.pos) {
            Ok(id) => id,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        if id == u32::from(REPORT_TERMINATOR) {
            self.done = true;
            return None;
        }

        let len = match mbi::decode(self.data, &mut self.pos) {
            Ok(len) => len as usize,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        if self.data.len() - self.pos < len {
            self.done = true;
            return Some(Err(WireError::Truncated));
        }

        let payload = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(Ok(RawRecord { id, payload }))
    }
}
