//! Live configuration state and per-tick report assembly.

use crate::{DiagError, Diagnostics};
use bytes::Bytes;
use monitor_topology::NeighborTable;
use monitor_wire::{ReportBuilder, ReportingConfig, WireError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Shared handle to the live reporting configuration.
///
/// The configuration is a single value replaced as a whole: the decoder
/// parses a datagram into a fresh [`ReportingConfig`] and swaps it in, so
/// a tick that snapshots the value mid-update still sees a consistent
/// configuration, and a failed parse changes nothing.
///
/// Cloning the store clones the handle; all clones observe the same
/// configuration.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    tx: Arc<watch::Sender<ReportingConfig>>,
}

impl ConfigStore {
    /// Create a store holding `initial`.
    pub fn new(initial: ReportingConfig) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> ReportingConfig {
        *self.tx.borrow()
    }

    /// Watch for configuration replacements.
    pub fn subscribe(&self) -> watch::Receiver<ReportingConfig> {
        self.tx.subscribe()
    }

    /// Parse a configuration datagram and swap the result in.
    ///
    /// On error the live configuration is untouched and the datagram is
    /// the caller's to drop.
    pub fn apply_datagram(&self, data: &[u8]) -> Result<ReportingConfig, WireError> {
        let next = self.current().apply_datagram(data)?;
        self.tx.send_replace(next);
        Ok(next)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ReportingConfig::default())
    }
}

/// Builds one report per tick from diagnostics snapshots.
pub struct Reporter {
    diag: Arc<dyn Diagnostics>,
}

impl Reporter {
    /// Create a reporter over the given diagnostics source.
    pub fn new(diag: Arc<dyn Diagnostics>) -> Self {
        Self { diag }
    }

    /// Assemble the report for one tick, at most `max_len` bytes.
    ///
    /// Unavailable statistics or neighbor info degrade to omitted
    /// records; only a budget too small for the terminator is an error,
    /// and it aborts this tick only.
    pub fn build_report(
        &self,
        config: &ReportingConfig,
        max_len: usize,
    ) -> Result<Bytes, WireError> {
        let stats = match self.diag.mac_statistics() {
            Ok(stats) => Some(stats),
            Err(DiagError::Unavailable) => {
                debug!("mac statistics unavailable this tick");
                None
            }
        };

        let mut table = NeighborTable::new(self.diag.parent_address());
        if let Err(DiagError::Unavailable) =
            self.diag.visit_neighbors(&mut |neighbor| table.observe(*neighbor))
        {
            debug!("neighbor info unavailable this tick");
            table = NeighborTable::new(None);
        }

        ReportBuilder::new(config)
            .mac_stats(stats.as_ref())
            .neighbors(table.entries())
            .build(max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_wire::{
        MacStatistics, NeighborEntry, NodeAddress, RecordId, RecordIter, RecordSet,
    };

    struct ScriptedDiag {
        stats: Option<MacStatistics>,
        neighbors: Vec<NeighborEntry>,
        parent: Option<NodeAddress>,
    }

    impl Diagnostics for ScriptedDiag {
        fn mac_statistics(&self) -> Result<MacStatistics, DiagError> {
            self.stats.ok_or(DiagError::Unavailable)
        }

        fn visit_neighbors(
            &self,
            visit: &mut dyn FnMut(&NeighborEntry),
        ) -> Result<(), DiagError> {
            for neighbor in &self.neighbors {
                visit(neighbor);
            }
            Ok(())
        }

        fn parent_address(&self) -> Option<NodeAddress> {
            self.parent
        }
    }

    fn neighbor(suffix: u8, link_metric: u16) -> NeighborEntry {
        let mut addr = [0xFD; 16];
        addr[15] = suffix;
        NeighborEntry {
            addr: NodeAddress(addr),
            link_metric,
            link_metric_samples: 2,
            rssi: -55,
        }
    }

    fn record_ids(report: &[u8]) -> Vec<Option<RecordId>> {
        RecordIter::new(report)
            .map(|r| r.unwrap().record_id())
            .collect()
    }

    #[test]
    fn test_store_swaps_whole_value() {
        let store = ConfigStore::default();
        let before = store.current();

        let applied = store.apply_datagram(&[0x02, 0x05, 0x03, 0x41, 0x07]).unwrap();
        assert_eq!(store.current(), applied);
        assert_ne!(store.current(), before);
    }

    #[test]
    fn test_store_keeps_value_on_bad_datagram() {
        let store = ConfigStore::default();
        let before = store.current();

        // Interval zero is rejected.
        assert!(store.apply_datagram(&[0x01, 0x00, 0x03]).is_err());
        assert_eq!(store.current(), before);

        // Truncated mid field-mask list.
        assert!(store.apply_datagram(&[0x01, 0x05, 0x03, 0x7F]).is_err());
        assert_eq!(store.current(), before);
    }

    #[test]
    fn test_store_notifies_subscribers() {
        let store = ConfigStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.apply_datagram(&[0x02, 0x05, 0x03, 0x41, 0x07]).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().send_interval_min, 5);
    }

    #[test]
    fn test_config_message_can_disable_every_record() {
        let store = ConfigStore::default();
        // version 0, interval 1, no records selected
        store.apply_datagram(&[0x00, 0x01, 0x00]).unwrap();

        let diag = ScriptedDiag {
            stats: Some(MacStatistics::default()),
            neighbors: vec![neighbor(1, 10)],
            parent: None,
        };
        let reporter = Reporter::new(Arc::new(diag));
        let report = reporter.build_report(&store.current(), 150).unwrap();
        assert_eq!(report.as_ref(), &[0x00]);
    }

    #[test]
    fn test_report_carries_curated_neighbors() {
        let parent = neighbor(0, 999);
        let diag = ScriptedDiag {
            stats: Some(MacStatistics::default()),
            // Six neighbors, parent worst; only four fit.
            neighbors: vec![
                parent,
                neighbor(1, 10),
                neighbor(2, 20),
                neighbor(3, 30),
                neighbor(4, 40),
                neighbor(5, 5),
            ],
            parent: Some(parent.addr),
        };
        let reporter = Reporter::new(Arc::new(diag));
        let config = ReportingConfig::default();

        let report = reporter.build_report(&config, 150).unwrap();
        let ids = record_ids(&report);
        assert_eq!(ids, vec![Some(RecordId::MacStats), Some(RecordId::Neighbors)]);

        // Neighbor payload: 1 mask byte + 8 prefix + 4 * (8 + 5 fields).
        let records: Vec<_> = RecordIter::new(&report).map(Result::unwrap).collect();
        assert_eq!(records[1].payload.len(), 1 + 8 + 4 * 13);
        // The parent's suffix is still present despite its metric.
        assert!(records[1]
            .payload
            .windows(8)
            .any(|w| w == parent.addr.suffix()));
    }

    #[test]
    fn test_unavailable_stats_omit_record_only() {
        let diag = ScriptedDiag {
            stats: None,
            neighbors: vec![neighbor(1, 10)],
            parent: None,
        };
        let reporter = Reporter::new(Arc::new(diag));
        let config = ReportingConfig::default();

        let report = reporter.build_report(&config, 150).unwrap();
        assert_eq!(record_ids(&report), vec![Some(RecordId::Neighbors)]);
    }

    #[test]
    fn test_no_neighbors_omit_record_only() {
        let diag = ScriptedDiag {
            stats: Some(MacStatistics::default()),
            neighbors: vec![],
            parent: None,
        };
        let reporter = Reporter::new(Arc::new(diag));
        let config = ReportingConfig::default();

        let report = reporter.build_report(&config, 150).unwrap();
        assert_eq!(record_ids(&report), vec![Some(RecordId::MacStats)]);
    }

    #[test]
    fn test_identical_inputs_identical_reports() {
        let diag = Arc::new(ScriptedDiag {
            stats: Some(MacStatistics {
                tx_unicast_packets: 17,
                ..MacStatistics::default()
            }),
            neighbors: vec![neighbor(1, 10), neighbor(2, 20)],
            parent: None,
        });
        let reporter = Reporter::new(diag);
        let mut config = ReportingConfig::default();
        config.version = 4;
        config.records |= RecordSet::CONFIG_VERSION;

        let a = reporter.build_report(&config, 150).unwrap();
        let b = reporter.build_report(&config, 150).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            record_ids(&a),
            vec![
                Some(RecordId::ConfigVersion),
                Some(RecordId::MacStats),
                Some(RecordId::Neighbors)
            ]
        );
    }
}
