//! Simulated diagnostics source for standalone runs.
//!
//! Without a real mesh stack underneath, the binary still needs counters
//! to report and neighbors to curate. This source evolves a small seeded
//! world on every query: counters creep upward, link metrics and RSSI
//! drift, and one neighbor is designated the parent. The same seed
//! replays the same world.

use monitor_report::{DiagError, Diagnostics};
use monitor_wire::{MacStatistics, NeighborEntry, NodeAddress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Neighbors the simulated mesh exposes; more than the curated table
/// holds, so eviction is exercised.
const SIM_NEIGHBORS: usize = 6;

/// Shared network prefix of the simulated mesh.
const SIM_PREFIX: [u8; 8] = [0xFD, 0x00, 0x6D, 0x65, 0x73, 0x68, 0x00, 0x01];

/// Seeded, self-advancing diagnostics world.
pub struct SimDiagnostics {
    state: Mutex<SimState>,
    parent: NodeAddress,
}

struct SimState {
    rng: StdRng,
    stats: MacStatistics,
    neighbors: Vec<NeighborEntry>,
}

fn sim_address(index: u8) -> NodeAddress {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&SIM_PREFIX);
    bytes[8..].copy_from_slice(&[0x02, 0x00, 0x00, 0xFF, 0xFE, 0x00, 0x00, index]);
    NodeAddress(bytes)
}

impl SimDiagnostics {
    /// Build a world from `seed`. The parent is always the first
    /// simulated neighbor.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let neighbors = (0..SIM_NEIGHBORS as u8)
            .map(|i| NeighborEntry {
                addr: sim_address(i + 1),
                link_metric: rng.gen_range(128..2048),
                link_metric_samples: rng.gen_range(1..32),
                rssi: rng.gen_range(-95..-40),
            })
            .collect::<Vec<_>>();
        let parent = neighbors[0].addr;

        Self {
            state: Mutex::new(SimState {
                rng,
                stats: MacStatistics::default(),
                neighbors,
            }),
            parent,
        }
    }
}

impl SimState {
    fn advance(&mut self) {
        let s = &mut self.stats;
        s.tx_all_nodes_llmc_packets = s.tx_all_nodes_llmc_packets.wrapping_add(self.rng.gen_range(0..4));
        s.tx_unicast_packets = s.tx_unicast_packets.wrapping_add(self.rng.gen_range(0..16));
        s.tx_custom_llmc_packets = s.tx_custom_llmc_packets.wrapping_add(self.rng.gen_range(0..2));
        s.rx_all_nodes_llmc_packets = s.rx_all_nodes_llmc_packets.wrapping_add(self.rng.gen_range(0..8));
        s.rx_unicast_packets = s.rx_unicast_packets.wrapping_add(self.rng.gen_range(0..16));
        s.rx_custom_llmc_packets = s.rx_custom_llmc_packets.wrapping_add(self.rng.gen_range(0..2));
        s.rx_missed_slots = s.rx_missed_slots.wrapping_add(self.rng.gen_range(0..3));
        s.rx_not_for_us_packets = s.rx_not_for_us_packets.wrapping_add(self.rng.gen_range(0..8));
        s.tx_dropped = s.tx_dropped.wrapping_add(u16::from(self.rng.gen_bool(0.05)));
        s.tx_failed = s.tx_failed.wrapping_add(u16::from(self.rng.gen_bool(0.02)));
        s.used_tx_queue = self.rng.gen_range(0..8);

        for neighbor in &mut self.neighbors {
            let drift = self.rng.gen_range(-32i32..=32);
            neighbor.link_metric =
                (i32::from(neighbor.link_metric) + drift).clamp(128, 4096) as u16;
            neighbor.rssi = (i32::from(neighbor.rssi) + self.rng.gen_range(-2i32..=2))
                .clamp(-100, -30) as i16;
            neighbor.link_metric_samples = neighbor.link_metric_samples.saturating_add(1);
        }
    }
}

impl Diagnostics for SimDiagnostics {
    fn mac_statistics(&self) -> Result<MacStatistics, DiagError> {
        let mut state = self.state.lock().map_err(|_| DiagError::Unavailable)?;
        state.advance();
        Ok(state.stats)
    }

    fn visit_neighbors(&self, visit: &mut dyn FnMut(&NeighborEntry)) -> Result<(), DiagError> {
        let state = self.state.lock().map_err(|_| DiagError::Unavailable)?;
        for neighbor in &state.neighbors {
            visit(neighbor);
        }
        Ok(())
    }

    fn parent_address(&self) -> Option<NodeAddress> {
        Some(self.parent)
    }
}
