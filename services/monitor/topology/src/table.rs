//! The curated neighbor table and its eviction order.

use monitor_wire::{NeighborEntry, NodeAddress};
use smallvec::SmallVec;
use tracing::trace;

/// Capacity of the curated table.
pub const MAX_NEIGHBORS: usize = 4;

/// Fixed-capacity table of the neighbors worth reporting this tick.
///
/// Observations are accepted one at a time. Below capacity every
/// observation is kept; at capacity the single worst retained entry is
/// found under the eviction preorder and replaced only if the newcomer
/// outranks it. The current parent acts as a protected sentinel in that
/// order: it is never selected for eviction while any non-parent entry
/// exists, so the uplink is always represented no matter how bad its
/// metric is.
///
/// The result of one pass is a greedy approximation of the true top-K:
/// an entry discarded early is gone even if a worse one is retained
/// later. Observations arrive once per tick, the table is rebuilt from
/// scratch each time, so the approximation never compounds.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    entries: SmallVec<[NeighborEntry; MAX_NEIGHBORS]>,
    parent: Option<NodeAddress>,
}

impl NeighborTable {
    /// Start an empty table for one observation pass.
    ///
    /// `parent` is the current upstream address, read fresh for this tick;
    /// `None` when the node has no parent (not joined yet), in which case
    /// curation is purely metric-driven.
    pub fn new(parent: Option<NodeAddress>) -> Self {
        Self {
            entries: SmallVec::new(),
            parent,
        }
    }

    /// The parent address this pass was started with.
    pub fn parent(&self) -> Option<NodeAddress> {
        self.parent
    }

    /// Whether `addr` is the current parent.
    pub fn is_parent(&self, addr: &NodeAddress) -> bool {
        self.parent.as_ref() == Some(addr)
    }

    /// Number of curated entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no observation has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The curated entries, in insertion/replacement order.
    pub fn entries(&self) -> &[NeighborEntry] {
        &self.entries
    }

    /// Feed one observation into the table.
    pub fn observe(&mut self, entry: NeighborEntry) {
        if self.entries.len() < MAX_NEIGHBORS {
            self.entries.push(entry);
            return;
        }

        let mut worst = 0;
        for i in 1..self.entries.len() {
            if self.evicts_before(&self.entries[i], &self.entries[worst]) {
                worst = i;
            }
        }

        if self.evicts_before(&self.entries[worst], &entry) {
            self.entries[worst] = entry;
        } else {
            trace!(addr = %entry.addr, link_metric = entry.link_metric, "neighbor discarded");
        }
    }

    /// Eviction preorder: `true` when `a` should be evicted before `b`.
    ///
    /// The parent compares as infinitely protected: it never ranks
    /// evictable, and it outranks anything it is compared against. For
    /// two non-parent entries the higher link metric (worse path) goes
    /// first.
    fn evicts_before(&self, a: &NeighborEntry, b: &NeighborEntry) -> bool {
        if self.is_parent(&a.addr) {
            return false;
        }
        if self.is_parent(&b.addr) {
            return true;
        }
        a.link_metric > b.link_metric
    }
}
