//! Seams toward the surrounding mesh stack.

use monitor_wire::{MacStatistics, NeighborEntry, NodeAddress};
use thiserror::Error;

/// Diagnostics query failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagError {
    /// The underlying layer has nothing to report right now
    #[error("diagnostics unavailable")]
    Unavailable,
}

/// What the reporting tick needs from the surrounding mesh stack.
///
/// All three queries answer synchronously; `visit_neighbors` invokes the
/// callback once per currently known neighbor and returns before the tick
/// proceeds to assembly. An [`DiagError::Unavailable`] answer means the
/// corresponding record is omitted from this tick's report, nothing more.
pub trait Diagnostics: Send + Sync {
    /// Snapshot of the MAC-layer counters.
    fn mac_statistics(&self) -> Result<MacStatistics, DiagError>;

    /// Iterate over the currently known neighbors.
    fn visit_neighbors(&self, visit: &mut dyn FnMut(&NeighborEntry)) -> Result<(), DiagError>;

    /// Address of the current upstream parent, if the node has joined.
    fn parent_address(&self) -> Option<NodeAddress>;
}
