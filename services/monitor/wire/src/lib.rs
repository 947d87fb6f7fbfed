//! MBI wire format for monitoring reports and configuration messages.
//!
//! This crate is the codec core of the monitoring node: it assembles the
//! periodic report datagram and decodes the configuration datagram that
//! controls what the report carries. It does no I/O; transports hand it
//! opaque byte buffers.
//!
//! ## Wire Format
//!
//! Every report is a record sequence closed by a zero byte:
//!
//! ```text
//! +----------------------+----------------------------+
//! | id (MBI)             | record type                |
//! +----------------------+----------------------------+
//! | length (MBI, <= 255) | payload bytes that follow  |
//! +----------------------+----------------------------+
//! | payload[length]      | per-record content         |
//! +----------------------+----------------------------+
//! | ... more records ... |                            |
//! +----------------------+----------------------------+
//! | 0x00                 | terminator                 |
//! +----------------------+----------------------------+
//! ```
//!
//! Ids and lengths are multi-byte integers ([`mbi`]): 7-bit groups, high
//! bit as continuation flag, most significant group first. Fixed-width
//! record fields are little-endian. Records gate their optional fields
//! behind an MBI field mask at the start of the payload, so a collector
//! can turn individual fields on and off remotely.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod cursor;
pub mod error;
pub mod mbi;
pub mod neighbor;
pub mod record;
pub mod report;
pub mod stats;

// Re-export main types
pub use config::{ReportingConfig, DEFAULT_SEND_INTERVAL_MIN};
pub use cursor::{LenSlot, ReportCursor, RECORD_OVERHEAD};
pub use error::WireError;
pub use neighbor::{NeighborEntry, NeighborFields, NodeAddress};
pub use record::{RecordId, RecordSet};
pub use report::{RawRecord, RecordIter, ReportBuilder, REPORT_TERMINATOR};
pub use stats::{MacStatistics, MacStatsFields};
