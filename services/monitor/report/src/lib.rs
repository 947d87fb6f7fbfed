//! Periodic report orchestration for the monitoring node.
//!
//! This crate sits between the codec core and the transport: it owns the
//! live reporting configuration (replaced wholesale whenever a valid
//! configuration datagram arrives), queries the mesh diagnostics layer
//! once per tick, curates the neighbor set, and hands the assembled
//! report bytes back to whatever sends them.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod diag;
mod schedule;
mod service;

pub use diag::{DiagError, Diagnostics};
pub use schedule::{jittered_interval, jittered_interval_with};
pub use service::{ConfigStore, Reporter};
