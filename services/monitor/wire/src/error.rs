//! Wire protocol error types.

use thiserror::Error;

/// Wire protocol errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Input ended mid-varint or mid-field
    #[error("truncated input")]
    Truncated,

    /// Varint ran past five 7-bit groups
    #[error("overlong varint")]
    Overlong,

    /// Structurally invalid configuration message
    #[error("malformed config")]
    Malformed,

    /// Record payload does not fit in a one-byte length
    #[error("record payload too large: {0}")]
    Oversize(usize),

    /// Assembled report does not fit the send buffer
    #[error("capacity exceeded: {0}")]
    Capacity(usize),
}
