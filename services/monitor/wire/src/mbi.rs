//! Multi-byte integer (MBI) encoding.
//!
//! Unsigned values are carried as 7-bit groups, one group per byte, most
//! significant group first, with the high bit of each byte acting as a
//! continuation flag. Leading all-zero groups are omitted, so `0..=127`
//! take a single byte and a full `u32` takes five:
//!
//! ```text
//! 259 = 0b10_0000011  ->  10000010 00000011  ->  0x82 0x03
//! ```
//!
//! Decoding accepts any sequence of up to five groups; inputs that carry a
//! continuation flag into a sixth group are rejected as overlong rather
//! than silently wrapped in the accumulator.

use crate::WireError;
use bytes::BufMut;
use smallvec::SmallVec;

/// Maximum number of 7-bit groups a `u32` can occupy.
pub const MAX_GROUPS: usize = 5;

/// Number of bytes `value` occupies when MBI-encoded.
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x001F_FFFF => 3,
        0x0020_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// MBI encoding of `value` as a standalone byte sequence.
pub fn encode(value: u32) -> SmallVec<[u8; MAX_GROUPS]> {
    // Collect groups least-significant first, then flip: the wire wants
    // the most significant group first, continuation flag on all but the
    // last byte.
    let mut out: SmallVec<[u8; MAX_GROUPS]> = SmallVec::new();
    let mut rest = value;
    loop {
        out.push((rest & 0x7F) as u8);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    out.reverse();
    let last = out.len() - 1;
    for group in &mut out[..last] {
        *group |= 0x80;
    }
    out
}

/// Append the MBI encoding of `value` to `buf`.
pub fn encode_into<B: BufMut>(buf: &mut B, value: u32) {
    buf.put_slice(&encode(value));
}

/// Decode one MBI value from `data` starting at `*pos`, advancing `*pos`
/// past the consumed bytes.
///
/// Running out of input before the final group is [`WireError::Truncated`];
/// a sixth continuation group is [`WireError::Overlong`]. A five-group
/// sequence wider than 32 bits keeps only the low 32 (the accumulator
/// width bounds the value, not the group count).
pub fn decode(data: &[u8], pos: &mut usize) -> Result<u32, WireError> {
    let mut result: u32 = 0;
    for _ in 0..MAX_GROUPS {
        let byte = *data.get(*pos).ok_or(WireError::Truncated)?;
        *pos += 1;
        result = (result << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(WireError::Overlong)
}
