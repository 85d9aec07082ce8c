//! Unsigned varint: base-128, little-endian 7-bit groups, continuation flag
//! in bit 7 of each group.

use crate::error::Result;
use oxiarc_core::bitio::{BitSink, BitSource};
use std::io::{Read, Write};

/// Write `value` as a varint directly against a bit sink, one 8-bit group
/// at a time.
pub fn write_varint_bits<W: Write>(sink: &mut BitSink<W>, mut value: u64) -> Result<()> {
    loop {
        let mut byte = (value & 0x7F) as u64;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        sink.write_bits(byte, 8)?;
        if value == 0 {
            return Ok(());
        }
    }
}

/// Read a varint directly from a bit source.
pub fn read_varint_bits<R: Read>(source: &mut BitSource<R>) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = source.read_bits(8)?;
        value |= (byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Read a varint from `bytes` starting at `pos`, returning the value and the
/// number of bytes consumed.
pub fn read_varint(bytes: &[u8], pos: usize) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    let mut i = pos;
    loop {
        let byte = *bytes.get(i)?;
        value |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Some((value, i - pos));
        }
        shift += 7;
        if shift >= 64 {
            return None;
        }
    }
}
