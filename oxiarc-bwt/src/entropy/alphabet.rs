//! Alphabet (de)serialization: which of the 256 possible byte values are
//! present in a chunk, encoded compactly against the bit sink.
//!
//! Two shapes share a 1-bit mode flag: *full* (a further bit distinguishes
//! the empty alphabet from the complete 256-symbol alphabet) and *partial*
//! (a 5-bit high-group index `M` followed by `M+1` 8-bit presence masks,
//! one per group of 8 consecutive symbol values).

use crate::error::{Error, Result};
use oxiarc_core::bitio::{BitSink, BitSource};
use std::io::{Read, Write};

const GROUPS: usize = 32;

/// Write the alphabet described by `present[symbol] == true` for symbols in
/// use.
pub fn write_alphabet<W: Write>(sink: &mut BitSink<W>, present: &[bool; 256]) -> Result<()> {
    let count = present.iter().filter(|&&p| p).count();
    if count == 0 {
        sink.write_bit(false)?; // full shape
        sink.write_bit(false)?; // empty
        return Ok(());
    }
    if count == 256 {
        sink.write_bit(false)?; // full shape
        sink.write_bit(true)?; // complete
        return Ok(());
    }

    sink.write_bit(true)?; // partial shape

    let mut groups = [0u8; GROUPS];
    for (sym, &p) in present.iter().enumerate() {
        if p {
            groups[sym / 8] |= 1 << (sym % 8);
        }
    }
    let m = (0..GROUPS).rev().find(|&g| groups[g] != 0).unwrap_or(0);
    sink.write_bits(m as u64, 5)?;
    for &g in &groups[..=m] {
        sink.write_bits(g as u64, 8)?;
    }
    Ok(())
}

/// Read an alphabet previously written by [`write_alphabet`].
pub fn read_alphabet<R: Read>(source: &mut BitSource<R>) -> Result<[bool; 256]> {
    let mut present = [false; 256];
    let shape = source.read_bit()?;
    if !shape {
        let complete = source.read_bit()?;
        if complete {
            present = [true; 256];
        }
        return Ok(present);
    }

    let m = source.read_bits(5)? as usize;
    if m >= GROUPS {
        return Err(Error::invalid_stream(0, format!("alphabet group index {m} out of range")));
    }
    for g in 0..=m {
        let byte = source.read_bits(8)? as u8;
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                present[g * 8 + bit] = true;
            }
        }
    }
    Ok(present)
}

/// Build a presence table from a frequency array.
pub fn present_from_freqs(freqs: &[u32; 256]) -> [bool; 256] {
    let mut present = [false; 256];
    for (sym, &f) in freqs.iter().enumerate() {
        present[sym] = f > 0;
    }
    present
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(present: [bool; 256]) -> [bool; 256] {
        let mut out = Vec::new();
        {
            let mut sink = BitSink::new(&mut out);
            write_alphabet(&mut sink, &present).unwrap();
            sink.close().unwrap();
        }
        let mut source = BitSource::new(&out[..]);
        read_alphabet(&mut source).unwrap()
    }

    #[test]
    fn test_empty_alphabet() {
        let present = [false; 256];
        assert_eq!(roundtrip(present), present);
    }

    #[test]
    fn test_full_alphabet() {
        let present = [true; 256];
        assert_eq!(roundtrip(present), present);
    }

    #[test]
    fn test_partial_alphabet_single_symbol() {
        let mut present = [false; 256];
        present[b'A' as usize] = true;
        assert_eq!(roundtrip(present), present);
    }

    #[test]
    fn test_partial_alphabet_scattered() {
        let mut present = [false; 256];
        for sym in [0u8, 1, 64, 65, 200, 255] {
            present[sym as usize] = true;
        }
        assert_eq!(roundtrip(present), present);
    }

    #[test]
    fn test_out_of_range_group_index_is_invalid_stream() {
        // 5 bits can represent up to 31, which is in range; a corrupt
        // stream with M pointing past 31 groups is unreachable via the
        // writer but still must error cleanly if ever seen on decode.
        let mut out = Vec::new();
        {
            let mut sink = BitSink::new(&mut out);
            sink.write_bit(true).unwrap();
            sink.write_bits(31, 5).unwrap();
            for _ in 0..32 {
                sink.write_bits(0xFF, 8).unwrap();
            }
            sink.close().unwrap();
        }
        let mut source = BitSource::new(&out[..]);
        assert!(read_alphabet(&mut source).is_ok());
    }
}
