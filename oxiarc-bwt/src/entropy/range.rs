//! 60-bit arithmetic range coder over a static per-chunk frequency table.
//!
//! The core encode/decode loop is the carryless normalization scheme: low
//! and range live in `[0, 2^60)`/`(2^16-1, 2^60-1]`, and whenever the top 28
//! bits of `low` and `low+range` agree (or `range` has collapsed below the
//! bottom threshold, in which case `range` is forcibly re-expanded around
//! `low`), those 28 bits are flushed to the bitstream and both fields shift
//! left to make room for more precision.
//!
//! The per-chunk header (alphabet, log-scale, frequencies with the first
//! entry inferred) is handled by [`encode_chunk`]/[`decode_chunk`], which
//! also implement the one-symbol-alphabet shortcut.

use super::alphabet::{present_from_freqs, read_alphabet, write_alphabet};
use super::freq::normalize;
use super::varint::{read_varint_bits, write_varint_bits};
use crate::error::{Error, Result};
use oxiarc_core::bitio::{BitSink, BitSource};
use std::io::{Read, Write};

const TOP: u64 = (1u64 << 60) - 1;
const BOTTOM: u64 = (1u64 << 16) - 1;
const TOP_CMP: u64 = 1u64 << 32;
const SHIFT_OUT: u8 = 28;

/// Default log2 of the normalization scale used for chunk headers; the
/// header field is 3 bits wide (`log_range - 8`), so `log_range` is bounded
/// to `[8, 15]`.
pub const DEFAULT_LOG_RANGE: u8 = 12;

struct CumTable {
    /// `cum[s]` = sum of frequencies of symbols strictly less than `s`.
    cum: [u32; 257],
    /// Maps a cumulative-frequency position back to its owning symbol.
    reverse: Vec<u8>,
}

impl CumTable {
    fn build(freqs: &[u32; 256]) -> Self {
        let mut cum = [0u32; 257];
        for s in 0..256 {
            cum[s + 1] = cum[s] + freqs[s];
        }
        let mut reverse = vec![0u8; cum[256] as usize];
        for s in 0..256 {
            for slot in &mut reverse[cum[s] as usize..cum[s + 1] as usize] {
                *slot = s as u8;
            }
        }
        Self { cum, reverse }
    }

    fn symbol_for(&self, count: u32) -> u8 {
        self.reverse[(count as usize).min(self.reverse.len() - 1)]
    }
}

/// A range-coder encoder writing to `sink`.
pub struct RangeEncoder<'a, W: Write> {
    sink: &'a mut BitSink<W>,
    low: u64,
    range: u64,
}

impl<'a, W: Write> RangeEncoder<'a, W> {
    fn new(sink: &'a mut BitSink<W>) -> Self {
        Self { sink, low: 0, range: TOP }
    }

    fn encode_symbol(&mut self, cum_freq: u32, freq: u32, log_range: u8) -> Result<()> {
        self.range >>= log_range;
        self.low = self.low.wrapping_add(cum_freq as u64 * self.range);
        self.range *= freq as u64;
        self.normalize()
    }

    fn normalize(&mut self) -> Result<()> {
        loop {
            let agree = (self.low ^ self.low.wrapping_add(self.range)) < TOP_CMP;
            if !agree {
                if self.range <= BOTTOM {
                    self.range = 0u64.wrapping_sub(self.low) & BOTTOM;
                } else {
                    break;
                }
            }
            let chunk = (self.low >> 32) & ((1u64 << SHIFT_OUT) - 1);
            self.sink.write_bits(chunk, SHIFT_OUT)?;
            self.low = (self.low << SHIFT_OUT) & TOP;
            self.range <<= SHIFT_OUT;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.sink.write_bits(self.low & TOP, 60)?;
        Ok(())
    }
}

/// A range-coder decoder reading from `source`.
pub struct RangeDecoder<'a, R: Read> {
    source: &'a mut BitSource<R>,
    low: u64,
    range: u64,
    code: u64,
}

impl<'a, R: Read> RangeDecoder<'a, R> {
    fn new(source: &'a mut BitSource<R>) -> Result<Self> {
        let code = source.read_bits(60)?;
        Ok(Self { source, low: 0, range: TOP, code })
    }

    fn decode_count(&mut self, log_range: u8) -> u32 {
        self.range >>= log_range;
        ((self.code - self.low) / self.range) as u32
    }

    fn consume(&mut self, cum_freq: u32, freq: u32) -> Result<()> {
        self.low = self.low.wrapping_add(cum_freq as u64 * self.range);
        self.range *= freq as u64;
        self.normalize()
    }

    fn normalize(&mut self) -> Result<()> {
        loop {
            let agree = (self.low ^ self.low.wrapping_add(self.range)) < TOP_CMP;
            if !agree {
                if self.range <= BOTTOM {
                    self.range = 0u64.wrapping_sub(self.low) & BOTTOM;
                } else {
                    break;
                }
            }
            let bits = self.source.read_bits(SHIFT_OUT)?;
            self.code = ((self.code << SHIFT_OUT) | bits) & TOP;
            self.low = (self.low << SHIFT_OUT) & TOP;
            self.range <<= SHIFT_OUT;
        }
        Ok(())
    }
}

/// Encode `data` as a self-contained range-coded chunk: alphabet, scale,
/// frequency table (first entry inferred), then the coded symbol stream.
pub fn encode_chunk<W: Write>(sink: &mut BitSink<W>, data: &[u8]) -> Result<()> {
    let mut freqs = [0u32; 256];
    for &b in data {
        freqs[b as usize] += 1;
    }
    let present = present_from_freqs(&freqs);
    write_alphabet(sink, &present)?;
    write_varint_bits(sink, data.len() as u64)?;

    let alphabet: Vec<u8> = (0u16..256).filter(|&s| present[s as usize]).map(|s| s as u8).collect();
    if alphabet.is_empty() {
        return Ok(());
    }
    if alphabet.len() == 1 {
        // One-symbol fast path: nothing more to encode, the decoder
        // reconstructs `len` copies of the single alphabet symbol.
        return Ok(());
    }

    let log_range = DEFAULT_LOG_RANGE;
    sink.write_bits((log_range - 8) as u64, 3)?;
    let scale = 1u32 << log_range;
    let norm = normalize(&freqs, scale);

    let first = alphabet[0];
    let rest_sum: u32 = alphabet[1..].iter().map(|&s| norm[s as usize]).sum();
    debug_assert!(rest_sum < scale, "encoder invariant: inferred first frequency must stay > 0");
    for &s in &alphabet[1..] {
        write_varint_bits(sink, norm[s as usize] as u64)?;
    }

    let mut table = [0u32; 256];
    table[first as usize] = scale - rest_sum;
    for &s in &alphabet[1..] {
        table[s as usize] = norm[s as usize];
    }
    let cum_table = CumTable::build(&table);

    let mut encoder = RangeEncoder::new(sink);
    for &b in data {
        let s = b as usize;
        let cum = cum_table.cum[s];
        let freq = table[s];
        encoder.encode_symbol(cum, freq, log_range)?;
    }
    encoder.finish()
}

/// Decode a chunk previously written by [`encode_chunk`].
pub fn decode_chunk<R: Read>(source: &mut BitSource<R>) -> Result<Vec<u8>> {
    let present = read_alphabet(source)?;
    let len = read_varint_bits(source)? as usize;

    let alphabet: Vec<u8> = (0u16..256).filter(|&s| present[s as usize]).map(|s| s as u8).collect();
    if alphabet.is_empty() {
        return Ok(Vec::new());
    }
    if alphabet.len() == 1 {
        return Ok(vec![alphabet[0]; len]);
    }

    let log_range = source.read_bits(3)? as u8 + 8;
    let scale = 1u32 << log_range;

    let mut table = [0u32; 256];
    let mut rest_sum = 0u32;
    for &s in &alphabet[1..] {
        let f = read_varint_bits(source)? as u32;
        table[s as usize] = f;
        rest_sum += f;
    }
    if rest_sum >= scale {
        return Err(Error::invalid_stream(0, "inferred first frequency is non-positive"));
    }
    table[alphabet[0] as usize] = scale - rest_sum;

    let cum_table = CumTable::build(&table);
    let mut decoder = RangeDecoder::new(source)?;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let count = decoder.decode_count(log_range);
        let symbol = cum_table.symbol_for(count);
        let cum = cum_table.cum[symbol as usize];
        let freq = table[symbol as usize];
        decoder.consume(cum, freq)?;
        out.push(symbol);
    }
    Ok(out)
}
