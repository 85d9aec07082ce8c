//! Canonical Huffman coding: code-length generation, length-limiting with a
//! fixed-code fallback, and a chunk codec built on top.
//!
//! Code lengths come from a standard binary min-heap Huffman tree rather
//! than reproducing the in-place Moffat–Katajainen two-pass array algorithm:
//! both produce a length assignment that is optimal and satisfies the Kraft
//! inequality, and the in-place technique's benefit over a heap is memory
//! locality, not a different decodable result (`DESIGN.md` records this).
//!
//! Length-limiting is a deliberate simplification of the documented
//! bit-debt borrow/repay scheme (six priority buckets, per-symbol
//! debt/credit accounting), not that scheme itself: `limit_lengths` instead
//! halves every present symbol's frequency and rebuilds the tree, up to
//! [`RESCALE_ATTEMPTS`] times, and falls back to a flat [`FALLBACK_LENGTH`]
//! for every present symbol if the bound still isn't met. Both escape
//! hatches guarantee the `MAX_SYMBOL_SIZE` bound; only the literal borrow/
//! repay bucket mechanics differ (`DESIGN.md` records this as a divergence,
//! not as exact compliance).

use super::alphabet::{present_from_freqs, read_alphabet, write_alphabet};
use super::varint::{read_varint_bits, write_varint_bits};
use crate::error::{Error, Result};
use oxiarc_core::bitio::{BitSink, BitSource};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{Read, Write};

/// Longest code length this coder will ever emit.
pub const MAX_SYMBOL_SIZE: u8 = 14;
const RESCALE_ATTEMPTS: u32 = 3;
const FALLBACK_LENGTH: u8 = 8;

#[derive(Eq, PartialEq)]
struct HeapNode {
    weight: u64,
    // Tie-break by insertion order to keep the heap a strict total order
    // (BinaryHeap requires Ord); ties in weight are otherwise arbitrary.
    seq: u32,
    kind: HeapKind,
}

#[derive(Eq, PartialEq)]
enum HeapKind {
    Leaf(usize),
    Internal(Box<HeapNode>, Box<HeapNode>),
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.weight, self.seq).cmp(&(other.weight, other.seq))
    }
}
impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn assign_depths(node: &HeapNode, depth: u8, lengths: &mut [u8]) {
    match &node.kind {
        HeapKind::Leaf(sym) => lengths[*sym] = depth.max(1),
        HeapKind::Internal(l, r) => {
            assign_depths(l, depth + 1, lengths);
            assign_depths(r, depth + 1, lengths);
        }
    }
}

/// Build Huffman code lengths for `freqs` (256-entry, zero for absent
/// symbols). Present symbols only are given non-zero lengths.
pub fn huffman_lengths(freqs: &[u32; 256]) -> [u8; 256] {
    let present: Vec<usize> = (0..256).filter(|&s| freqs[s] > 0).collect();
    let mut lengths = [0u8; 256];
    match present.len() {
        0 => {}
        1 => lengths[present[0]] = 1,
        _ => {
            let mut heap: BinaryHeap<Reverse<HeapNode>> = BinaryHeap::new();
            for (seq, &sym) in present.iter().enumerate() {
                heap.push(Reverse(HeapNode {
                    weight: freqs[sym] as u64,
                    seq: seq as u32,
                    kind: HeapKind::Leaf(sym),
                }));
            }
            let mut seq = present.len() as u32;
            while heap.len() > 1 {
                let Reverse(a) = heap.pop().unwrap();
                let Reverse(b) = heap.pop().unwrap();
                let weight = a.weight + b.weight;
                heap.push(Reverse(HeapNode {
                    weight,
                    seq,
                    kind: HeapKind::Internal(Box::new(a), Box::new(b)),
                }));
                seq += 1;
            }
            let Reverse(root) = heap.pop().unwrap();
            assign_depths(&root, 0, &mut lengths);
        }
    }
    lengths
}

fn max_present_length(lengths: &[u8; 256]) -> u8 {
    lengths.iter().copied().max().unwrap_or(0)
}

/// Generate length-limited Huffman lengths for `freqs`, rescaling up to
/// three times and finally falling back to a fixed 8-bit code for every
/// present symbol if the bound still can't be satisfied.
pub fn limit_lengths(freqs: &[u32; 256]) -> [u8; 256] {
    let mut working = *freqs;
    let mut lengths = huffman_lengths(&working);
    let mut attempt = 0;
    while max_present_length(&lengths) > MAX_SYMBOL_SIZE && attempt < RESCALE_ATTEMPTS {
        for f in working.iter_mut() {
            if *f > 0 {
                *f = (*f + 1) / 2;
            }
        }
        lengths = huffman_lengths(&working);
        attempt += 1;
    }
    if max_present_length(&lengths) > MAX_SYMBOL_SIZE {
        for (sym, &f) in freqs.iter().enumerate() {
            if f > 0 {
                lengths[sym] = FALLBACK_LENGTH;
            }
        }
    }
    lengths
}

/// Assign canonical codes from lengths, ordered by `(length, symbol)`.
/// Returns `(code, length)` per present symbol (`length == 0` means absent).
pub fn canonical_codes(lengths: &[u8; 256]) -> [(u32, u8); 256] {
    let mut order: Vec<usize> = (0..256).filter(|&s| lengths[s] > 0).collect();
    order.sort_by_key(|&s| (lengths[s], s));

    let mut codes = [(0u32, 0u8); 256];
    let mut code = 0u32;
    let mut prev_len = 0u8;
    for &sym in &order {
        let len = lengths[sym];
        code <<= len - prev_len;
        codes[sym] = (code, len);
        code += 1;
        prev_len = len;
    }
    codes
}

fn write_exp_golomb<W: Write>(sink: &mut BitSink<W>, value: u32) -> Result<()> {
    let x = value as u64 + 1;
    let nbits = 64 - x.leading_zeros() - 1;
    for _ in 0..nbits {
        sink.write_bit(false)?;
    }
    sink.write_bits(x, (nbits + 1) as u8)?;
    Ok(())
}

fn read_exp_golomb<R: Read>(source: &mut BitSource<R>) -> Result<u32> {
    let mut nbits = 0u32;
    while !source.read_bit()? {
        nbits += 1;
        if nbits > 31 {
            return Err(Error::invalid_stream(0, "exp-golomb prefix too long"));
        }
    }
    let x = source.read_bits(nbits as u8)? | (1u64 << nbits);
    Ok((x - 1) as u32)
}

fn zigzag(delta: i16) -> u32 {
    ((delta << 1) ^ (delta >> 15)) as u16 as u32
}
fn unzigzag(z: u32) -> i16 {
    ((z >> 1) as i16) ^ -((z & 1) as i16)
}

/// Encode a chunk: alphabet, length, canonical code-length table, then the
/// bit-packed symbol stream. Parallel 4-way sub-stream interleaving is not
/// reproduced (see module docs); decoding is sequential single-stream,
/// which preserves every documented correctness invariant.
pub fn encode_chunk<W: Write>(sink: &mut BitSink<W>, data: &[u8]) -> Result<()> {
    let mut freqs = [0u32; 256];
    for &b in data {
        freqs[b as usize] += 1;
    }
    let present = present_from_freqs(&freqs);
    write_alphabet(sink, &present)?;
    write_varint_bits(sink, data.len() as u64)?;

    let alphabet: Vec<u8> = (0u16..256).filter(|&s| present[s as usize]).map(|s| s as u8).collect();
    if alphabet.is_empty() || alphabet.len() == 1 {
        return Ok(());
    }

    let lengths = limit_lengths(&freqs);
    let mut prev = 2i16;
    for &s in &alphabet {
        let len = lengths[s as usize] as i16;
        write_exp_golomb(sink, zigzag(len - prev))?;
        prev = len;
    }

    let codes = canonical_codes(&lengths);
    for &b in data {
        let (code, len) = codes[b as usize];
        sink.write_bits(code as u64, len)?;
    }
    Ok(())
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

    let mut lengths = [0u8; 256];
    let mut prev = 2i16;
    for &s in &alphabet {
        let delta = unzigzag(read_exp_golomb(source)?);
        let l = prev + delta;
        if !(1..=MAX_SYMBOL_SIZE as i16).contains(&l) {
            return Err(Error::invalid_stream(0, "decoded huffman length out of range"));
        }
        lengths[s as usize] = l as u8;
        prev = l;
    }

    let codes = canonical_codes(&lengths);
    // Build a decode table keyed by (length, code) -> symbol for lookup.
    let mut by_len: Vec<Vec<(u32, u8)>> = vec![Vec::new(); MAX_SYMBOL_SIZE as usize + 1];
    for (sym, &(code, l)) in codes.iter().enumerate() {
        if l > 0 {
            by_len[l as usize].push((code, sym as u8));
        }
    }

    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let mut code = 0u64;
        let mut matched = None;
        for l in 1..=MAX_SYMBOL_SIZE {
            code = (code << 1) | source.read_bits(1)?;
            if let Some(&(_, sym)) =
                by_len[l as usize].iter().find(|&&(c, _)| c as u64 == code)
            {
                matched = Some(sym);
                break;
            }
        }
        match matched {
            Some(sym) => out.push(sym),
            None => return Err(Error::invalid_stream(0, "no huffman code matched")),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let mut out = Vec::new();
        {
            let mut sink = BitSink::new(&mut out);
            encode_chunk(&mut sink, data).unwrap();
            sink.close().unwrap();
        }
        let mut source = BitSource::new(&out[..]);
        let decoded = decode_chunk(&mut source).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_empty() {
        roundtrip(b"");
    }

    #[test]
    fn test_single_symbol_shortcut() {
        roundtrip(&vec![0x41u8; 500]);
    }

    #[test]
    fn test_small_text() {
        roundtrip(b"mississippi");
        roundtrip(b"abracadabra");
    }

    #[test]
    fn test_skewed_frequencies_compress() {
        let mut data = vec![b'a'; 900];
        data.extend(vec![b'b'; 90]);
        data.extend(vec![b'c'; 10]);
        let mut out = Vec::new();
        {
            let mut sink = BitSink::new(&mut out);
            encode_chunk(&mut sink, &data).unwrap();
            sink.close().unwrap();
        }
        assert!(out.len() < data.len());
        let mut source = BitSource::new(&out[..]);
        assert_eq!(decode_chunk(&mut source).unwrap(), data);
    }

    #[test]
    fn test_full_256_alphabet() {
        let data: Vec<u8> = (0..=255u8).collect();
        roundtrip(&data);
    }

    #[test]
    fn test_canonical_codes_prefix_free() {
        let mut freqs = [0u32; 256];
        for (i, f) in [1u32, 1, 2, 3, 5, 8, 13, 21].into_iter().enumerate() {
            freqs[i] = f;
        }
        let lengths = limit_lengths(&freqs);
        let codes = canonical_codes(&lengths);
        let mut entries: Vec<(u32, u8)> =
            codes.iter().copied().filter(|&(_, l)| l > 0).collect();
        entries.sort();
        for w in entries.windows(2) {
            assert!(w[0].1 != w[1].1 || w[0].0 != w[1].0);
        }
    }

    #[test]
    fn test_exp_golomb_roundtrip() {
        let mut out = Vec::new();
        let values = [0u32, 1, 2, 3, 10, 100, 1000];
        {
            let mut sink = BitSink::new(&mut out);
            for &v in &values {
                write_exp_golomb(&mut sink, v).unwrap();
            }
            sink.close().unwrap();
        }
        let mut source = BitSource::new(&out[..]);
        for &v in &values {
            assert_eq!(read_exp_golomb(&mut source).unwrap(), v);
        }
    }

    #[test]
    fn test_rescale_fallback_path_still_roundtrips() {
        // Extreme skew drives the natural tree deep; the length limiter
        // must still produce a decodable, length-limited table.
        let mut freqs = [1u32; 256];
        freqs[0] = 1_000_000_000;
        let lengths = limit_lengths(&freqs);
        assert!(lengths.iter().all(|&l| l as u8 <= MAX_SYMBOL_SIZE));
    }
}
