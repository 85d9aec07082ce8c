//! Burrows-Wheeler Transform, forward and inverse.
//!
//! Forward drives [`crate::divsufsort::suffix_array`] to build the BWT
//! permutation and, for blocks large enough, splits the block into `C = 8`
//! independent spans (each sorted and inverted on its own) instead of one
//! global suffix array with multiple entry points; `DESIGN.md` records why.
//! Inverse reconstructs the original bytes from the BWT output and one
//! primary index per chunk via an LF-mapping walk.

use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A block smaller than this always uses a single chunk (`C = 1`).
pub const CHUNKED_THRESHOLD: usize = 256;

/// Number of chunks used for blocks at or above [`CHUNKED_THRESHOLD`].
pub const CHUNK_COUNT: usize = 8;

/// Blocks larger than 1 GiB are a contract violation, not a recoverable error.
pub const MAX_BLOCK_SIZE: usize = 1 << 30;

/// Choose the chunk count for a block of `n` bytes, per §3's invariant.
pub fn chunk_count_for(n: usize) -> usize {
    if n < CHUNKED_THRESHOLD { 1 } else { CHUNK_COUNT }
}

fn chunk_bounds(n: usize, chunks: usize) -> Vec<(usize, usize)> {
    let span = n.div_ceil(chunks);
    (0..chunks)
        .map(|k| (k * span, ((k + 1) * span).min(n)))
        .filter(|&(lo, hi)| lo < hi)
        .collect()
}

/// Forward BWT. Returns the transformed bytes `L` and one primary index per
/// chunk (1-based, per §6's on-disk convention: `primary_index - 1` is the
/// stored value).
pub fn forward(input: &[u8]) -> Result<(Vec<u8>, Vec<u32>)> {
    let n = input.len();
    if n > MAX_BLOCK_SIZE {
        return Err(Error::Contract("block exceeds 1 GiB"));
    }
    if n == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    if n == 1 {
        return Ok((input.to_vec(), vec![1]));
    }

    let chunks = chunk_count_for(n);
    let bounds = chunk_bounds(n, chunks);
    let mut out = vec![0u8; n];

    let chunk_results = transform_chunks(input, &bounds);

    let mut primary_indexes = Vec::with_capacity(bounds.len());
    for ((lo, _hi), (chunk_out, primary)) in bounds.iter().zip(chunk_results) {
        out[*lo..*lo + chunk_out.len()].copy_from_slice(&chunk_out);
        primary_indexes.push(primary);
    }

    Ok((out, primary_indexes))
}

fn transform_one_chunk(span: &[u8]) -> (Vec<u8>, u32) {
    let sa = crate::divsufsort::suffix_array(span);
    let m = span.len();
    let mut chunk_out = vec![0u8; m];
    let mut primary = 0u32;
    for (i, &s) in sa.iter().enumerate() {
        chunk_out[i] = if s == 0 { span[m - 1] } else { span[s as usize - 1] };
        if s == 0 {
            primary = i as u32;
        }
    }
    (chunk_out, primary + 1)
}

/// Build each chunk's BWT independently. Chunks never share state, so with
/// the `parallel` feature enabled and more than one chunk, they run across
/// rayon's global thread pool instead of sequentially; the per-block `jobs`
/// knob in `BlockConfig` governs that pool's size, not a call-local one.
#[cfg(feature = "parallel")]
fn transform_chunks(input: &[u8], bounds: &[(usize, usize)]) -> Vec<(Vec<u8>, u32)> {
    if bounds.len() <= 1 {
        return bounds.iter().map(|&(lo, hi)| transform_one_chunk(&input[lo..hi])).collect();
    }
    bounds.par_iter().map(|&(lo, hi)| transform_one_chunk(&input[lo..hi])).collect()
}

#[cfg(not(feature = "parallel"))]
fn transform_chunks(input: &[u8], bounds: &[(usize, usize)]) -> Vec<(Vec<u8>, u32)> {
    bounds.iter().map(|&(lo, hi)| transform_one_chunk(&input[lo..hi])).collect()
}

/// Inverse BWT. `primary_indexes` must have one 1-based entry per chunk,
/// chunk boundaries are recomputed from `l.len()` the same way forward chose
/// them.
pub fn inverse(l: &[u8], primary_indexes: &[u32]) -> Result<Vec<u8>> {
    let n = l.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        if primary_indexes != [1] {
            return Err(Error::invalid_stream(0, "primary index out of range for n=1"));
        }
        return Ok(l.to_vec());
    }

    let chunks = chunk_count_for(n);
    let bounds = chunk_bounds(n, chunks);
    if bounds.len() != primary_indexes.len() {
        return Err(Error::invalid_stream(
            0,
            format!("expected {} primary indexes, got {}", bounds.len(), primary_indexes.len()),
        ));
    }

    let mut out = vec![0u8; n];
    for (&(lo, hi), &primary) in bounds.iter().zip(primary_indexes) {
        let span = &l[lo..hi];
        let m = span.len();
        if primary == 0 || primary as usize > m {
            return Err(Error::invalid_stream(lo, "primary index out of range"));
        }
        inverse_chunk(span, primary - 1, &mut out[lo..hi]);
    }
    Ok(out)
}

/// Invert a single chunk's BWT bytes via LF-mapping: histogram `span` into
/// byte buckets, compute a "next" pointer per position such that walking it
/// from `primary` emits the original bytes in order. This is the single-pass
/// equivalent of the bucket-start-cursor / next-array construction named in
/// the component this module is modeled on; both its block-size-selected
/// variants converge on this contract, so one implementation satisfies it
/// for all sizes (see `DESIGN.md`).
fn inverse_chunk(span: &[u8], primary: u32, out: &mut [u8]) {
    let m = span.len();
    let mut counts = [0u32; 256];
    for &b in span {
        counts[b as usize] += 1;
    }
    let mut starts = [0u32; 256];
    let mut acc = 0u32;
    for c in 0..256 {
        starts[c] = acc;
        acc += counts[c];
    }

    let mut next = vec![0u32; m];
    let mut cursor = starts;
    for (i, &b) in span.iter().enumerate() {
        next[cursor[b as usize] as usize] = i as u32;
        cursor[b as usize] += 1;
    }

    let mut t = next[primary as usize];
    for slot in out.iter_mut() {
        *slot = span[t as usize];
        t = next[t as usize];
    }
}
