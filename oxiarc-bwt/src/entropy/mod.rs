//! Entropy coding layer: shared primitives (alphabet, frequency
//! normalization, varint) plus the two coder choices a block can select,
//! range coding and Huffman coding.

pub mod alphabet;
pub mod freq;
pub mod huffman;
pub mod range;
pub mod varint;

use crate::error::Result;
use oxiarc_core::bitio::{BitSink, BitSource};
use std::io::{Read, Write};

/// Which entropy coder a chunk was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coder {
    /// 60-bit arithmetic range coder.
    Range,
    /// Canonical Huffman coder.
    Huffman,
}

/// Encode `data` with the selected coder, prefixed by a 1-bit coder tag so
/// [`decode`] can dispatch without external context.
pub fn encode<W: Write>(sink: &mut BitSink<W>, coder: Coder, data: &[u8]) -> Result<()> {
    match coder {
        Coder::Range => {
            sink.write_bit(false)?;
            range::encode_chunk(sink, data)
        }
        Coder::Huffman => {
            sink.write_bit(true)?;
            huffman::encode_chunk(sink, data)
        }
    }
}

/// Decode a chunk previously written by [`encode`].
pub fn decode<R: Read>(source: &mut BitSource<R>) -> Result<Vec<u8>> {
    if source.read_bit()? { huffman::decode_chunk(source) } else { range::decode_chunk(source) }
}
