//! Burrows-Wheeler transform compression pipeline for OxiArc.
//!
//! A block is divided into one or eight independently-sortable BWT chunks
//! ([`bwt`]), framed with its primary indexes ([`block_codec`]), recoded by
//! a post-BWT rank transform ([`sbrt`]), and entropy-coded ([`entropy`]).
//! The suffix array that drives the forward transform lives in
//! [`divsufsort`]. [`chain`] defines the seam peer byte-level transforms
//! (not implemented here) plug into ahead of this stage.
//!
//! ```rust
//! use oxiarc_bwt::{BlockConfig, compress_block, decompress_block};
//!
//! let input = b"mississippi river";
//! let config = BlockConfig::default();
//! let compressed = compress_block(&config, input).unwrap();
//! let restored = decompress_block(&compressed).unwrap();
//! assert_eq!(restored, input);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block_codec;
pub mod bwt;
pub mod chain;
pub mod divsufsort;
pub mod entropy;
pub mod error;
pub mod sbrt;

pub use entropy::Coder;
pub use error::{Error, ErrorCode, Result};
pub use sbrt::Mode as SbrtMode;

use oxiarc_core::bitio::{BitSink, BitSource};

/// Blocks may not exceed this size (1 GiB), per the suffix-array engine's
/// contract.
pub const MAX_BLOCK_SIZE: usize = bwt::MAX_BLOCK_SIZE;
/// Minimum permitted configured block size (1 KiB).
pub const MIN_BLOCK_SIZE: usize = 1024;
/// Maximum permitted job count for chunk-parallel decode.
pub const MAX_JOBS: usize = 64;

/// Optimization hint about the shape of a block's data, threaded through to
/// stage construction. The core honors it only as a switch between already-
/// correct code paths; it is never required for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataTypeHint {
    /// Natural-language text.
    Text,
    /// DNA/genomic sequence data.
    Dna,
    /// Audio/image/video payloads.
    Multimedia,
    /// Executable machine code.
    Exe,
    /// Base64-encoded data.
    Base64,
    /// Numeric (e.g. columnar) data.
    Numeric,
    /// Arbitrary binary data.
    Binary,
    /// UTF-8 encoded text.
    Utf8,
    /// A small, fixed symbol alphabet.
    SmallAlphabet,
    /// No hint available.
    #[default]
    Undefined,
}

/// Configuration for a single block's compression run.
#[derive(Debug, Clone, Copy)]
pub struct BlockConfig {
    block_size: usize,
    jobs: usize,
    sbrt_mode: SbrtMode,
    coder: Coder,
    data_type: DataTypeHint,
}

impl BlockConfig {
    /// Build a configuration, validating block size and job count.
    pub fn new(block_size: usize, jobs: usize) -> Result<Self> {
        let config = Self {
            block_size,
            jobs,
            sbrt_mode: SbrtMode::Mtf,
            coder: Coder::Range,
            data_type: DataTypeHint::Undefined,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate that the block size and job count are within the permitted
    /// ranges.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        if !(1..=MAX_JOBS).contains(&self.jobs) {
            return Err(Error::invalid_param("jobs", format!("{} not in [1, {}]", self.jobs, MAX_JOBS)));
        }
        Ok(())
    }

    /// Select the SBRT mode used for this block's rank transform.
    pub fn with_sbrt_mode(mut self, mode: SbrtMode) -> Self {
        self.sbrt_mode = mode;
        self
    }

    /// Select the entropy coder used for this block.
    pub fn with_coder(mut self, coder: Coder) -> Self {
        self.coder = coder;
        self
    }

    /// Attach a data-type hint for companion-transform selection.
    pub fn with_data_type(mut self, hint: DataTypeHint) -> Self {
        self.data_type = hint;
        self
    }

    /// Configured block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Configured job count.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Configured data-type hint.
    pub fn data_type(&self) -> DataTypeHint {
        self.data_type
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: 900_000,
            jobs: 1,
            sbrt_mode: SbrtMode::Mtf,
            coder: Coder::Range,
            data_type: DataTypeHint::Undefined,
        }
    }
}

/// Run the full pipeline on a single block: BWT, block framing, SBRT, then
/// the configured entropy coder, into one self-contained bitstream segment.
pub fn compress_block(config: &BlockConfig, input: &[u8]) -> Result<Vec<u8>> {
    if input.len() > config.block_size {
        return Err(Error::invalid_param(
            "input",
            format!("block of {} bytes exceeds configured size {}", input.len(), config.block_size),
        ));
    }

    let (l, primary_indexes) = run_bwt_forward(config, input)?;

    let mut framed = Vec::new();
    {
        let mut sink = BitSink::new(&mut framed);
        block_codec::encode(&mut sink, &l, &primary_indexes)?;
        sink.close()?;
    }

    let ranks = sbrt::forward(config.sbrt_mode, &framed);
    let recoded: Vec<u8> = ranks.iter().map(|&r| (r & 0xFF) as u8).collect();
    let high_bits: Vec<u8> = ranks.iter().map(|&r| (r >> 8) as u8).collect();

    let mut out = Vec::new();
    {
        let mut sink = BitSink::new(&mut out);
        sink.write_bits(config.sbrt_mode as u64, 2)?;
        sink.write_bits(framed.len() as u64, 64)?;
        entropy::encode(&mut sink, config.coder, &recoded)?;
        entropy::encode(&mut sink, config.coder, &high_bits)?;
        sink.close()?;
    }
    Ok(out)
}

/// Run the BWT forward stage, sized to the configured job count when the
/// `parallel` feature is enabled (each chunk's suffix array is independent,
/// so the chunk loop is where `jobs` actually matters).
#[cfg(feature = "parallel")]
fn run_bwt_forward(config: &BlockConfig, input: &[u8]) -> Result<(Vec<u8>, Vec<u32>)> {
    if config.jobs <= 1 {
        return bwt::forward(input);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| Error::invalid_param("jobs", e.to_string()))?;
    pool.install(|| bwt::forward(input))
}

#[cfg(not(feature = "parallel"))]
fn run_bwt_forward(_config: &BlockConfig, input: &[u8]) -> Result<(Vec<u8>, Vec<u32>)> {
    bwt::forward(input)
}

/// Invert [`compress_block`].
pub fn decompress_block(data: &[u8]) -> Result<Vec<u8>> {
    let mut source = BitSource::new(data);
    let mode_bits = source.read_bits(2)? as u8;
    let mode = match mode_bits {
        0 => SbrtMode::Mtf,
        1 => SbrtMode::Rank,
        2 => SbrtMode::Timestamp,
        _ => return Err(Error::invalid_stream(0, "invalid sbrt mode tag")),
    };
    let framed_len = source.read_bits(64)? as usize;

    let low = entropy::decode(&mut source)?;
    let high = entropy::decode(&mut source)?;
    if low.len() != high.len() {
        return Err(Error::invalid_stream(0, "sbrt rank byte planes have mismatched length"));
    }
    let ranks: Vec<u16> = low.iter().zip(&high).map(|(&lo, &hi)| ((hi as u16) << 8) | lo as u16).collect();

    let framed = sbrt::inverse(mode, &ranks);
    if framed.len() != framed_len {
        return Err(Error::invalid_stream(0, "framed block length mismatch after sbrt inverse"));
    }

    let mut frame_source = BitSource::new(&framed[..]);
    let (l, primary_indexes) = block_codec::decode(&mut frame_source, framed.len() - header_len(&framed)?)?;
    bwt::inverse(&l, &primary_indexes)
}

fn header_len(framed: &[u8]) -> Result<usize> {
    if framed.is_empty() {
        return Ok(0);
    }
    let mode = framed[0];
    if mode & 0b1110_0000 != 0 {
        return Err(Error::invalid_stream(0, "reserved bits set in mode byte"));
    }
    let ccc = (mode >> 2) & 0b111;
    if ccc == 0b111 {
        // Empty-block marker: mode byte only, no primary-index bytes.
        return Ok(1);
    }
    let ww = (mode & 0b11) + 1;
    let c = 1usize << ccc;
    Ok(1 + c * ww as usize)
}
