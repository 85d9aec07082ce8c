//! Error types for the BWT transform pipeline.
//!
//! Wraps [`oxiarc_core::BitIoError`] and adds the failure shapes specific to
//! suffix sorting, BWT block framing, SBRT, and the entropy coders. [`Error::code`]
//! maps every variant onto the boundary `ErrorCode` names a caller (a CLI, a
//! container format) uses as its exit-code vocabulary.

use oxiarc_core::BitIoError;
use thiserror::Error;

/// Errors raised anywhere in the BWT pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying bit I/O failure.
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// A required configuration parameter was not supplied.
    #[error("missing parameter: {0}")]
    MissingParam(&'static str),

    /// Block size configuration is outside the permitted range.
    #[error("invalid block size: {0} (must be in [1 KiB, 1 GiB])")]
    InvalidBlockSize(usize),

    /// An unrecognized entropy coder or BWT algorithm selector was requested.
    #[error("invalid codec selector: {0}")]
    InvalidCodec(&'static str),

    /// A parameter value was structurally valid but out of range.
    #[error("invalid parameter {name}: {detail}")]
    InvalidParam {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable detail.
        detail: String,
    },

    /// The bitstream is corrupt or does not match the expected framing.
    #[error("invalid stream at offset {offset}: {detail}")]
    InvalidStream {
        /// Byte offset (best-effort) where the problem was detected.
        offset: usize,
        /// Human-readable detail.
        detail: String,
    },

    /// A stream header declares a version this decoder does not support.
    #[error("unsupported stream version: {0}")]
    StreamVersion(u8),

    /// A block transform failed during processing (post-framing malformation).
    #[error("block processing failed: {0}")]
    ProcessBlock(String),

    /// A contract violation: caller passed arguments the core never accepts
    /// (e.g. a block larger than 1 GiB). These are programmer errors, not
    /// recoverable input-malformed errors.
    #[error("contract violation: {0}")]
    Contract(&'static str),
}

impl Error {
    /// Build an [`Error::InvalidStream`] at `offset` with a formatted detail.
    pub fn invalid_stream(offset: usize, detail: impl Into<String>) -> Self {
        Error::InvalidStream { offset, detail: detail.into() }
    }

    /// Build an [`Error::InvalidParam`].
    pub fn invalid_param(name: &'static str, detail: impl Into<String>) -> Self {
        Error::InvalidParam { name, detail: detail.into() }
    }

    /// Map this error onto the boundary error-code vocabulary a wrapping CLI
    /// or container format uses as its exit-code taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::BitIo(BitIoError::EndOfStream) => ErrorCode::InvalidFile,
            Error::BitIo(_) => ErrorCode::Unknown,
            Error::MissingParam(_) => ErrorCode::MissingParam,
            Error::InvalidBlockSize(_) => ErrorCode::InvalidBlockSize,
            Error::InvalidCodec(_) => ErrorCode::InvalidCodec,
            Error::InvalidParam { .. } => ErrorCode::InvalidParam,
            Error::InvalidStream { .. } => ErrorCode::InvalidFile,
            Error::StreamVersion(_) => ErrorCode::StreamVersion,
            Error::ProcessBlock(_) => ErrorCode::ProcessBlock,
            Error::Contract(_) => ErrorCode::Unknown,
        }
    }
}

/// Boundary error codes a caller outside this crate (a CLI, a container
/// format) maps to its own exit-code or status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A required parameter was not supplied.
    MissingParam,
    /// Block size configuration is out of range.
    InvalidBlockSize,
    /// Unknown entropy coder or algorithm selector.
    InvalidCodec,
    /// Failed to construct a compressor instance.
    CreateCompressor,
    /// Failed to construct a decompressor instance.
    CreateDecompressor,
    /// A block failed to process.
    ProcessBlock,
    /// Input file/stream is structurally invalid.
    InvalidFile,
    /// Stream declares an unsupported version.
    StreamVersion,
    /// Failed to construct a stream wrapper.
    CreateStream,
    /// A parameter value was out of range.
    InvalidParam,
    /// A checksum did not match.
    CrcCheck,
    /// Uncategorized failure.
    Unknown,
}

/// Result type alias used throughout the BWT pipeline.
pub type Result<T> = std::result::Result<T, Error>;
