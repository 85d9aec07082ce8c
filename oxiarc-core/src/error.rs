//! Error types shared by the bit I/O layer and the BWT pipeline crate.
//!
//! This crate carries only the errors that are genuinely ambient to bit-level
//! I/O. The higher-level stream/codec error shapes named in the pipeline's
//! external interface (the boundary `ErrorCode`s) live in `oxiarc_bwt::Error`,
//! which wraps this type via `#[from]`.

use std::io;
use thiserror::Error;

/// Errors raised by [`crate::bitio::BitSink`] and [`crate::bitio::BitSource`].
#[derive(Debug, Error)]
pub enum BitIoError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The underlying stream ended before the requested bits could be read.
    #[error("unexpected end of stream")]
    EndOfStream,

    /// The sink or source was used after `close()`.
    #[error("bit stream used after close")]
    Closed,
}

/// Result type alias for bit I/O operations.
pub type Result<T> = std::result::Result<T, BitIoError>;
