//! # oxiarc-core
//!
//! The ambient bit-level I/O layer shared by the BWT transform pipeline.
//!
//! - [`bitio`]: MSB-first bit sink/source over any `Read`/`Write`, plus
//!   buffer-to-buffer bit-aligned copy helpers.
//! - [`error`]: The error type for bit I/O failures.
//!
//! ## Example
//!
//! ```rust
//! use oxiarc_core::bitio::{BitSink, BitSource};
//!
//! let mut out = Vec::new();
//! {
//!     let mut sink = BitSink::new(&mut out);
//!     sink.write_bits(0b101, 3).unwrap();
//!     sink.write_bits(0b1100, 4).unwrap();
//!     sink.close().unwrap();
//! }
//!
//! let mut src = BitSource::new(&out[..]);
//! assert_eq!(src.read_bits(3).unwrap(), 0b101);
//! assert_eq!(src.read_bits(4).unwrap(), 0b1100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod error;

pub use bitio::{BitSink, BitSource};
pub use error::{BitIoError, Result};
