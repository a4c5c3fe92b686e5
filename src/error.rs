//! # Error
//!
//! This file is part of the AVRCP Codec project.
//!
//! It defines the error types returned by every build and parse call.
//!
//! Errors are always returned by value; the codec never panics on peer input.
//! An envelope that was handed to a builder stays a valid prefix even when the
//! builder returns an error, so the caller can still send what was written.
//!
//! The `CodecError` enum includes variants for:
//! - Field values that fail a catalog validity predicate
//! - Unknown PDU ids or opcode classes
//! - Buffers or scratch arenas that are too small (with a processed count)
//! - Output buffers that could not be obtained
//! - Configuration and I/O failures of the ambient layers
//!
//! # Example Usage
//! ```rust
//! use avrcp_codec::error::{CodecError, Result};
//!
//! fn check_volume(volume: u8) -> Result<u8> {
//!     if volume > 0x7F {
//!         return Err(CodecError::BadParameter("volume"));
//!     }
//!     Ok(volume)
//! }
//!
//! assert!(check_volume(0x80).is_err());
//! ```

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    /// A field failed its validity predicate, or a required list was empty.
    #[error("Bad parameter: {0}")]
    BadParameter(&'static str),

    /// Unknown PDU id for the opcode class, or unknown opcode class.
    #[error("Bad command: 0x{0:02x}")]
    BadCommand(u8),

    /// The buffer or arena was too small. `processed` entries made it in.
    #[error("Insufficient space, {processed} entries processed")]
    InternalError { processed: usize },

    #[error("No buffer of {capacity} bytes available")]
    BufferExhausted { capacity: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Number of list entries that were handled before the call stopped, if
    /// the error reports one.
    pub fn processed(&self) -> Option<usize> {
        match self {
            CodecError::InternalError { processed } => Some(*processed),
            _ => None,
        }
    }
}

impl PartialEq for CodecError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::BadParameter(a), Self::BadParameter(b)) => a == b,
            (Self::BadCommand(a), Self::BadCommand(b)) => a == b,
            (Self::InternalError { processed: a }, Self::InternalError { processed: b }) => a == b,
            (Self::BufferExhausted { capacity: a }, Self::BufferExhausted { capacity: b }) => {
                a == b
            }
            (Self::Config(a), Self::Config(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
