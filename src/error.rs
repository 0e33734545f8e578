//! Error type shared by every stage of an ATC decode.
//!
//! Decoding is fail-fast: the first structural or checksum problem aborts the
//! whole parse and no partial document is produced.  Variants fall into two
//! classes that callers usually care about, see [`ErrorKind`].

use std::io;
use thiserror::Error;

use crate::block::Lead;

pub type Result<T> = std::result::Result<T, AtcError>;

/// Coarse classification of an [`AtcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream does not follow the container layout.
    Format,
    /// A block's stored checksum disagrees with its contents.
    Checksum,
    /// The decoded document could not be serialized.
    Json,
    /// Reading the input failed.
    Io,
}

#[derive(Error, Debug)]
pub enum AtcError {
    #[error("Wrong file signature")]
    InvalidSignature,
    #[error("Unexpected end of input while reading {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },
    #[error("{lead} block declares odd payload length {length}")]
    OddSampleLength { lead: Lead, length: u32 },
    #[error("Block '{tag}' declares {length} payload bytes but only {remaining} remain")]
    PayloadOverrun { tag: String, length: u32, remaining: usize },
    #[error("No 'fmt ' block found, frequency and gain are unknown")]
    MissingFormatBlock,
    #[error("Format block declares a zero resolution")]
    ZeroResolution,
    #[error("Checksum does not match. Expected: [{expected}] Stored: [{stored}]")]
    ChecksumMismatch { expected: u32, stored: u32 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AtcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AtcError::ChecksumMismatch { .. } => ErrorKind::Checksum,
            AtcError::Json(_) => ErrorKind::Json,
            AtcError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    pub fn is_checksum(&self) -> bool {
        self.kind() == ErrorKind::Checksum
    }

    /// Map a short read inside the container to [`AtcError::Truncated`].
    pub(crate) fn truncated(what: &'static str, offset: u64) -> impl FnOnce(io::Error) -> Self {
        move |_| AtcError::Truncated { what, offset: offset as usize }
    }
}
