//! # Error Types
//!
//! This module defines the error types used throughout the library.
//! All operations return [`Result<T, EncfsError>`](EncfsError); every error is
//! fatal for the stream that raised it.

use thiserror::Error;

/// The error type for all EncFS read-path operations.
///
/// Corruption of the on-disk data (`CorruptHeader`, `CorruptBlock`,
/// `BlockMacMismatch`) is kept distinct from caller contract violations
/// (`InvalidArgument`) and from configurations the decoder refuses to guess at
/// (`UnsupportedConfig`).
#[derive(Error, Debug)]
pub enum EncfsError {
    /// I/O failure from the underlying file provider.
    ///
    /// Wraps [`std::io::Error`] and is created automatically when provider
    /// reads or management operations fail.
    #[error("provider I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 8-byte encrypted file header could not be read or decoded.
    #[error("corrupt file header: {0}")]
    CorruptHeader(String),

    /// The cipher rejected a ciphertext block (bad length, bad structure).
    #[error("corrupt block: {0}")]
    CorruptBlock(String),

    /// A block's MAC header did not match the MAC of its payload.
    ///
    /// Indicates tampering, on-disk corruption, or a key/config mismatch.
    /// Never tolerated: the block and the rest of the stream are discarded.
    #[error("block MAC mismatch in block {block}")]
    BlockMacMismatch {
        /// Index of the offending ciphertext block, counted from 0.
        block: u64,
    },

    /// The volume configuration requests a feature this decoder does not
    /// implement (e.g. external IV chaining on file data).
    #[error("unsupported volume configuration: {0}")]
    UnsupportedConfig(String),

    /// Caller contract violation. A programmer error, not data corruption.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<EncfsError> for std::io::Error {
    fn from(err: EncfsError) -> Self {
        match err {
            EncfsError::Io(inner) => inner,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
