//! Error types for passlock.

use thiserror::Error;

/// Result type alias for passlock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in passlock operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid key-derivation or cipher parameters.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decryption error (wrong password or corrupted data).
    #[error("Decryption failed: wrong password or corrupted data")]
    Decryption,

    /// Stream does not start with the expected magic number.
    #[error("Invalid stream format: expected magic 'PLCK'")]
    BadMagic,

    /// Stream format version is newer than this build understands.
    #[error("Unsupported stream version: {found}")]
    UnsupportedVersion { found: u8 },

    /// Stream ended before the full header was read.
    #[error("Truncated stream header")]
    TruncatedHeader,
}
