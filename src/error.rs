//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All operations return [`Result<T, DataSafeError>`](DataSafeError).

use std::path::PathBuf;
use thiserror::Error;

/// The error type for all container operations.
///
/// Wrong-password errors and corruption are indistinguishable by design:
/// the format carries no authentication tag, so a decryption that fails
/// padding validation or yields a structurally invalid header body is
/// reported as [`DataSafeError::WrongPasswordOrCorrupt`] either way.
#[derive(Error, Debug)]
pub enum DataSafeError {
    /// I/O error occurred during file operations.
    ///
    /// Wraps [`std::io::Error`]; created automatically when open, read,
    /// write, or delete calls fail (including sharing violations).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input does not begin with the fixed magic bytes and format
    /// version. Reported before any key derivation is attempted.
    #[error("not a DataSafe container: magic or version mismatch")]
    InvalidFormat,

    /// The unencrypted header is present but its length field is
    /// inconsistent with the fixed prefix.
    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    /// Decrypting the header body did not produce a structurally valid
    /// result. Either the password is wrong or the file is damaged;
    /// the two cases cannot be told apart.
    #[error("wrong password or corrupt container")]
    WrongPasswordOrCorrupt,

    /// A header field failed validation while building a new header
    /// (empty name, oversized name, non-ASCII name).
    #[error("invalid header field: {0}")]
    InvalidHeaderField(String),

    /// Cryptographic operation failed (KDF errors, misuse of the CTR
    /// primitive with a non-block-multiple buffer).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The unique-name search exhausted its attempt budget.
    #[error("could not find an unused name near {}", .0.display())]
    NameExhausted(PathBuf),
}

impl From<&'static str> for DataSafeError {
    fn from(msg: &'static str) -> Self {
        DataSafeError::Crypto(msg.to_string())
    }
}
