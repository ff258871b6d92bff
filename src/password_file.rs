//! Password verification via an encrypted sentinel file.
//!
//! Rather than decrypting the whole protected dataset to find out whether a
//! candidate password is right, a small password file holds the known
//! sentinel bytes encrypted under the current password. Decrypting it and
//! comparing against the sentinel answers the question cheaply.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::PASSWORD_FILE_SENTINEL;
use crate::crypto;
use crate::error::{Error, Result};

/// Outcome of checking a candidate password against a password file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerdict {
    /// No password file exists; no password has been set yet.
    NoPasswordSet,
    /// The candidate password decrypts the sentinel.
    Correct,
    /// Wrong password, or the file did not contain the sentinel.
    Incorrect,
}

/// Check a candidate password against the password file at `path`.
///
/// A missing password file is the bootstrap state, not a failure: no
/// password has been set, so any candidate is acceptable and the verdict is
/// [`PasswordVerdict::NoPasswordSet`]. A wrong password surfaces from the
/// authenticated stream as a decryption failure and becomes
/// [`PasswordVerdict::Incorrect`]; genuine I/O errors propagate.
pub fn verify_password(candidate: &str, path: impl AsRef<Path>) -> Result<PasswordVerdict> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(PasswordVerdict::NoPasswordSet);
    }

    match crypto::decrypt_file(path, candidate) {
        Ok(plaintext) => {
            if plaintext.as_slice() == PASSWORD_FILE_SENTINEL {
                Ok(PasswordVerdict::Correct)
            } else {
                Ok(PasswordVerdict::Incorrect)
            }
        }
        // An incorrect password is an expected outcome, not an error.
        Err(Error::Decryption) => Ok(PasswordVerdict::Incorrect),
        Err(e) => Err(e),
    }
}

/// Boolean view of [`verify_password`]: `true` when the candidate is correct
/// or no password has been set.
pub fn is_password_correct(candidate: &str, path: impl AsRef<Path>) -> Result<bool> {
    Ok(verify_password(candidate, path)? != PasswordVerdict::Incorrect)
}

/// Set or clear the password file at `path`.
///
/// A non-empty password encrypts the sentinel under a fresh salt and
/// overwrites the file; a write failure is fatal and leaves the on-disk
/// state untrusted. An empty password clears protection by deleting the
/// file. A failed delete is logged as a warning rather than returned,
/// since the password is still considered cleared going forward; a missing
/// file already is the cleared state.
pub fn write_password_file(password: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if password.is_empty() {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to delete password file");
            }
        }
        return Ok(());
    }

    crypto::encrypt_file(path, password, PASSWORD_FILE_SENTINEL)
}
