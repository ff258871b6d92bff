//! PBKDF2-HMAC-SHA256 key derivation for password-based encryption.

use crate::config::{pbkdf2_params, DEFAULT_PASSWORD};
use crate::error::{Error, Result};
use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Key derivation using PBKDF2 with HMAC-SHA256.
///
/// Carries the salt and iteration count so the same value works in both
/// directions: [`KeyDerivation::new`] for encryption (fresh salt),
/// [`KeyDerivation::from_parts`] for decryption (salt and iterations
/// recovered from the stream header).
#[derive(Debug, Clone)]
pub struct KeyDerivation {
    salt: [u8; pbkdf2_params::SALT_LENGTH],
    iterations: u32,
}

impl KeyDerivation {
    /// Create a KDF with a fresh random salt and the default iteration count.
    pub fn new() -> Self {
        let mut salt = [0u8; pbkdf2_params::SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            salt,
            iterations: pbkdf2_params::DEFAULT_ITERATIONS,
        }
    }

    /// Create a KDF with a fresh random salt and a caller-chosen iteration
    /// count. Higher counts cost more CPU per derivation and buy resistance
    /// against offline brute force.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::new()
        }
    }

    /// Create a KDF from an existing salt and iteration count (for decryption).
    pub fn from_parts(salt: [u8; pbkdf2_params::SALT_LENGTH], iterations: u32) -> Self {
        Self { salt, iterations }
    }

    /// Get the salt for storage in the stream header.
    pub fn salt(&self) -> &[u8; pbkdf2_params::SALT_LENGTH] {
        &self.salt
    }

    /// Get the iteration count for storage in the stream header.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive a 256-bit key from a password.
    ///
    /// Deterministic: the same (password, salt, iterations) always yields
    /// the same key bytes, which is what lets a later decryption regenerate
    /// the key. An empty password is replaced by
    /// [`DEFAULT_PASSWORD`](crate::config::DEFAULT_PASSWORD) on both the
    /// encryption and decryption paths.
    pub fn derive_key(&self, password: &str) -> Result<Zeroizing<[u8; 32]>> {
        if self.iterations == 0 {
            return Err(Error::InvalidParameters(
                "iteration count must be positive".to_string(),
            ));
        }

        let password = if password.is_empty() {
            DEFAULT_PASSWORD
        } else {
            password
        };

        let mut key = Zeroizing::new([0u8; pbkdf2_params::KEY_LENGTH]);
        pbkdf2::pbkdf2::<Hmac<Sha256>>(
            password.as_bytes(),
            &self.salt,
            self.iterations,
            key.as_mut_slice(),
        )
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

        Ok(key)
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new()
    }
}
