//! AES-256-GCM authenticated encryption.

use crate::error::{Error, Result};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;

/// Nonce size for AES-GCM (96 bits).
const NONCE_SIZE: usize = 12;

/// Authentication tag size (128 bits).
const TAG_SIZE: usize = 16;

/// AES-256-GCM cipher over a derived key.
pub struct Cipher {
    inner: Aes256Gcm,
}

impl Cipher {
    /// Create a cipher from a 256-bit derived key.
    pub fn new(key: &[u8; 32]) -> Result<Self> {
        let inner =
            Aes256Gcm::new_from_slice(key).map_err(|e| Error::InvalidParameters(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Encrypt with a fresh random nonce.
    ///
    /// Returns: nonce (12 bytes) || ciphertext || tag (16 bytes)
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .inner
            .encrypt(nonce, plaintext)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(sealed)
    }

    /// Decrypt data produced by [`Cipher::seal`].
    ///
    /// Authentication failure means the key (and therefore the password) was
    /// wrong or the data was tampered with; both surface as
    /// [`Error::Decryption`]. The cipher never yields unauthenticated bytes.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(Error::Decryption);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.inner
            .decrypt(nonce, ciphertext)
            .map_err(|_| Error::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let cipher = Cipher::new(&[7u8; 32]).unwrap();
        let plaintext = b"Hello, World! This is a secret message.";

        let sealed = cipher.seal(plaintext).unwrap();
        let opened = cipher.open(&sealed).unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = Cipher::new(&[1u8; 32]).unwrap().seal(b"secret").unwrap();

        let result = Cipher::new(&[2u8; 32]).unwrap().open(&sealed);
        assert!(matches!(result, Err(Error::Decryption)));
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let cipher = Cipher::new(&[7u8; 32]).unwrap();

        let sealed1 = cipher.seal(b"same message").unwrap();
        let sealed2 = cipher.seal(b"same message").unwrap();

        assert_ne!(sealed1, sealed2);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = Cipher::new(&[7u8; 32]).unwrap();
        let mut sealed = cipher.seal(b"secret").unwrap();

        if let Some(byte) = sealed.last_mut() {
            *byte ^= 0xFF;
        }

        let result = cipher.open(&sealed);
        assert!(matches!(result, Err(Error::Decryption)));
    }

    #[test]
    fn test_too_short_input_fails() {
        let cipher = Cipher::new(&[7u8; 32]).unwrap();

        let result = cipher.open(&[0u8; NONCE_SIZE + TAG_SIZE - 1]);
        assert!(matches!(result, Err(Error::Decryption)));
    }

    #[test]
    fn test_empty_plaintext() {
        let cipher = Cipher::new(&[7u8; 32]).unwrap();

        let sealed = cipher.seal(b"").unwrap();
        let opened = cipher.open(&sealed).unwrap();

        assert!(opened.is_empty());
    }
}
