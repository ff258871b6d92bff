//! Encrypted reader/writer streams.
//!
//! Wire format:
//!
//! ```text
//! magic (4) | version (1) | iterations (4, BE) | salt (32) | nonce || ciphertext || tag
//! ```
//!
//! The header is cleartext: it holds everything needed to re-derive the key
//! from a candidate password. The payload is sealed with AES-256-GCM, so
//! decryption under a wrong password fails authentication instead of
//! yielding garbage bytes.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use zeroize::Zeroizing;

use crate::config::{pbkdf2_params, STREAM_MAGIC, STREAM_VERSION};
use crate::crypto::cipher::Cipher;
use crate::crypto::kdf::KeyDerivation;
use crate::error::{Error, Result};

/// Length of the cleartext header preceding the sealed payload.
const HEADER_LEN: usize = 4 + 1 + 4 + pbkdf2_params::SALT_LENGTH;

/// Encrypting output sink.
///
/// Plaintext written through [`io::Write`] is buffered and sealed into the
/// inner sink by [`finish`](EncryptedWriter::finish). Each writer generates
/// a fresh salt and nonce, so encrypting the same plaintext twice never
/// produces the same bytes.
pub struct EncryptedWriter<W: Write> {
    inner: W,
    kdf: KeyDerivation,
    password: Zeroizing<String>,
    buffer: Zeroizing<Vec<u8>>,
}

impl<W: Write> EncryptedWriter<W> {
    /// Create a writer that encrypts under `password` with the default
    /// iteration count.
    pub fn new(inner: W, password: &str) -> Self {
        Self::with_kdf(inner, password, KeyDerivation::new())
    }

    /// Create a writer with a caller-chosen iteration count.
    pub fn with_iterations(inner: W, password: &str, iterations: u32) -> Self {
        Self::with_kdf(inner, password, KeyDerivation::with_iterations(iterations))
    }

    fn with_kdf(inner: W, password: &str, kdf: KeyDerivation) -> Self {
        Self {
            inner,
            kdf,
            password: Zeroizing::new(password.to_string()),
            buffer: Zeroizing::new(Vec::new()),
        }
    }

    /// Seal the buffered plaintext and flush it to the inner sink.
    ///
    /// Must be called to produce output; dropping the writer without
    /// finishing writes nothing. Returns the inner sink so callers can keep
    /// using it.
    pub fn finish(mut self) -> Result<W> {
        let key = self.kdf.derive_key(&self.password)?;
        let sealed = Cipher::new(&key)?.seal(&self.buffer)?;

        self.inner.write_all(&STREAM_MAGIC)?;
        self.inner.write_all(&[STREAM_VERSION])?;
        self.inner.write_all(&self.kdf.iterations().to_be_bytes())?;
        self.inner.write_all(self.kdf.salt())?;
        self.inner.write_all(&sealed)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

impl<W: Write> Write for EncryptedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing hits the inner sink until finish() seals the payload.
        Ok(())
    }
}

/// Decrypting input source.
///
/// On first read the header of the inner source is parsed, the key is
/// re-derived from the stored salt and iteration count, and the payload is
/// authenticated and decrypted in full; subsequent reads drain the
/// decrypted bytes.
pub struct EncryptedReader<R: Read> {
    inner: R,
    password: Zeroizing<String>,
    plaintext: Zeroizing<Vec<u8>>,
    pos: usize,
    primed: bool,
}

impl<R: Read> EncryptedReader<R> {
    /// Create a reader that decrypts under `password`.
    pub fn new(inner: R, password: &str) -> Self {
        Self {
            inner,
            password: Zeroizing::new(password.to_string()),
            plaintext: Zeroizing::new(Vec::new()),
            pos: 0,
            primed: false,
        }
    }

    /// Parse the header and decrypt the payload. Idempotent.
    fn prime(&mut self) -> Result<()> {
        if self.primed {
            return Ok(());
        }

        let mut header = [0u8; HEADER_LEN];
        self.inner.read_exact(&mut header).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::TruncatedHeader
            } else {
                Error::Io(e)
            }
        })?;

        if header[..4] != STREAM_MAGIC {
            return Err(Error::BadMagic);
        }
        let version = header[4];
        if version != STREAM_VERSION {
            return Err(Error::UnsupportedVersion { found: version });
        }
        let iterations = u32::from_be_bytes([header[5], header[6], header[7], header[8]]);
        let mut salt = [0u8; pbkdf2_params::SALT_LENGTH];
        salt.copy_from_slice(&header[9..]);

        let mut sealed = Vec::new();
        self.inner.read_to_end(&mut sealed)?;

        let key = KeyDerivation::from_parts(salt, iterations).derive_key(&self.password)?;
        *self.plaintext = Cipher::new(&key)?.open(&sealed)?;
        self.primed = true;

        Ok(())
    }

    /// Drain the full decrypted payload, consuming the reader.
    pub fn read_all(mut self) -> Result<Zeroizing<Vec<u8>>> {
        self.prime()?;
        Ok(Zeroizing::new(self.plaintext[self.pos..].to_vec()))
    }
}

impl<R: Read> Read for EncryptedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.prime()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let remaining = &self.plaintext[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;

        Ok(n)
    }
}

/// Encrypt `plaintext` under `password` and write it to `path`, replacing
/// any existing file.
pub fn encrypt_file(path: impl AsRef<Path>, password: &str, plaintext: &[u8]) -> Result<()> {
    let mut writer = EncryptedWriter::new(File::create(path.as_ref())?, password);
    writer.write_all(plaintext)?;
    writer.finish()?;
    Ok(())
}

/// Read the file at `path` and decrypt it under `password`.
pub fn decrypt_file(path: impl AsRef<Path>, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    EncryptedReader::new(File::open(path.as_ref())?, password).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    // A low iteration count keeps these tests fast; the reader picks the
    // count up from the header either way.
    const TEST_ITERATIONS: u32 = 1_000;

    fn encrypt_to_vec(plaintext: &[u8], password: &str) -> Vec<u8> {
        let mut writer = EncryptedWriter::with_iterations(Vec::new(), password, TEST_ITERATIONS);
        writer.write_all(plaintext).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let encrypted = encrypt_to_vec(b"attack at dawn", "hunter2");

        let reader = EncryptedReader::new(encrypted.as_slice(), "hunter2");
        let decrypted = reader.read_all().unwrap();

        assert_eq!(decrypted.as_slice(), b"attack at dawn");
    }

    #[test]
    fn test_roundtrip_via_read_trait() {
        let encrypted = encrypt_to_vec(b"streamed secret", "hunter2");

        let mut reader = EncryptedReader::new(encrypted.as_slice(), "hunter2");
        let mut decrypted = Vec::new();
        reader.read_to_end(&mut decrypted).unwrap();

        assert_eq!(decrypted, b"streamed secret");
    }

    #[test]
    fn test_wrong_password_fails_explicitly() {
        let encrypted = encrypt_to_vec(b"secret", "correct-password");

        let result = EncryptedReader::new(encrypted.as_slice(), "wrong-password").read_all();
        assert!(matches!(result, Err(Error::Decryption)));
    }

    #[test]
    fn test_empty_password_roundtrips() {
        let encrypted = encrypt_to_vec(b"unprotected data", "");

        let decrypted = EncryptedReader::new(encrypted.as_slice(), "")
            .read_all()
            .unwrap();

        assert_eq!(decrypted.as_slice(), b"unprotected data");
    }

    #[test]
    fn test_fresh_salt_per_writer() {
        let encrypted1 = encrypt_to_vec(b"same message", "password");
        let encrypted2 = encrypt_to_vec(b"same message", "password");

        assert_ne!(encrypted1, encrypted2);
        // Salt lives right after magic, version and iterations.
        assert_ne!(encrypted1[9..9 + 32], encrypted2[9..9 + 32]);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut encrypted = encrypt_to_vec(b"secret", "password");
        encrypted[0] ^= 0xFF;

        let result = EncryptedReader::new(encrypted.as_slice(), "password").read_all();
        assert!(matches!(result, Err(Error::BadMagic)));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut encrypted = encrypt_to_vec(b"secret", "password");
        encrypted[4] = 99;

        let result = EncryptedReader::new(encrypted.as_slice(), "password").read_all();
        assert!(matches!(
            result,
            Err(Error::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let encrypted = encrypt_to_vec(b"secret", "password");

        let result = EncryptedReader::new(&encrypted[..HEADER_LEN - 1], "password").read_all();
        assert!(matches!(result, Err(Error::TruncatedHeader)));
    }

    #[test]
    fn test_empty_plaintext() {
        let encrypted = encrypt_to_vec(b"", "password");

        let decrypted = EncryptedReader::new(encrypted.as_slice(), "password")
            .read_all()
            .unwrap();

        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_header_records_iterations() {
        let encrypted = encrypt_to_vec(b"secret", "password");

        let iterations =
            u32::from_be_bytes([encrypted[5], encrypted[6], encrypted[7], encrypted[8]]);
        assert_eq!(iterations, TEST_ITERATIONS);
    }
}
