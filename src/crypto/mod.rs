//! Cryptographic operations for passlock.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation
//! - AES-256-GCM authenticated encryption
//! - Encrypted reader/writer streams over files or arbitrary byte I/O

mod cipher;
mod kdf;
mod stream;

pub use cipher::Cipher;
pub use kdf::KeyDerivation;
pub use stream::{decrypt_file, encrypt_file, EncryptedReader, EncryptedWriter};
