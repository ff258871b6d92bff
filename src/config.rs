//! Configuration constants for passlock.

/// Password substituted when the user supplies none.
///
/// Publicly known by design: an empty password means "no protection
/// intended", and both the encryption and decryption paths substitute the
/// same constant so the round-trip still works.
pub const DEFAULT_PASSWORD: &str = "unprotected";

/// Plaintext stored in the password file.
///
/// The value is not a secret. Decrypting the password file and finding
/// exactly these bytes is what proves a candidate password correct.
pub const PASSWORD_FILE_SENTINEL: &[u8] = b"password accepted";

/// Magic number at the start of every encrypted stream: "PLCK" in bytes.
pub const STREAM_MAGIC: [u8; 4] = *b"PLCK";

/// Current encrypted stream format version.
pub const STREAM_VERSION: u8 = 1;

/// PBKDF2-HMAC-SHA256 parameters for key derivation.
pub mod pbkdf2_params {
    /// Default key-stretching iteration count.
    pub const DEFAULT_ITERATIONS: u32 = 600_000;

    /// Output length in bytes (256 bits, an AES-256 key).
    pub const KEY_LENGTH: usize = 32;

    /// Salt length in bytes.
    pub const SALT_LENGTH: usize = 32;
}
