//! Password-based protection for sensitive local files.
//!
//! Derives a symmetric key from a user password, encrypts and decrypts file
//! contents through an encrypted-stream abstraction, verifies candidate
//! passwords against a small sentinel file, and re-encrypts protected files
//! under a new password.
//!
//! # Features
//!
//! - **PBKDF2-HMAC-SHA256 key derivation**: deterministic, salted,
//!   iteration-count key stretching
//! - **AES-256-GCM encrypted streams**: self-describing header (salt and
//!   iteration count travel with the ciphertext), authenticated payload
//! - **Password verification**: an encrypted sentinel file proves a
//!   candidate password correct without touching the protected data
//! - **Rekeying**: staged write plus atomic rename moves a file from one
//!   password to another without risking the original ciphertext
//!
//! # Architecture
//!
//! ```text
//! Password → Derive key (PBKDF2) → Seal/Open (AES-256-GCM) → File
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use passlock::{change_password, is_password_correct, write_password_file};
//!
//! // Establish a password.
//! write_password_file("hunter2", "data/password").unwrap();
//! assert!(is_password_correct("hunter2", "data/password").unwrap());
//!
//! // Always verify before rekeying: change_password trusts the old
//! // password it is given.
//! if is_password_correct("hunter2", "data/password").unwrap() {
//!     change_password("data/inbox", "hunter2", "correct horse").unwrap();
//!     write_password_file("correct horse", "data/password").unwrap();
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod password_file;
pub mod rekey;

pub use error::{Error, Result};
pub use password_file::{
    is_password_correct, verify_password, write_password_file, PasswordVerdict,
};
pub use rekey::change_password;
