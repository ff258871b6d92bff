//! Re-encrypting a protected file under a new password.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::{EncryptedReader, EncryptedWriter};
use crate::error::Result;

/// Re-encrypt the file at `path` from `old_password` to `new_password`.
///
/// The whole payload is decrypted into memory and the reader released
/// before anything is written. The new ciphertext goes to a temporary
/// sibling file which replaces `path` by atomic rename on success, so a
/// failure at any point leaves the original ciphertext intact.
///
/// The old password is only verified by the authenticated decryption
/// itself; there is no separate correctness check here. Callers gating
/// access on a password file should call
/// [`is_password_correct`](crate::password_file::is_password_correct)
/// first and treat it as a required precondition.
pub fn change_password(
    path: impl AsRef<Path>,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let path = path.as_ref();

    let plaintext = {
        let reader = EncryptedReader::new(File::open(path)?, old_password);
        reader.read_all()?
    };

    let tmp_path = rekey_temp_path(path);
    let staged = write_reencrypted(&tmp_path, new_password, &plaintext)
        .and_then(|()| Ok(fs::rename(&tmp_path, path)?));

    if staged.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    staged
}

fn write_reencrypted(path: &Path, password: &str, plaintext: &Zeroizing<Vec<u8>>) -> Result<()> {
    let mut writer = EncryptedWriter::new(File::create(path)?, password);
    writer.write_all(plaintext)?;
    writer.finish()?;
    Ok(())
}

fn rekey_temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".rekey");
    PathBuf::from(tmp)
}
