//! src/crypto/text.rs
//!
//! Small-string encryption helpers for host applications that keep short
//! secrets (saved settings, credentials) outside container files.
//!
//! Output format: `base64(salt ‖ iv ‖ ciphertext)` with the same KDF and
//! CBC primitive as the file pipeline, so one password model covers both.

use crate::aliases::Password;
use crate::consts::{IV_SIZE, SALT_SIZE};
use crate::crypto::{cbc, kdf, rng};
use crate::error::DataSafeError;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Encrypt a UTF-8 string to a self-contained base64 blob.
pub fn encrypt_string_to_base64(data: &str, password: &Password) -> Result<String, DataSafeError> {
    let salt = rng::random_salt();
    let iv = rng::random_iv();
    let key = kdf::derive_key(password, &salt)?;

    let ciphertext = cbc::encrypt_buf(&key, &iv, data.as_bytes());

    let mut blob = Vec::with_capacity(SALT_SIZE + IV_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(blob))
}

/// Decrypt a blob produced by [`encrypt_string_to_base64`].
pub fn decrypt_base64_string(data: &str, password: &Password) -> Result<String, DataSafeError> {
    let blob = BASE64
        .decode(data)
        .map_err(|_| DataSafeError::WrongPasswordOrCorrupt)?;

    if blob.len() < SALT_SIZE + IV_SIZE {
        return Err(DataSafeError::WrongPasswordOrCorrupt);
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&blob[..SALT_SIZE]);
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&blob[SALT_SIZE..SALT_SIZE + IV_SIZE]);

    let key = kdf::derive_key(password, &salt)?;
    let plain = cbc::decrypt_buf(&key, &iv, &blob[SALT_SIZE + IV_SIZE..])?;

    String::from_utf8(plain.to_vec()).map_err(|_| DataSafeError::WrongPasswordOrCorrupt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::password;

    #[test]
    fn roundtrip() {
        let pw = password("string-secret");
        let blob = encrypt_string_to_base64("hello, settings", &pw).unwrap();
        assert_ne!(blob, "hello, settings");
        assert_eq!(decrypt_base64_string(&blob, &pw).unwrap(), "hello, settings");
    }

    #[test]
    fn wrong_password_errors() {
        let blob = encrypt_string_to_base64("payload", &password("right")).unwrap();
        // Bad padding or garbage UTF-8 — either way the caller sees the
        // same error.
        assert!(decrypt_base64_string(&blob, &password("wrong")).is_err());
    }

    #[test]
    fn garbage_input_errors() {
        assert!(decrypt_base64_string("not base64 !!!", &password("x")).is_err());
        assert!(decrypt_base64_string("AAAA", &password("x")).is_err());
    }
}
