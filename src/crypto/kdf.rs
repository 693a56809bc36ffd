//! src/crypto/kdf.rs
//!
//! Password-based key derivation: PBKDF2-HMAC-SHA1, 1000 iterations,
//! 8-byte salt, 16-byte output (an AES-128 key). The parameters match the
//! original container format exactly — changing any of them would make
//! existing containers undecryptable.

use crate::aliases::{Password, PayloadKey, Salt8};
use crate::consts::{KEY_SIZE, PBKDF2_ITERATIONS};
use crate::error::DataSafeError;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha1::Sha1;
use zeroize::Zeroizing;

/// Derive the AES-128 payload key from a password and salt.
///
/// The key is returned in a [`Zeroizing`] buffer and is scrubbed when the
/// caller drops it.
pub fn derive_key(password: &Password, salt: &Salt8) -> Result<PayloadKey, DataSafeError> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);

    pbkdf2::<Hmac<Sha1>>(
        password.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut key[..],
    )
    .map_err(|e| DataSafeError::Crypto(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}
