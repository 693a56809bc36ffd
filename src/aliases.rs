//! # Secret Type Aliases
//!
//! Secret material is wrapped in [`zeroize::Zeroizing`] so buffers are
//! scrubbed when dropped. Access goes through `Deref`; nothing here keeps a
//! secret alive longer than its owner.

use zeroize::Zeroizing;

/// A user password. Scrubbed on drop.
pub type Password = Zeroizing<String>;

/// A derived AES-128 payload key. Scrubbed on drop.
pub type PayloadKey = Zeroizing<[u8; crate::consts::KEY_SIZE]>;

/// A 16-byte initialization vector. Public once written to disk, but the
/// generation path treats it uniformly with the other fixed-size buffers.
pub type Iv16 = [u8; crate::consts::IV_SIZE];

/// An 8-byte password salt.
pub type Salt8 = [u8; crate::consts::SALT_SIZE];

/// Convenience constructor for [`Password`].
pub fn password(s: impl Into<String>) -> Password {
    Zeroizing::new(s.into())
}
