//! src/crypto/ctr.rs
//!
//! Alternate CTR-mode transform for callers that need random-access or
//! parallel encryption. Each 16-byte block XORs against the keystream
//! block `AES-ECB(key, nonce ‖ counter)`, so block `i` depends only on the
//! key, the nonce, and `i` — blocks are independent and are transformed
//! concurrently with `rayon`.
//!
//! This primitive is not on the container file path. It carries no
//! integrity protection and no partial-block handling: the buffer length
//! must be an exact multiple of the block size, and any remainder is the
//! caller's problem.

use crate::aliases::PayloadKey;
use crate::consts::BLOCK_SIZE;
use crate::error::DataSafeError;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128Enc, Block as AesBlock};
use rayon::prelude::*;

/// Nonce length: the remaining 8 bytes of the counter block hold the
/// little-endian block counter.
pub const NONCE_SIZE: usize = 8;

/// Transform `data` in place. Encrypt and decrypt are the same operation.
///
/// Block `i` of the output depends only on `key`, `nonce`, and `i`, so a
/// caller may transform any aligned sub-range independently by slicing —
/// provided it offsets its own counters accordingly via `transform_at`.
pub fn transform(
    key: &PayloadKey,
    nonce: &[u8; NONCE_SIZE],
    data: &mut [u8],
) -> Result<(), DataSafeError> {
    transform_at(key, nonce, 0, data)
}

/// Like [`transform`], but numbering blocks from `first_block` instead of
/// zero. This is what makes random-access use possible: to rewrite blocks
/// `n..m` of a larger stream, pass the sub-slice and `first_block = n`.
pub fn transform_at(
    key: &PayloadKey,
    nonce: &[u8; NONCE_SIZE],
    first_block: u64,
    data: &mut [u8],
) -> Result<(), DataSafeError> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(DataSafeError::Crypto(format!(
            "CTR buffer length {} is not a multiple of the {BLOCK_SIZE}-byte block size",
            data.len()
        )));
    }

    let cipher = Aes128Enc::new((&**key).into());

    data.par_chunks_mut(BLOCK_SIZE)
        .enumerate()
        .for_each(|(i, chunk)| {
            let counter = first_block + i as u64;

            let mut block_bytes = [0u8; BLOCK_SIZE];
            block_bytes[..NONCE_SIZE].copy_from_slice(nonce);
            block_bytes[NONCE_SIZE..].copy_from_slice(&counter.to_le_bytes());

            let mut pad = AesBlock::from(block_bytes);
            cipher.encrypt_block(&mut pad);

            for (byte, pad_byte) in chunk.iter_mut().zip(pad.iter()) {
                *byte ^= pad_byte;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn key() -> PayloadKey {
        Zeroizing::new(*b"ctr-mode-test-ky")
    }

    #[test]
    fn transform_is_an_involution() {
        let nonce = [5u8; 8];
        let original: Vec<u8> = (0..4096).map(|i| (i % 256) as u8).collect();

        let mut data = original.clone();
        transform(&key(), &nonce, &mut data).unwrap();
        assert_ne!(data, original);

        transform(&key(), &nonce, &mut data).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn blocks_are_independent() {
        let nonce = [5u8; 8];
        let mut whole = vec![0xABu8; 64];
        transform(&key(), &nonce, &mut whole).unwrap();

        // Transforming blocks 2..4 alone, with offset counters, must match
        // the corresponding slice of the whole-buffer transform.
        let mut tail = vec![0xABu8; 32];
        transform_at(&key(), &nonce, 2, &mut tail).unwrap();
        assert_eq!(tail, whole[32..]);
    }

    #[test]
    fn partial_block_rejected() {
        let nonce = [0u8; 8];
        let mut data = vec![0u8; 17];
        let err = transform(&key(), &nonce, &mut data).unwrap_err();
        assert!(matches!(err, DataSafeError::Crypto(_)));
    }

    #[test]
    fn nonce_changes_keystream() {
        let mut a = vec![0u8; 32];
        let mut b = vec![0u8; 32];
        transform(&key(), &[1u8; 8], &mut a).unwrap();
        transform(&key(), &[2u8; 8], &mut b).unwrap();
        assert_ne!(a, b);
    }
}
