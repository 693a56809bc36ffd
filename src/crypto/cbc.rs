//! src/crypto/cbc.rs
//!
//! AES-128-CBC with PKCS7 padding: single-shot buffer transforms for the
//! header body, and the chunked streaming transforms for file payloads.
//!
//! The streaming loop reads bounded chunks, transforms each one, writes it
//! immediately, and reports `(total, processed)` after every chunk. Encrypt
//! and decrypt share the chunking discipline; decrypt additionally holds
//! back the last block of each chunk until EOF so the padding can be
//! stripped from the true final block.

use crate::aliases::{Iv16, PayloadKey};
use crate::consts::BLOCK_SIZE;
use crate::error::DataSafeError;
use crate::utils::{read_full, xor_blocks};

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128Dec, Aes128Enc, Block as AesBlock};
use std::io::{Read, Write};
use zeroize::Zeroizing;

/// Ciphertext length of a PKCS7-padded plaintext of `plain_len` bytes.
///
/// PKCS7 always pads, so an exact block multiple still grows by one block.
#[inline]
pub const fn padded_len(plain_len: usize) -> usize {
    (plain_len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Encrypt `plaintext` in one shot, applying PKCS7 padding.
pub fn encrypt_buf(key: &PayloadKey, iv: &Iv16, plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes128Enc::new((&**key).into());
    let out_len = padded_len(plaintext.len());
    let pad = (out_len - plaintext.len()) as u8;

    let mut padded = Zeroizing::new(vec![0u8; out_len]);
    padded[..plaintext.len()].copy_from_slice(plaintext);
    padded[plaintext.len()..].fill(pad);

    let mut out = vec![0u8; out_len];
    let mut prev = *iv;

    for (src, dst) in padded.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        let mut xored = [0u8; BLOCK_SIZE];
        xor_blocks(src, &prev, &mut xored);

        let mut block = AesBlock::from(xored);
        cipher.encrypt_block(&mut block);

        dst.copy_from_slice(&block);
        prev.copy_from_slice(&block);
    }

    out
}

/// Decrypt a single-shot ciphertext and strip PKCS7 padding.
///
/// Any padding inconsistency is reported as
/// [`DataSafeError::WrongPasswordOrCorrupt`] — without an authentication
/// tag there is no way to tell a bad password from damaged ciphertext.
pub fn decrypt_buf(
    key: &PayloadKey,
    iv: &Iv16,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, DataSafeError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(DataSafeError::WrongPasswordOrCorrupt);
    }

    let cipher = Aes128Dec::new((&**key).into());
    let mut out = Zeroizing::new(vec![0u8; ciphertext.len()]);
    let mut prev = *iv;

    for (src, dst) in ciphertext
        .chunks(BLOCK_SIZE)
        .zip(out.chunks_mut(BLOCK_SIZE))
    {
        let mut block = AesBlock::clone_from_slice(src);
        cipher.decrypt_block(&mut block);

        xor_blocks(&block, &prev, dst);
        prev.copy_from_slice(src);
    }

    let plain_len = unpadded_len(&out)?;
    out.truncate(plain_len);
    Ok(out)
}

/// Validate PKCS7 padding and return the unpadded length.
fn unpadded_len(padded: &[u8]) -> Result<usize, DataSafeError> {
    let pad = *padded.last().ok_or(DataSafeError::WrongPasswordOrCorrupt)? as usize;

    if pad == 0 || pad > BLOCK_SIZE || pad > padded.len() {
        return Err(DataSafeError::WrongPasswordOrCorrupt);
    }
    if padded[padded.len() - pad..].iter().any(|&b| b as usize != pad) {
        return Err(DataSafeError::WrongPasswordOrCorrupt);
    }

    Ok(padded.len() - pad)
}

/// Stream-encrypt everything remaining in `source` into `destination`.
///
/// `total` is the number of payload bytes expected (for progress
/// reporting); `progress(total, processed)` fires after every chunk.
/// Returns the number of plaintext bytes consumed.
pub fn encrypt_stream<R, W>(
    source: &mut R,
    destination: &mut W,
    key: &PayloadKey,
    iv: &Iv16,
    chunk_size: usize,
    total: u64,
    mut progress: impl FnMut(u64, u64),
) -> Result<u64, DataSafeError>
where
    R: Read,
    W: Write,
{
    let cipher = Aes128Enc::new((&**key).into());
    let chunk = chunk_blocks(chunk_size);

    let mut buf = Zeroizing::new(vec![0u8; chunk]);
    let mut out = Vec::with_capacity(chunk + BLOCK_SIZE);
    let mut prev = *iv;
    let mut processed = 0u64;

    loop {
        let n = read_full(source, &mut buf)?;
        processed += n as u64;
        let is_final = n < chunk;

        out.clear();

        if is_final {
            // Pad the remainder up to the next block boundary. A remainder
            // of zero still emits one full padding block.
            let out_len = padded_len(n);
            let pad = (out_len - n) as u8;
            let mut tail = Zeroizing::new(vec![0u8; out_len]);
            tail[..n].copy_from_slice(&buf[..n]);
            tail[n..].fill(pad);
            encrypt_chunk(&cipher, &tail, &mut prev, &mut out);
        } else {
            encrypt_chunk(&cipher, &buf[..n], &mut prev, &mut out);
        }

        destination.write_all(&out)?;
        progress(total, processed);

        if is_final {
            break;
        }
    }

    destination.flush()?;
    Ok(processed)
}

/// Stream-decrypt everything remaining in `source` into `destination`.
///
/// The input must be the CBC payload exactly: a non-empty multiple of the
/// block size. Truncation or padding damage is reported as
/// [`DataSafeError::WrongPasswordOrCorrupt`].
pub fn decrypt_stream<R, W>(
    source: &mut R,
    destination: &mut W,
    key: &PayloadKey,
    iv: &Iv16,
    chunk_size: usize,
    total: u64,
    mut progress: impl FnMut(u64, u64),
) -> Result<u64, DataSafeError>
where
    R: Read,
    W: Write,
{
    let cipher = Aes128Dec::new((&**key).into());
    let chunk = chunk_blocks(chunk_size);

    let mut buf = vec![0u8; chunk];
    let mut plain = Zeroizing::new(Vec::with_capacity(chunk));
    // The last decrypted block of the previous chunk; only written once the
    // next read proves it was not the padded final block.
    let mut held_back: Option<[u8; BLOCK_SIZE]> = None;
    let mut prev = *iv;
    let mut processed = 0u64;
    let mut written = 0u64;

    loop {
        let n = read_full(source, &mut buf)?;
        if n == 0 {
            break;
        }
        if n % BLOCK_SIZE != 0 {
            return Err(DataSafeError::WrongPasswordOrCorrupt);
        }
        processed += n as u64;

        plain.clear();
        if let Some(block) = held_back.take() {
            plain.extend_from_slice(&block);
        }

        for src in buf[..n].chunks(BLOCK_SIZE) {
            let mut block = AesBlock::clone_from_slice(src);
            cipher.decrypt_block(&mut block);

            let mut pt = [0u8; BLOCK_SIZE];
            xor_blocks(&block, &prev, &mut pt);
            prev.copy_from_slice(src);
            plain.extend_from_slice(&pt);
        }

        let keep_from = plain.len() - BLOCK_SIZE;
        let mut last = [0u8; BLOCK_SIZE];
        last.copy_from_slice(&plain[keep_from..]);
        held_back = Some(last);
        plain.truncate(keep_from);

        destination.write_all(&plain)?;
        written += plain.len() as u64;
        progress(total, processed);
    }

    // An empty payload is impossible: encryption always writes at least
    // one padding block.
    let last = held_back.ok_or(DataSafeError::WrongPasswordOrCorrupt)?;
    let tail_len = unpadded_len(&last)?;
    destination.write_all(&last[..tail_len])?;
    written += tail_len as u64;

    destination.flush()?;
    Ok(written)
}

fn encrypt_chunk(cipher: &Aes128Enc, input: &[u8], prev: &mut Iv16, out: &mut Vec<u8>) {
    debug_assert_eq!(input.len() % BLOCK_SIZE, 0);

    for src in input.chunks(BLOCK_SIZE) {
        let mut xored = [0u8; BLOCK_SIZE];
        xor_blocks(src, prev, &mut xored);

        let mut block = AesBlock::from(xored);
        cipher.encrypt_block(&mut block);

        out.extend_from_slice(&block);
        prev.copy_from_slice(&block);
    }
}

/// Round the configured chunk size down to a whole number of blocks,
/// with a one-block floor.
fn chunk_blocks(chunk_size: usize) -> usize {
    (chunk_size.max(BLOCK_SIZE) / BLOCK_SIZE) * BLOCK_SIZE
}
