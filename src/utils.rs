//! Utility functions used across the library.

use crate::consts::BLOCK_SIZE;
use std::io::Read;
use std::path::{Path, PathBuf};

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// # Panics (by contract)
///
/// Panics if any slice is shorter than 16 bytes. Callers always pass
/// exact-size blocks from the CBC paths, so the bounds checks never fire.
#[inline(always)]
pub fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < BLOCK_SIZE {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Read from `source` until `buf` is full or EOF is reached.
///
/// Returns the number of bytes actually read; a short count means EOF.
/// Plain `Read::read` may return short counts at any time, which the
/// block-oriented cipher loops cannot tolerate.
pub fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Expand every directory in `paths` into its recursive file listing.
///
/// Within a directory, files come before the files of its subdirectories;
/// directories themselves never appear in the output. Non-directory entries
/// (including paths that do not exist) pass through unchanged — they fail
/// later, per file, where the error can be logged next to the file.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut files);
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return, // unreadable directory contributes nothing
    };

    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else {
            files.push(path);
        }
    }

    for subdir in subdirs {
        collect_dir(&subdir, files);
    }
}
