//! # Secure Erase
//!
//! Multi-pass random overwrite of a file, then a normal filesystem delete.
//! This is best effort: it hinders casual recovery of the plaintext, it is
//! not a certified forensic wipe, and directory-entry metadata is left to
//! the ordinary delete call.
//!
//! Each pass writes whole buffers until the original length is covered,
//! so the final write usually runs past the end of the file. That is
//! intentional: a non-multiple-of-buffer length would otherwise let the
//! original size be read straight off the allocation.

use crate::crypto::rng;
use crate::error::DataSafeError;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Progress callback: `(current_pass, total_passes, total_bytes, completed)`.
pub type WipeProgress<'a> = &'a mut dyn FnMut(u32, u32, u64, u64);

/// Overwrite `path` with `passes` passes of random data, then delete it.
///
/// `buffer_size` is the write-buffer size; the callback fires after every
/// buffer write. A read-only attribute on the file is cleared first.
pub fn wipe(
    path: &Path,
    passes: u32,
    buffer_size: usize,
    progress: WipeProgress<'_>,
) -> Result<(), DataSafeError> {
    let metadata = std::fs::metadata(path)?;
    let total = metadata.len();

    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        std::fs::set_permissions(path, permissions)?;
    }

    let mut buffer = vec![0u8; buffer_size.max(1)];

    for pass in 1..=passes {
        overwrite_once(path, total, &mut buffer, pass, passes, progress)?;
    }

    std::fs::remove_file(path)?;
    Ok(())
}

fn overwrite_once(
    path: &Path,
    total: u64,
    buffer: &mut [u8],
    pass: u32,
    passes: u32,
    progress: &mut dyn FnMut(u32, u32, u64, u64),
) -> Result<(), DataSafeError> {
    let mut file = open_for_overwrite(path)?;
    rng::fill_random(buffer);

    let mut remaining = total as i64;
    while remaining > 0 {
        file.write_all(buffer)?;
        remaining -= buffer.len() as i64;

        let completed = (total as i64 - remaining.max(0)) as u64;
        progress(pass, passes, total, completed);
    }

    // Push the pass through the page cache before the next one; without
    // this, stacked passes could collapse into a single physical write.
    file.sync_all()?;
    Ok(())
}

/// Open a file for destructive overwrite.
///
/// The original used an unbuffered direct-I/O handle. Portable Rust has no
/// such primitive, so every pass is followed by `sync_all` instead — a
/// weaker guarantee (the block layer may still coalesce writes) accepted
/// as part of the best-effort wipe contract.
fn open_for_overwrite(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).open(path)
}
