//! # Unique Name Generation
//!
//! Collision-free output names: an existing `name.enc` becomes
//! `name[0].enc`, an existing `name[3].enc` becomes `name[4].enc`, and so
//! on until an unused name is found. The search is bounded; a directory
//! adversarially packed with every candidate yields
//! [`DataSafeError::NameExhausted`] instead of spinning forever.

use crate::consts::MAX_NAME_ATTEMPTS;
use crate::error::DataSafeError;
use std::path::{Path, PathBuf};

/// Return `candidate` if it does not exist, otherwise the nearest
/// bracket-suffixed variant that does not.
pub fn unique_file_name(candidate: &Path) -> Result<PathBuf, DataSafeError> {
    let mut current = candidate.to_path_buf();

    for _ in 0..MAX_NAME_ATTEMPTS {
        if !current.exists() {
            return Ok(current);
        }
        current = next_candidate(&current);
    }

    Err(DataSafeError::NameExhausted(candidate.to_path_buf()))
}

fn next_candidate(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let new_stem = match bracket_counter(&stem) {
        Some((base, n)) => format!("{base}[{}]", n + 1),
        None => format!("{stem}[0]"),
    };

    let file_name = match extension {
        Some(ext) => format!("{new_stem}.{ext}"),
        None => new_stem,
    };

    path.with_file_name(file_name)
}

/// Split a stem of the form `base[n]` into its parts, if it has that form.
fn bracket_counter(stem: &str) -> Option<(&str, u64)> {
    if !stem.ends_with(']') {
        return None;
    }
    let open = stem.rfind('[')?;
    let counter = stem[open + 1..stem.len() - 1].parse().ok()?;
    Some((&stem[..open], counter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("fresh.enc");
        assert_eq!(unique_file_name(&candidate).unwrap(), candidate);
    }

    #[test]
    fn inserts_then_increments_counter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.enc"), b"x").unwrap();
        std::fs::write(dir.path().join("a[0].enc"), b"x").unwrap();

        let name = unique_file_name(&dir.path().join("a.enc")).unwrap();
        assert_eq!(name, dir.path().join("a[1].enc"));
    }

    #[test]
    fn increments_existing_counter_directly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a[3].enc"), b"x").unwrap();

        let name = unique_file_name(&dir.path().join("a[3].enc")).unwrap();
        assert_eq!(name, dir.path().join("a[4].enc"));
    }

    #[test]
    fn works_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), b"x").unwrap();

        let name = unique_file_name(&dir.path().join("README")).unwrap();
        assert_eq!(name, dir.path().join("README[0]"));
    }

    #[test]
    fn non_numeric_brackets_get_fresh_counter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a[x].enc"), b"x").unwrap();

        let name = unique_file_name(&dir.path().join("a[x].enc")).unwrap();
        assert_eq!(name, dir.path().join("a[x][0].enc"));
    }
}
