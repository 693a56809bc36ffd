//! # Jobs
//!
//! One unit of queued work: a password, an ordered file list, and a
//! direction. Jobs are enqueued once, consumed exactly once by the worker,
//! then discarded. Equality (same direction, password, and ordered file
//! list) is what suppresses duplicate enqueues.

use crate::aliases::Password;
use std::path::PathBuf;

/// Whether a job encrypts plaintext files or decrypts containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// A queued request to transform a list of files under one password.
pub struct Job {
    pub password: Password,
    pub files: Vec<PathBuf>,
    pub direction: Direction,
}

impl Job {
    pub fn new(password: Password, files: Vec<PathBuf>, direction: Direction) -> Self {
        Self {
            password,
            files,
            direction,
        }
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && *self.password == *other.password
            && self.files == other.files
    }
}

impl Eq for Job {}

// Passwords never appear in debug output.
impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("direction", &self.direction)
            .field("files", &self.files)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::password;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn equality_covers_all_fields() {
        let a = Job::new(password("pw"), files(&["x", "y"]), Direction::Encrypt);

        assert_eq!(
            a,
            Job::new(password("pw"), files(&["x", "y"]), Direction::Encrypt)
        );
        assert_ne!(
            a,
            Job::new(password("pw"), files(&["y", "x"]), Direction::Encrypt)
        );
        assert_ne!(
            a,
            Job::new(password("other"), files(&["x", "y"]), Direction::Encrypt)
        );
        assert_ne!(
            a,
            Job::new(password("pw"), files(&["x", "y"]), Direction::Decrypt)
        );
    }

    #[test]
    fn debug_redacts_password() {
        let job = Job::new(password("hunter2"), files(&["x"]), Direction::Encrypt);
        let rendered = format!("{job:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
