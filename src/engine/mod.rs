// src/engine/mod.rs

//! High-level engine facade.
//!
//! One [`Engine`] per process, constructed explicitly and handed to
//! collaborators — there is no hidden global. Callers submit jobs from any
//! thread; exactly one background worker performs all file I/O and
//! cryptography, reporting back through [`EngineObserver`] callbacks.

pub(crate) mod observer;
pub(crate) mod worker;

pub use observer::EngineObserver;

use crate::aliases::Password;
use crate::config::EngineConfig;
use crate::header;
use crate::job::{Direction, Job};
use crate::utils::expand_paths;
use worker::Shared;

use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;

/// The process-wide encryption engine: a job queue, one worker thread,
/// and an observer list.
///
/// Dropping the engine shuts the worker down after it finishes the file
/// it is currently processing; queued-but-unstarted jobs are discarded.
pub struct Engine {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Engine {
    /// Construct an engine and start its worker thread.
    pub fn new(config: EngineConfig) -> Self {
        let shared = Arc::new(Shared::new(config));
        let worker_shared = Arc::clone(&shared);

        let worker = std::thread::Builder::new()
            .name("datasafe-worker".to_string())
            .spawn(move || worker::run(&worker_shared))
            .expect("failed to spawn worker thread");

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Register an observer. May be called at any time, from any thread.
    pub fn add_observer(&self, observer: Arc<dyn EngineObserver>) {
        self.shared.observers.add(observer);
    }

    /// Queue files for encryption or decryption. Fire and forget: results
    /// come back through the observer surface only.
    ///
    /// Directories are expanded to their recursive file listing first. A
    /// job equal to one already queued (same direction, password, and
    /// ordered file list) is silently dropped.
    pub fn submit(&self, password: Password, files: Vec<PathBuf>, direction: Direction) {
        let files = expand_paths(&files);
        let job = Job::new(password, files.clone(), direction);
        let added = files.len();

        {
            let mut jobs = self.shared.jobs.lock().expect("job queue poisoned");
            if jobs.contains(&job) {
                log::debug!("duplicate job suppressed ({added} file(s))");
                return;
            }
            jobs.push_back(job);
        }

        let total = self
            .shared
            .total_files
            .fetch_add(added, Ordering::AcqRel)
            + added;
        let completed = self.shared.completed_files.load(Ordering::Acquire);

        self.shared.observers.files_added(direction, &files);
        self.shared.observers.file_finished(None, total, completed);
        self.shared.work_ready.notify_all();
    }

    /// Like [`submit`](Self::submit), but obtains the password through the
    /// observers' `password_requested` callback. Returns `false` if no
    /// observer supplied a password (or an empty one was returned),
    /// cancelling the add.
    pub fn submit_with_prompt(&self, files: Vec<PathBuf>, direction: Direction) -> bool {
        match self.shared.observers.password_requested() {
            Some(pw) => {
                self.submit(crate::aliases::password(pw), files, direction);
                true
            }
            None => false,
        }
    }

    /// Partition `paths` by container-ness: returns the files whose fixed
    /// magic-and-version prefix matches (`want_encrypted = true`) or does
    /// not match (`want_encrypted = false`).
    ///
    /// Directories are expanded first. Files that cannot be opened are
    /// silently excluded either way. Pure query, no mutation.
    pub fn files_of_type(&self, paths: &[PathBuf], want_encrypted: bool) -> Vec<PathBuf> {
        expand_paths(paths)
            .into_iter()
            .filter(|path| match File::open(path) {
                Ok(mut file) => header::probe(&mut file).is_ok() == want_encrypted,
                Err(_) => false,
            })
            .collect()
    }

    /// Current `(total, completed)` file counters for progress display.
    /// Readers must tolerate transient staleness; both reset to zero when
    /// the queue drains.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.shared.total_files.load(Ordering::Acquire),
            self.shared.completed_files.load(Ordering::Acquire),
        )
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.work_ready.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
