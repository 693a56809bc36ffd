//! src/engine/observer.rs
//!
//! The event surface collaborators listen on. Listeners observe
//! `file_started` before the matching `file_finished`, and
//! `all_work_finished` only after the queue has been observed empty.
//!
//! There is deliberately no error event: per-file failures are written to
//! a sidecar log next to the file, and `file_finished` fires either way so
//! a progress display never stalls on a bad file.

use crate::job::Direction;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Callbacks invoked by the engine. All methods have no-op defaults;
/// implement only what the collaborator cares about.
///
/// Progress callbacks run on the worker thread — keep them fast and
/// non-blocking, or the file pipeline stalls with them.
pub trait EngineObserver: Send + Sync {
    /// A file's encrypt/decrypt has begun.
    fn file_started(&self, _path: &Path) {}

    /// A file finished (successfully or not). `path` is `None` when this
    /// fires from a queue update rather than a completed file.
    fn file_finished(&self, _path: Option<&Path>, _total: usize, _completed: usize) {}

    /// A cipher chunk was written: `(total_payload_bytes, processed)`.
    fn block_finished(&self, _total: u64, _completed: u64) {}

    /// A wipe buffer was written: `(pass, total_passes, total, completed)`.
    fn wipe_progress(&self, _pass: u32, _total_passes: u32, _total: u64, _completed: u64) {}

    /// A job was accepted into the queue.
    fn files_added(&self, _direction: Direction, _files: &[PathBuf]) {}

    /// The queue drained completely; counters have been reset.
    fn all_work_finished(&self) {}

    /// The engine needs a password interactively. Return `None` (or an
    /// empty string) to cancel the pending submit.
    fn password_requested(&self) -> Option<String> {
        None
    }
}

/// The engine's listener list. Observers may be registered at any time
/// from any thread; emission takes a read lock only.
#[derive(Default)]
pub(crate) struct ObserverSet {
    listeners: RwLock<Vec<Arc<dyn EngineObserver>>>,
}

impl ObserverSet {
    pub fn add(&self, observer: Arc<dyn EngineObserver>) {
        self.listeners
            .write()
            .expect("observer list poisoned")
            .push(observer);
    }

    fn each(&self, mut f: impl FnMut(&dyn EngineObserver)) {
        let listeners = self.listeners.read().expect("observer list poisoned");
        for listener in listeners.iter() {
            f(listener.as_ref());
        }
    }

    pub fn file_started(&self, path: &Path) {
        self.each(|o| o.file_started(path));
    }

    pub fn file_finished(&self, path: Option<&Path>, total: usize, completed: usize) {
        self.each(|o| o.file_finished(path, total, completed));
    }

    pub fn block_finished(&self, total: u64, completed: u64) {
        self.each(|o| o.block_finished(total, completed));
    }

    pub fn wipe_progress(&self, pass: u32, total_passes: u32, total: u64, completed: u64) {
        self.each(|o| o.wipe_progress(pass, total_passes, total, completed));
    }

    pub fn files_added(&self, direction: Direction, files: &[PathBuf]) {
        self.each(|o| o.files_added(direction, files));
    }

    pub fn all_work_finished(&self) {
        self.each(|o| o.all_work_finished());
    }

    /// Ask listeners for a password; the first non-empty answer wins.
    pub fn password_requested(&self) -> Option<String> {
        let listeners = self.listeners.read().expect("observer list poisoned");
        for listener in listeners.iter() {
            if let Some(password) = listener.password_requested() {
                if !password.is_empty() {
                    return Some(password);
                }
                return None; // empty answer is an explicit cancel
            }
        }
        None
    }
}
