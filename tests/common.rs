//! tests/common.rs
//! Shared fixtures for the integration suites.
#![allow(dead_code)] // each suite uses a different subset

use datasafe_rs::{Direction, EngineObserver};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// Standard password used across the integration tests.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// How long a test is willing to wait for the worker to drain.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the engine reported, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started(PathBuf),
    Finished(Option<PathBuf>, usize, usize),
    Block(u64, u64),
    Wipe(u32, u32, u64, u64),
    Added(Direction, Vec<PathBuf>),
    AllDone,
}

/// Observer that records every event and signals each completed drain.
pub struct Recorder {
    pub events: Mutex<Vec<Event>>,
    done_tx: Sender<()>,
}

impl Recorder {
    pub fn new() -> (std::sync::Arc<Self>, Receiver<()>) {
        let (done_tx, done_rx) = channel();
        (
            std::sync::Arc::new(Self {
                events: Mutex::new(Vec::new()),
                done_tx,
            }),
            done_rx,
        )
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EngineObserver for Recorder {
    fn file_started(&self, path: &Path) {
        self.push(Event::Started(path.to_path_buf()));
    }

    fn file_finished(&self, path: Option<&Path>, total: usize, completed: usize) {
        self.push(Event::Finished(path.map(Path::to_path_buf), total, completed));
    }

    fn block_finished(&self, total: u64, completed: u64) {
        self.push(Event::Block(total, completed));
    }

    fn wipe_progress(&self, pass: u32, total_passes: u32, total: u64, completed: u64) {
        self.push(Event::Wipe(pass, total_passes, total, completed));
    }

    fn files_added(&self, direction: Direction, files: &[PathBuf]) {
        self.push(Event::Added(direction, files.to_vec()));
    }

    fn all_work_finished(&self) {
        self.push(Event::AllDone);
        let _ = self.done_tx.send(());
    }
}

/// Block until the engine reports the queue drained.
pub fn wait_for_drain(done: &Receiver<()>) {
    done.recv_timeout(DRAIN_TIMEOUT)
        .expect("worker did not drain in time");
}

/// The container files (by extension) currently in `dir`.
pub fn containers_in(dir: &Path) -> Vec<PathBuf> {
    list_with_suffix(dir, ".enc")
}

/// The sidecar logs currently in `dir`.
pub fn sidecar_logs_in(dir: &Path) -> Vec<PathBuf> {
    list_with_suffix(dir, "_DataSafeLog.txt")
}

fn list_with_suffix(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    found.sort();
    found
}
