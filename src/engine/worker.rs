//! src/engine/worker.rs
//!
//! The single background worker: blocks until work is signaled, drains the
//! queue completely (including jobs added while draining), resets the
//! counters, emits `all_work_finished`, and goes back to sleep.
//!
//! Every per-file error is caught here, written to a sidecar log next to
//! the failing file, and never aborts the batch.

use crate::aliases::Password;
use crate::config::EngineConfig;
use crate::consts::{CONTAINER_EXTENSION, SIDECAR_LOG_SUFFIX};
use crate::crypto::{cbc, rng};
use crate::engine::observer::ObserverSet;
use crate::error::DataSafeError;
use crate::header::EncryptionHeader;
use crate::job::{Direction, Job};
use crate::namer::unique_file_name;
use crate::wipe;

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// State shared between the engine facade and the worker thread.
///
/// The queue is the only lock-protected structure; the counters are
/// atomics so any thread can render progress, tolerating transient
/// staleness.
pub(crate) struct Shared {
    pub config: EngineConfig,
    pub jobs: Mutex<VecDeque<Job>>,
    pub work_ready: Condvar,
    pub shutdown: AtomicBool,
    pub total_files: AtomicUsize,
    pub completed_files: AtomicUsize,
    pub observers: ObserverSet,
}

impl Shared {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            jobs: Mutex::new(VecDeque::new()),
            work_ready: Condvar::new(),
            shutdown: AtomicBool::new(false),
            total_files: AtomicUsize::new(0),
            completed_files: AtomicUsize::new(0),
            observers: ObserverSet::default(),
        }
    }
}

/// Worker thread entry point: `Idle → Draining → Idle` until shutdown.
pub(crate) fn run(shared: &Shared) {
    loop {
        {
            let mut jobs = shared.jobs.lock().expect("job queue poisoned");
            while jobs.is_empty() && !shared.shutdown.load(Ordering::Acquire) {
                jobs = shared
                    .work_ready
                    .wait(jobs)
                    .expect("job queue poisoned");
            }
        }
        if shared.shutdown.load(Ordering::Acquire) {
            return;
        }

        // Drain fully: jobs enqueued while we work extend this loop
        // rather than producing separate wake-ups.
        loop {
            let job = shared
                .jobs
                .lock()
                .expect("job queue poisoned")
                .pop_front();
            let Some(job) = job else { break };

            log::debug!(
                "processing {:?} job with {} file(s)",
                job.direction,
                job.files.len()
            );
            process_job(shared, &job);
        }

        shared.total_files.store(0, Ordering::Release);
        shared.completed_files.store(0, Ordering::Release);
        shared.observers.all_work_finished();
    }
}

fn process_job(shared: &Shared, job: &Job) {
    for file in &job.files {
        shared.observers.file_started(file);

        let result = match job.direction {
            Direction::Encrypt => encrypt_file(shared, file, &job.password),
            Direction::Decrypt => decrypt_file(shared, file, &job.password),
        };

        if let Err(error) = result {
            log::warn!("{:?} of {} failed: {error}", job.direction, file.display());
            write_sidecar_log(file, job.direction, &error);
        }

        let completed = shared.completed_files.fetch_add(1, Ordering::AcqRel) + 1;
        let total = shared.total_files.load(Ordering::Acquire);
        shared.observers.file_finished(Some(file), total, completed);
    }
}

/// Encrypt one file into a fresh container, then dispose of the source.
///
/// The container name comes from the configured prefix, not the original
/// name — the original name travels only inside the encrypted header.
/// On any error the source is left intact and unwiped.
fn encrypt_file(shared: &Shared, source: &Path, password: &Password) -> Result<(), DataSafeError> {
    let config = &shared.config;

    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DataSafeError::InvalidHeaderField(format!(
                "file name of {} is not valid UTF-8",
                source.display()
            ))
        })?;

    let metadata = std::fs::metadata(source)?;
    let modified = metadata.modified().map(unix_seconds).unwrap_or(0);

    let mut header = EncryptionHeader::new(file_name, modified)?;
    let (header_bytes, key) = header.encode(rng::random_iv(), password)?;

    let destination = unique_file_name(&sibling(
        source,
        &format!("{}[0].{}", config.file_name_prefix, CONTAINER_EXTENSION),
    ))?;

    let mut reader = BufReader::with_capacity(config.read_buffer_size, File::open(source)?);
    let mut writer = BufWriter::with_capacity(
        config.write_buffer_size,
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)?,
    );

    writer.write_all(&header_bytes)?;

    let total = metadata.len();
    cbc::encrypt_stream(
        &mut reader,
        &mut writer,
        &key,
        header.iv(),
        config.read_buffer_size,
        total,
        |total, done| shared.observers.block_finished(total, done),
    )?;

    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    drop(reader);

    // Source is now redundant; wipe or plainly delete it per config.
    if config.wipe_source_files {
        wipe::wipe(
            source,
            config.wipe_passes,
            config.write_buffer_size,
            &mut |pass, passes, total, done| {
                shared.observers.wipe_progress(pass, passes, total, done)
            },
        )?;
    } else {
        std::fs::remove_file(source)?;
    }

    log::debug!("encrypted {} -> {}", source.display(), destination.display());
    Ok(())
}

/// Decrypt one container back to its original name, then delete the
/// container. If the recovered name equals the container's own name, the
/// output is written to a unique sibling first and renamed into place
/// afterwards — never an in-place overwrite.
fn decrypt_file(shared: &Shared, source: &Path, password: &Password) -> Result<(), DataSafeError> {
    let config = &shared.config;
    let metadata = std::fs::metadata(source)?;

    let mut reader = BufReader::with_capacity(
        config.read_buffer_size,
        OpenOptions::new().read(true).write(true).open(source)?,
    );
    let (header, key) = EncryptionHeader::parse(&mut reader, password)?;

    let recovered_name = header.original_file_name();
    let same_name = source
        .file_name()
        .map(|n| n == std::ffi::OsStr::new(recovered_name))
        .unwrap_or(false);

    let destination = unique_file_name(&sibling(source, recovered_name))?;

    let mut writer = BufWriter::with_capacity(
        config.write_buffer_size,
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)?,
    );

    let total = metadata.len().saturating_sub(header.payload_offset());
    cbc::decrypt_stream(
        &mut reader,
        &mut writer,
        &key,
        header.iv(),
        config.read_buffer_size,
        total,
        |total, done| shared.observers.block_finished(total, done),
    )?;

    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    drop(reader);

    // The container was never plaintext; a plain delete is enough.
    std::fs::remove_file(source)?;

    if same_name {
        std::fs::rename(&destination, source)?;
    }

    log::debug!("decrypted {} -> {}", source.display(), recovered_name);
    Ok(())
}

/// Write the per-file failure log next to the failing file. Best effort:
/// if even the log cannot be written, the failure is only logged.
fn write_sidecar_log(file: &Path, direction: Direction, error: &DataSafeError) {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let candidate = sibling(file, &format!("{stem}{SIDECAR_LOG_SUFFIX}"));
    let log_path = match unique_file_name(&candidate) {
        Ok(path) => path,
        Err(_) => candidate,
    };

    let mut text = String::new();
    match direction {
        Direction::Encrypt => {
            text.push_str(&format!(
                "There was an error encrypting the file: {}\r\n\r\n",
                file.display()
            ));
        }
        Direction::Decrypt => {
            text.push_str(&format!(
                "There was an error decrypting the file: {}\r\n",
                file.display()
            ));
            text.push_str("The most likely cause of this error is an invalid password. \r\n");
            text.push_str(
                "Another likely cause is that the file you were trying to decrypt was not actually encrypted. \r\n",
            );
        }
    }
    text.push_str(&format!("{error}\r\n\r\nDetail: {error:?}\r\n"));

    if let Err(e) = std::fs::write(&log_path, text) {
        log::warn!(
            "could not write sidecar log {}: {e}",
            log_path.display()
        );
    }
}

/// A path next to `file` with the given name.
fn sibling(file: &Path, name: &str) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}
