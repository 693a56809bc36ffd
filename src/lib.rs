// src/lib.rs

//! # datasafe-rs
//!
//! A file-level encryption engine. Files are transformed in place into
//! self-describing encrypted containers (and back), with the original
//! name and modification time preserved inside an encrypted header and an
//! optional multi-pass wipe of the plaintext source.
//!
//! The [`engine::Engine`] facade is the entry point for host
//! applications: submit a job, listen on the observer surface, done. The
//! lower layers ([`header`], [`crypto`], [`wipe`], [`namer`]) are public
//! for callers with custom flows.

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod header;
pub mod job;
pub mod namer;
pub mod utils;
pub mod wipe;

// High-level API — what most users import.
pub use config::EngineConfig;
pub use engine::{Engine, EngineObserver};
pub use error::DataSafeError;
pub use job::Direction;

pub use aliases::{password, Password};
pub use header::EncryptionHeader;

// Quick container check without constructing an engine.
pub use header::probe;
