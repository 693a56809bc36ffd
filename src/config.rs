//! # Engine Configuration
//!
//! Resolved numeric settings consumed by the engine. The library does not
//! know where these values originate; a host application loads them from
//! whatever settings store it owns and hands over the finished struct.

use crate::consts::{
    DEFAULT_FILE_PREFIX, DEFAULT_READ_BUFFER, DEFAULT_WIPE_PASSES, DEFAULT_WRITE_BUFFER,
};

/// Resolved settings for one [`Engine`](crate::engine::Engine) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Streaming read buffer size in bytes. Also the cipher chunk size.
    pub read_buffer_size: usize,

    /// Streaming write buffer size in bytes (wipe buffer size).
    pub write_buffer_size: usize,

    /// Overwrite the plaintext source with random data before deleting it.
    pub wipe_source_files: bool,

    /// Number of random-overwrite passes when wiping.
    pub wipe_passes: u32,

    /// Prefix used for generated container names, e.g. `DataSafe[0].enc`.
    pub file_name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER,
            write_buffer_size: DEFAULT_WRITE_BUFFER,
            wipe_source_files: true,
            wipe_passes: DEFAULT_WIPE_PASSES,
            file_name_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}
