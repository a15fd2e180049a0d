//! Session configuration.
//!
//! Concrete bounds on input sizing and decode time, so corrupt or hostile
//! input cannot stall the session or exhaust memory.

use std::time::Duration;

/// Default per-file size bound: 256 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 256 * 1024 * 1024;

/// Default combined-input size bound for a merge: 1 GiB.
pub const DEFAULT_MAX_TOTAL_INPUT_BYTES: u64 = 1024 * 1024 * 1024;

/// Default thumbnail width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 96;

/// Default bound on a single decode.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunable bounds for a merge session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Largest single file the inspector will decode.
    pub max_file_bytes: u64,

    /// Largest combined input size the merge engine will accept.
    pub max_total_input_bytes: u64,

    /// Width of generated preview thumbnails, in pixels.
    pub thumbnail_width: u32,

    /// How long a single inspection may spend decoding before it is
    /// abandoned and the entry marked failed.
    pub decode_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_total_input_bytes: DEFAULT_MAX_TOTAL_INPUT_BYTES,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }
}
