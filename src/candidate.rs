//! User-selected files before and after acceptance.

use std::fmt;
use std::sync::Arc;

use crate::dedup::DedupKey;

/// A user-selected file considered for addition to the session.
///
/// The bytes are captured once and never mutated. They sit behind an `Arc`
/// so a spawned inspection task can read them while the accepted entry keeps
/// its place in the list; no code path writes through the handle.
#[derive(Clone)]
pub struct CandidateFile {
    name: String,
    data: Arc<[u8]>,
}

impl CandidateFile {
    /// Capture a candidate from a display name and its raw bytes.
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Display name, as supplied by the selection surface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes of the file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the file in bytes.
    pub fn byte_len(&self) -> u64 {
        self.data.len() as u64
    }

    /// The identity key used by the dedup index.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::derive(&self.name, self.byte_len())
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("byte_len", &self.byte_len())
            .finish()
    }
}
