//! Identity tracking for accepted files.
//!
//! Two selections of the same file (same name, same size) must not both end
//! up in the list. The index reserves a key per accepted candidate and holds
//! it until the owning entry is removed, so acceptance is filtered both
//! within a single batch and across batches.

use std::collections::HashSet;
use std::fmt;

use crate::candidate::CandidateFile;

/// Stable identity of a candidate file: display name plus byte length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    /// Derive the key for a (name, byte length) pair.
    pub fn derive(name: &str, byte_len: u64) -> Self {
        Self(format!("{name}-{byte_len}"))
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of reserved identity keys, owned by the session alongside the list.
#[derive(Debug, Default)]
pub struct DedupIndex {
    keys: HashSet<DedupKey>,
}

impl DedupIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter a batch down to candidates not already reserved, reserving
    /// each accepted key as it passes.
    ///
    /// Reservation happens per candidate, so a key repeated inside one batch
    /// is rejected on its second appearance. Relative order of accepted
    /// candidates matches the input. Nothing about the candidate itself is
    /// checked here; a zero-byte file is accepted and left for inspection to
    /// fail.
    pub fn accept(&mut self, batch: Vec<CandidateFile>) -> Vec<CandidateFile> {
        batch
            .into_iter()
            .filter(|candidate| self.keys.insert(candidate.dedup_key()))
            .collect()
    }

    /// Release a reservation, permitting the same file to be re-added.
    ///
    /// Called when the owning entry is removed from the list. Releasing a
    /// key that is not reserved is a no-op.
    pub fn release(&mut self, key: &DedupKey) {
        self.keys.remove(key);
    }

    /// Whether a key is currently reserved.
    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of reserved keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are reserved.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
