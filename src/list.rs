//! The ordered file list backing the merge.
//!
//! List order is exactly the user-visible and merge-visible order. The list
//! has a single owner (the session); inspection results arrive through that
//! owner as messages, never by direct mutation, so `update_result` must
//! tolerate ids that were removed while their inspection was still in
//! flight.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateFile;
use crate::dedup::DedupKey;
use crate::error::InspectError;
use crate::inspect::{Inspection, Thumbnail};

/// Opaque token identifying one entry. Assigned at acceptance, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value, for display only.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Lifecycle state of an entry. `Pending` transitions exactly once, to
/// either terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Accepted; inspection has not resolved yet.
    Pending,
    /// Inspection succeeded; page count and preview are populated.
    Ready,
    /// Inspection failed; the entry displays degraded (0 pages, no preview).
    Failed,
}

/// An accepted, tracked file occupying one slot in the ordered list.
#[derive(Debug, Clone)]
pub struct FileEntry {
    id: EntryId,
    source: CandidateFile,
    page_count: usize,
    thumbnail: Option<Thumbnail>,
    status: EntryStatus,
}

impl FileEntry {
    pub(crate) fn pending(id: EntryId, source: CandidateFile) -> Self {
        Self {
            id,
            source,
            page_count: 0,
            thumbnail: None,
            status: EntryStatus::Pending,
        }
    }

    /// Unique token for this entry.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Display name, copied from the candidate.
    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// The captured file this entry owns.
    pub fn source(&self) -> &CandidateFile {
        &self.source
    }

    /// Page count; 0 until inspection resolves, and 0 again if it failed.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// First-page preview, present only after a successful inspection.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Identity key reserved for this entry in the dedup index.
    pub fn dedup_key(&self) -> DedupKey {
        self.source.dedup_key()
    }
}

/// The ordered collection of accepted files.
#[derive(Debug, Default)]
pub struct FileList {
    entries: Vec<FileEntry>,
}

impl FileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a batch of pending entries at the tail, preserving the
    /// batch's relative order. Does not wait on inspection.
    pub fn append_batch(&mut self, batch: Vec<FileEntry>) {
        self.entries.extend(batch);
    }

    /// Apply an inspection result to the entry with the given id.
    ///
    /// Returns `false` when the id no longer exists (the entry was removed
    /// before its inspection resolved) or the entry already reached a
    /// terminal state; the stale result is dropped, not an error.
    pub fn update_result(
        &mut self,
        id: EntryId,
        result: Result<Inspection, InspectError>,
    ) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if entry.status != EntryStatus::Pending {
            return false;
        }

        match result {
            Ok(inspection) => {
                entry.page_count = inspection.page_count;
                entry.thumbnail = inspection.thumbnail;
                entry.status = EntryStatus::Ready;
            }
            Err(_) => {
                entry.page_count = 0;
                entry.thumbnail = None;
                entry.status = EntryStatus::Failed;
            }
        }
        true
    }

    /// Move the entry at `from` so it sits at `to`, shifting the entries in
    /// between. Out-of-bounds indices make this a no-op (indices can race
    /// with a concurrent removal); returns whether the move was applied.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Delete the entry with the given id, returning it so the caller can
    /// release its dedup key. Idempotent: a second call returns `None`.
    pub fn remove(&mut self, id: EntryId) -> Option<FileEntry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Entries in list order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of known page counts across the list.
    pub fn total_pages(&self) -> usize {
        self.entries.iter().map(|e| e.page_count).sum()
    }
}
