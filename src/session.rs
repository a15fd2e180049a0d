//! The merge session: single owner of the list, the dedup index and all
//! in-flight inspections.
//!
//! Inspections run as spawned tasks and report back over a channel; only
//! the session applies their results, so the list has exactly one writer no
//! matter how many decodes are in flight. There is no cancellation: removing
//! an entry simply turns its eventual completion into a stale message that
//! the list drops.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::candidate::CandidateFile;
use crate::config::SessionConfig;
use crate::dedup::DedupIndex;
use crate::error::{InspectError, MergeError};
use crate::inspect::{Inspection, Inspector};
use crate::list::{EntryId, EntryStatus, FileEntry, FileList};
use crate::merge::{MergedDocument, Merger};

/// Completion message posted by one inspection task.
struct InspectionUpdate {
    id: EntryId,
    name: String,
    outcome: Result<Inspection, InspectError>,
}

/// One inspection completion, already applied to the list.
#[derive(Debug)]
pub struct InspectionEvent {
    /// Id of the entry the inspection belonged to.
    pub id: EntryId,
    /// Display name of the inspected file.
    pub name: String,
    /// Resolved page count (0 on failure).
    pub page_count: usize,
    /// The failure, when the inspection did not succeed.
    pub error: Option<InspectError>,
    /// False when the entry was removed before the result arrived; the
    /// result was dropped without touching the list.
    pub applied: bool,
}

/// Outcome of offering a batch of candidates to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Candidates accepted and appended as pending entries.
    pub accepted: usize,
    /// Candidates rejected as duplicates of files already in the session.
    pub duplicates: usize,
}

/// Value snapshot of one entry, for reporting and equality checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySnapshot {
    /// Display name.
    pub name: String,
    /// Resolved page count.
    pub page_count: usize,
    /// Lifecycle state.
    pub status: EntryStatus,
    /// Whether a preview thumbnail exists.
    pub has_thumbnail: bool,
}

/// An in-memory PDF merge session.
///
/// Must live inside a Tokio runtime; [`Session::add_files`] spawns one
/// inspection task per accepted candidate.
pub struct Session {
    config: SessionConfig,
    inspector: Inspector,
    list: FileList,
    dedup: DedupIndex,
    next_id: u64,
    in_flight: usize,
    tx: mpsc::UnboundedSender<InspectionUpdate>,
    rx: mpsc::UnboundedReceiver<InspectionUpdate>,
}

impl Session {
    /// Create an empty session with the given bounds.
    pub fn new(config: SessionConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inspector: Inspector::new(&config),
            config,
            list: FileList::new(),
            dedup: DedupIndex::new(),
            next_id: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Offer a batch of candidates. Non-duplicates are appended to the tail
    /// of the list as pending entries, in batch order, and their
    /// inspections start immediately.
    pub fn add_files(&mut self, batch: Vec<CandidateFile>) -> BatchReport {
        let offered = batch.len();
        let accepted = self.dedup.accept(batch);
        let report = BatchReport {
            accepted: accepted.len(),
            duplicates: offered - accepted.len(),
        };

        let mut entries = Vec::with_capacity(accepted.len());
        for candidate in accepted {
            let id = self.next_entry_id();
            entries.push(FileEntry::pending(id, candidate.clone()));
            self.spawn_inspection(id, candidate);
        }
        self.list.append_batch(entries);

        report
    }

    fn next_entry_id(&mut self) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_inspection(&mut self, id: EntryId, candidate: CandidateFile) {
        let inspector = self.inspector.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = inspector.inspect(&candidate).await;
            // The receiver only drops with the whole session.
            let _ = tx.send(InspectionUpdate {
                id,
                name: candidate.name().to_string(),
                outcome,
            });
        });
    }

    /// Wait for the next inspection to complete, apply it to the list and
    /// report it. Returns `None` once no inspections are in flight.
    pub async fn next_event(&mut self) -> Option<InspectionEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let update = self.rx.recv().await?;
        self.in_flight -= 1;

        let InspectionUpdate { id, name, outcome } = update;
        let page_count = outcome.as_ref().map_or(0, |i| i.page_count);
        let error = outcome.as_ref().err().cloned();
        let applied = self.list.update_result(id, outcome);

        Some(InspectionEvent {
            id,
            name,
            page_count,
            error,
            applied,
        })
    }

    /// Drain every in-flight inspection, discarding the events.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    /// Number of inspections still in flight.
    pub fn pending_inspections(&self) -> usize {
        self.in_flight
    }

    /// Move the entry at `from` to position `to`. Out-of-bounds indices are
    /// ignored; returns whether the move was applied.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.list.reorder(from, to)
    }

    /// Remove an entry and release its dedup key so the same file can be
    /// re-added later. Idempotent; its in-flight inspection, if any, is left
    /// to finish and be dropped as stale.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.list.remove(id) {
            Some(entry) => {
                self.dedup.release(&entry.dedup_key());
                true
            }
            None => false,
        }
    }

    /// Entries in list order.
    pub fn entries(&self) -> &[FileEntry] {
        self.list.entries()
    }

    /// Number of entries in the list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Sum of resolved page counts.
    pub fn total_pages(&self) -> usize {
        self.list.total_pages()
    }

    /// Value snapshot of the current list, in order.
    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.list
            .entries()
            .iter()
            .map(|e| EntrySnapshot {
                name: e.name().to_string(),
                page_count: e.page_count(),
                status: e.status(),
                has_thumbnail: e.thumbnail().is_some(),
            })
            .collect()
    }

    /// Merge the current list, in order, into one serialized document.
    ///
    /// Read-only over the list: a failed merge leaves every entry exactly
    /// where it was.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge`].
    pub fn merge(&self) -> Result<MergedDocument, MergeError> {
        Merger::new(&self.config).merge(self.list.entries())
    }
}
