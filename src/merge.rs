//! Concatenation of all entries' pages, in list order, into one document.
//!
//! Sources are read-only: each entry's bytes are parsed into a fresh
//! document and the copies are spliced together, so a failed merge leaves
//! the file list exactly as it was.

use std::time::{Duration, Instant};

use lopdf::{Document, Object, ObjectId};

use crate::config::SessionConfig;
use crate::error::MergeError;
use crate::list::FileEntry;

/// Statistics about a completed merge.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of source files merged.
    pub files_merged: usize,

    /// Page count of the output document.
    pub total_pages: usize,

    /// Combined size of the source files in bytes.
    pub input_size: u64,

    /// Time spent parsing and assembling.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format the combined input size as a human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// A serialized merge result.
#[derive(Debug)]
pub struct MergedDocument {
    /// The merged PDF as a single contiguous buffer.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Merge engine over an ordered slice of entries.
#[derive(Debug, Clone)]
pub struct Merger {
    max_total_input_bytes: u64,
}

impl Merger {
    /// Create a merger using the session's bounds.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            max_total_input_bytes: config.max_total_input_bytes,
        }
    }

    /// Concatenate every page of every entry, in list order, into one
    /// serialized document.
    ///
    /// Output page order is (entry order) x (within-entry page order); no
    /// page-level selection or reordering happens here.
    ///
    /// # Errors
    ///
    /// Fails with [`MergeError::EmptyList`] for an empty slice, with
    /// [`MergeError::InvalidSource`] on the first entry whose bytes do not
    /// parse (no partial output is produced), and with
    /// [`MergeError::InputTooLarge`] when the combined input exceeds the
    /// configured bound.
    pub fn merge(&self, entries: &[FileEntry]) -> Result<MergedDocument, MergeError> {
        if entries.is_empty() {
            return Err(MergeError::EmptyList);
        }

        let input_size: u64 = entries.iter().map(|e| e.source().byte_len()).sum();
        if input_size > self.max_total_input_bytes {
            return Err(MergeError::InputTooLarge {
                size: input_size,
                limit: self.max_total_input_bytes,
            });
        }

        let start = Instant::now();

        // Parse everything up front so a bad source aborts before any
        // assembly work has happened.
        let mut documents = Vec::with_capacity(entries.len());
        for entry in entries {
            let doc = Document::load_mem(entry.source().data()).map_err(|e| {
                MergeError::InvalidSource {
                    name: entry.name().to_string(),
                    reason: e.to_string(),
                }
            })?;
            documents.push(doc);
        }

        let mut documents = documents.into_iter();
        let mut merged = documents.next().ok_or(MergeError::EmptyList)?;
        let mut max_id = merged.max_id;

        for mut doc in documents {
            // Shift object ids past everything already in the output.
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            merged.objects.extend(doc.objects);
            append_pages_to_tree(&mut merged, &page_ids)?;
        }

        merged.renumber_objects();
        merged.compress();

        let total_pages = merged.get_pages().len();

        let mut bytes = Vec::new();
        merged
            .save_to(&mut bytes)
            .map_err(|e| MergeError::AssemblyFailed {
                reason: e.to_string(),
            })?;

        Ok(MergedDocument {
            bytes,
            statistics: MergeStatistics {
                files_merged: entries.len(),
                total_pages,
                input_size,
                merge_time: start.elapsed(),
            },
        })
    }
}

/// Append page references to the output document's root page tree.
fn append_pages_to_tree(merged: &mut Document, page_ids: &[ObjectId]) -> Result<(), MergeError> {
    let assembly_err = |reason: String| MergeError::AssemblyFailed { reason };

    let catalog = merged
        .catalog_mut()
        .map_err(|e| assembly_err(format!("failed to get catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| assembly_err(format!("failed to get pages reference: {e}")))?;

    let pages_obj = merged
        .get_object_mut(pages_id)
        .map_err(|e| assembly_err(format!("failed to get pages object: {e}")))?;

    let Object::Dictionary(dict) = pages_obj else {
        return Err(assembly_err("pages object is not a dictionary".into()));
    };

    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            for &page_id in page_ids {
                kids.push(Object::Reference(page_id));
            }
        }
        _ => return Err(assembly_err("pages dictionary missing Kids array".into())),
    }

    let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

    Ok(())
}

fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
