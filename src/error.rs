//! Error taxonomy for the merge session.
//!
//! Three failure domains, matching how far the damage spreads:
//!
//! - [`InspectError`]: one candidate could not be decoded; the owning entry
//!   degrades to `Failed`, nothing else is affected.
//! - [`MergeError`]: the whole merge aborts and no partial output exists.
//! - [`DeliveryError`]: the host refused to save the finished buffer; the
//!   buffer is discarded, never retried.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Per-file inspection failure. Recovered locally by marking the owning
/// entry `Failed`; never aborts the rest of the batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InspectError {
    /// The bytes could not be parsed as a PDF document.
    #[error("failed to parse {name} as a PDF document: {reason}")]
    UnreadableDocument {
        /// Display name of the candidate.
        name: String,
        /// Parser error text.
        reason: String,
    },

    /// The candidate is over the configured per-file size bound.
    #[error("{name} is {size} bytes, over the {limit} byte per-file limit")]
    FileTooLarge {
        /// Display name of the candidate.
        name: String,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// Decoding ran past the configured timeout.
    #[error("decoding {name} did not finish within {timeout:?}")]
    DecodeTimeout {
        /// Display name of the candidate.
        name: String,
        /// Configured timeout.
        timeout: Duration,
    },
}

/// Whole-operation merge failure. The file list is left untouched and no
/// partial output is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Merge was requested over an empty list.
    #[error("no files to merge")]
    EmptyList,

    /// An entry's bytes failed to parse; the first such failure aborts.
    #[error("failed to parse {name}: {reason}")]
    InvalidSource {
        /// Display name of the offending entry.
        name: String,
        /// Parser error text.
        reason: String,
    },

    /// Combined input size is over the configured bound.
    #[error("combined input size {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge {
        /// Sum of all entries' byte lengths.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// Page-tree splicing or serialization failed.
    #[error("failed to assemble merged document: {reason}")]
    AssemblyFailed {
        /// Details from the underlying operation.
        reason: String,
    },
}

/// The host save mechanism rejected the finished document.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Writing or renaming the output file failed.
    #[error("failed to save merged document to {}: {source}", path.display())]
    SaveRejected {
        /// Destination that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
