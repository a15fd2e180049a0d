//! pdfdeck - reorderable PDF merge sessions.
//!
//! This library models the core of a "combine PDFs" tool: an ordered,
//! deduplicated list of user-selected files, inspected asynchronously for
//! page counts and previews, merged in user-chosen order into a single
//! document and handed to a save target.
//!
//! - Duplicate selections (same name, same size) are filtered by a
//!   [`dedup::DedupIndex`] whose reservations are released on removal
//! - Each accepted file is inspected off the main task for its page count
//!   and a first-page preview; a failure degrades that entry only
//! - The list supports reordering and removal at any time, including while
//!   inspections are still in flight
//! - Merging concatenates every page of every entry in list order and
//!   serializes to a single buffer; it never mutates the sources
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::{CandidateFile, Session, SessionConfig};
//! use pdfdeck::output::{DirectoryTarget, SaveTarget, merged_file_name};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(SessionConfig::default());
//!
//! let bytes = tokio::fs::read("report.pdf").await?;
//! session.add_files(vec![CandidateFile::new("report.pdf", bytes)]);
//! session.settle().await;
//!
//! let merged = session.merge()?;
//! DirectoryTarget::new(".").save(&merged_file_name(), &merged.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod candidate;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod inspect;
pub mod list;
pub mod merge;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export the types most callers touch.
pub use candidate::CandidateFile;
pub use config::SessionConfig;
pub use error::{DeliveryError, InspectError, MergeError};
pub use list::{EntryId, EntryStatus, FileEntry};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
