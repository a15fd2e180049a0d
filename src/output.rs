//! Handing the merged buffer to the host's save mechanism.
//!
//! Delivery is synchronous once the buffer exists and is never retried: a
//! rejected save is surfaced once and the buffer dropped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DeliveryError;

/// A host-level "save these bytes under this name" mechanism.
pub trait SaveTarget {
    /// Persist the buffer under `file_name`, returning where it landed.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::SaveRejected`] when the host refuses the
    /// write.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError>;
}

/// Saves into a directory on the local filesystem.
///
/// Writes are atomic: the buffer goes to a temporary file first and is
/// renamed into place, so a failed write never leaves a truncated output.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    /// Target the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        let final_path = self.dir.join(file_name);
        let tmp_path = self.dir.join(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, bytes).map_err(|e| DeliveryError::SaveRejected {
            path: final_path.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(DeliveryError::SaveRejected {
                path: final_path,
                source: e,
            });
        }

        Ok(final_path)
    }
}

/// Generate a unique download name for a merged document, timestamped to
/// the millisecond.
pub fn merged_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("merged-{millis}.pdf")
}

/// Split an explicit output path into a directory target and a file name.
///
/// A bare file name targets the current directory.
pub fn split_output_path(path: &Path) -> Option<(DirectoryTarget, String)> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((DirectoryTarget::new(dir), file_name))
}
