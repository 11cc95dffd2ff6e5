//! Ephemeral upload lifetime management.

use std::path::{Path, PathBuf};

/// Owns a spooled upload on disk and removes it when dropped.
///
/// The pipeline treats uploads as strictly ephemeral: whichever way a run
/// exits, success or any error, the file must not outlive the run. Tying
/// removal to `Drop` makes that hold on early returns and panics alike.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    removed: bool,
}

impl TempUpload {
    /// Take ownership of a file already written to `path`.
    pub fn claim(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now instead of waiting for drop.
    pub fn discard(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temp upload {:?}: {}", self.path, e);
            }
        } else {
            tracing::debug!("Removed temp upload {:?}", self.path);
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.remove();
    }
}
