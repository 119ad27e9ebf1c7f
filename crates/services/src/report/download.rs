//! Delivery of finished report bytes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::ReportError;

/// Receives a finished document under a fixed file name.
pub trait DownloadSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the bytes cannot be delivered.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError>;
}

/// Writes downloads into a directory.
///
/// Bytes are staged in a temporary file in the target directory and renamed
/// into place, so a failed write never leaves a partial file behind and a
/// repeated download replaces the previous one.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileDownloadSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(file_name);
        staged.persist(&target).map_err(|err| err.error)?;
        info!(path = %target.display(), bytes = bytes.len(), "report saved");
        Ok(target)
    }
}
