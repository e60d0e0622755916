//! Data types for the upload flow.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};

use crate::error::UploadError;
use crate::validation::{detect_content_type, file_id};

/// A file the user picked, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Last modification time in milliseconds since the Unix epoch.
    pub last_modified_ms: i64,
    pub content_type: String,
}

impl SelectedFile {
    /// Describes a local file from its metadata and extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(UploadError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }

        let last_modified_ms = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
            last_modified_ms,
            content_type: detect_content_type(path),
        })
    }

    /// The de-duplication key this file will be staged under.
    pub fn id(&self) -> String {
        file_id(&self.name, self.size, self.last_modified_ms)
    }
}

/// A validated file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub id: String,
    pub path: PathBuf,
    pub display_name: String,
    pub size: u64,
    pub content_type: String,
}

impl From<SelectedFile> for StagedFile {
    fn from(file: SelectedFile) -> Self {
        Self {
            id: file.id(),
            path: file.path,
            display_name: file.name,
            size: file.size,
            content_type: file.content_type,
        }
    }
}

/// What a worker returns for one successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub remote_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Event emitted by the orchestrator while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A file's upload is about to begin (`index` is 0-based).
    Started {
        file_id: String,
        name: String,
        index: usize,
        total: usize,
    },
    /// Percent complete for one file.
    Progress { file_id: String, percent: u8 },
    /// The file is on the image host.
    Completed { file_id: String, url: String },
    /// The file failed; the batch stops here.
    Failed { file_id: String, error: String },
}
