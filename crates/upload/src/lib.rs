//! Listing image upload: staging rules, the upload worker, and the
//! sequential batch orchestrator.
//!
//! # Pipeline
//!
//! 1. **Select**: describe local files as [`SelectedFile`]s
//! 2. **Validate**: image content type, at most 5 MiB
//! 3. **Upload**: one [`UploadWorker`] call per file, strictly in order
//! 4. **Promote**: each success becomes an [`UploadedImage`]

mod error;
mod orchestrator;
mod progress;
mod types;
mod validation;
mod worker;

pub use error::{BatchFailure, UploadError};
pub use orchestrator::{UploadOrchestrator, upload_avatar};
pub use progress::{ProgressReporter, UploadProgress};
pub use types::{SelectedFile, StagedFile, UploadEvent, UploadReceipt};
pub use validation::{RejectReason, detect_content_type, file_id, validate_image};
pub use worker::{ImageHostWorker, UploadWorker};

pub use dreamhome_protocol::UploadedImage;
