//! Upload worker trait and the image-host backed implementation.

use std::future::Future;
use std::pin::Pin;

use chrono::Utc;
use dreamhome_image_host::Client as ImageHostClient;
use tracing::debug;

use crate::error::UploadError;
use crate::progress::ProgressReporter;
use crate::types::{StagedFile, UploadReceipt};
use crate::validation::validate_image;

/// Uploads a single staged file.
///
/// Implementations report progress through the given reporter and must not
/// retry on failure. Using a trait keeps the orchestrator testable with mocks.
pub trait UploadWorker: Send + Sync {
    fn upload<'a>(
        &'a self,
        file: &'a StagedFile,
        progress: ProgressReporter,
    ) -> Pin<Box<dyn Future<Output = Result<UploadReceipt, UploadError>> + Send + 'a>>;
}

/// Worker that posts files to the image host.
pub struct ImageHostWorker {
    client: ImageHostClient,
}

impl ImageHostWorker {
    pub fn new(client: ImageHostClient) -> Self {
        Self { client }
    }
}

impl UploadWorker for ImageHostWorker {
    fn upload<'a>(
        &'a self,
        file: &'a StagedFile,
        mut progress: ProgressReporter,
    ) -> Pin<Box<dyn Future<Output = Result<UploadReceipt, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            validate_image(&file.display_name, &file.content_type, file.size)
                .map_err(UploadError::InvalidFile)?;

            let data = tokio::fs::read(&file.path).await?;
            // The file may have grown since it was staged.
            validate_image(&file.display_name, &file.content_type, data.len() as u64)
                .map_err(UploadError::InvalidFile)?;

            progress.report(0);
            let resp = self
                .client
                .upload(&file.display_name, &file.content_type, data, move |sent, total| {
                    progress.report_bytes(sent, total)
                })
                .await?;

            debug!(file = %file.id, url = %resp.secure_url, "image stored");

            Ok(UploadReceipt {
                remote_url: resp.secure_url,
                uploaded_at: Utc::now(),
            })
        })
    }
}
