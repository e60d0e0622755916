//! Sequential upload orchestrator.
//!
//! Runs one worker call at a time, in selection order, forwarding per-file
//! progress and stopping at the first failure.

use dreamhome_protocol::UploadedImage;
use dreamhome_protocol::constants::MAX_LISTING_IMAGES;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{BatchFailure, UploadError};
use crate::progress::{ProgressReporter, UploadProgress};
use crate::types::{StagedFile, UploadEvent};
use crate::validation::validate_image;
use crate::worker::UploadWorker;

/// Drives a batch of staged files through an [`UploadWorker`].
pub struct UploadOrchestrator {
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<UploadEvent>>,
    progress: UploadProgress,
}

impl Default for UploadOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadOrchestrator {
    /// Creates a new orchestrator.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            events_tx,
            events_rx: Some(events_rx),
            progress: UploadProgress::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Per-file progress of the current (or last) batch.
    pub fn progress(&self) -> &UploadProgress {
        &self.progress
    }

    /// Uploads `batch` in order.
    ///
    /// `existing_images` is the number of images already attached to the
    /// listing; the batch may not push the total over the image cap. On the
    /// first failure the remaining files are skipped and the images
    /// uploaded so far are returned inside the [`BatchFailure`].
    pub async fn upload_batch(
        &mut self,
        worker: &dyn UploadWorker,
        batch: &[StagedFile],
        existing_images: usize,
    ) -> Result<Vec<UploadedImage>, BatchFailure> {
        if batch.is_empty() {
            return Err(BatchFailure::before_start(UploadError::EmptyBatch));
        }
        if batch.len() + existing_images > MAX_LISTING_IMAGES {
            return Err(BatchFailure::before_start(UploadError::BatchTooLarge {
                requested: batch.len(),
                existing: existing_images,
                max: MAX_LISTING_IMAGES,
            }));
        }

        self.progress.clear();
        let mut uploaded = Vec::with_capacity(batch.len());

        for (index, file) in batch.iter().enumerate() {
            self.emit(UploadEvent::Started {
                file_id: file.id.clone(),
                name: file.display_name.clone(),
                index,
                total: batch.len(),
            });
            debug!(file = %file.id, index, total = batch.len(), "starting upload");

            match self.upload_one(worker, file).await {
                Ok(image) => {
                    if self.progress.complete(&file.id) {
                        self.emit(UploadEvent::Progress {
                            file_id: file.id.clone(),
                            percent: 100,
                        });
                    }
                    self.emit(UploadEvent::Completed {
                        file_id: file.id.clone(),
                        url: image.url.clone(),
                    });
                    uploaded.push(image);
                }
                Err(error) => {
                    warn!(file = %file.id, error = %error, "upload failed, stopping batch");
                    self.emit(UploadEvent::Failed {
                        file_id: file.id.clone(),
                        error: error.to_string(),
                    });
                    return Err(BatchFailure {
                        completed: uploaded,
                        failed_file: Some(file.id.clone()),
                        error,
                    });
                }
            }
        }

        info!(files = uploaded.len(), "upload batch completed");
        Ok(uploaded)
    }

    /// Runs the worker for one file while forwarding its progress stream.
    async fn upload_one(
        &mut self,
        worker: &dyn UploadWorker,
        file: &StagedFile,
    ) -> Result<UploadedImage, UploadError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut upload = worker.upload(file, ProgressReporter::new(tx));

        let result = loop {
            tokio::select! {
                biased;
                Some(percent) = rx.recv() => self.forward(&file.id, percent),
                res = &mut upload => break res,
            }
        };
        while let Ok(percent) = rx.try_recv() {
            self.forward(&file.id, percent);
        }

        let receipt = result?;
        Ok(UploadedImage {
            id: file.id.clone(),
            url: receipt.remote_url,
            name: file.display_name.clone(),
            uploaded_at: receipt.uploaded_at,
        })
    }

    fn forward(&mut self, file_id: &str, percent: u8) {
        // 100 is only recorded once the worker has returned successfully.
        let percent = percent.min(99);
        if self.progress.record(file_id, percent) {
            self.emit(UploadEvent::Progress {
                file_id: file_id.to_string(),
                percent,
            });
        }
    }

    fn emit(&self, event: UploadEvent) {
        let _ = self.events_tx.send(event);
    }
}

/// Uploads a single profile picture with the listing image rules.
pub async fn upload_avatar(
    worker: &dyn UploadWorker,
    file: &StagedFile,
) -> Result<UploadedImage, UploadError> {
    validate_image(&file.display_name, &file.content_type, file.size)
        .map_err(UploadError::InvalidFile)?;

    let mut orchestrator = UploadOrchestrator::new();
    let images = orchestrator
        .upload_batch(worker, std::slice::from_ref(file), 0)
        .await
        .map_err(|failure| failure.error)?;
    images.into_iter().next().ok_or(UploadError::EmptyBatch)
}
