//! Terminal progress bars for upload batches.

use std::collections::HashMap;

use dreamhome_upload::{
    BatchFailure, StagedFile, UploadEvent, UploadOrchestrator, UploadWorker, UploadedImage,
};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;

const BAR_TEMPLATE: &str = "{prefix:>5} [{bar:30.cyan/blue}] {pos:>3}% {msg}";

/// One bar per file, driven by orchestrator events.
pub struct UploadBars {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: HashMap<String, ProgressBar>,
}

impl Default for UploadBars {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadBars {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    pub fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MultiProgress::with_draw_target(target),
            style,
            bars: HashMap::new(),
        }
    }

    pub fn apply(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Started {
                file_id,
                name,
                index,
                total,
            } => {
                let bar = self.multi.add(ProgressBar::new(100));
                bar.set_style(self.style.clone());
                bar.set_prefix(format!("{}/{}", index + 1, total));
                bar.set_message(name);
                self.bars.insert(file_id, bar);
            }
            UploadEvent::Progress { file_id, percent } => {
                if let Some(bar) = self.bars.get(&file_id) {
                    bar.set_position(u64::from(percent));
                }
            }
            UploadEvent::Completed { file_id, .. } => {
                if let Some(bar) = self.bars.get(&file_id) {
                    bar.set_position(100);
                    bar.finish();
                }
            }
            UploadEvent::Failed { file_id, error } => {
                if let Some(bar) = self.bars.get(&file_id) {
                    bar.abandon_with_message(format!("failed: {error}"));
                }
            }
        }
    }

    pub fn position(&self, file_id: &str) -> Option<u64> {
        self.bars.get(file_id).map(ProgressBar::position)
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<UploadEvent>) -> Self {
        while let Some(event) = events.recv().await {
            self.apply(event);
        }
        self
    }
}

/// Uploads a batch while rendering per-file progress bars.
pub async fn upload_with_bars(
    worker: &dyn UploadWorker,
    batch: &[StagedFile],
    existing_images: usize,
) -> Result<Vec<UploadedImage>, BatchFailure> {
    let mut orchestrator = UploadOrchestrator::new();
    let render = orchestrator
        .take_events()
        .map(|events| tokio::spawn(UploadBars::new().run(events)));

    let result = orchestrator
        .upload_batch(worker, batch, existing_images)
        .await;

    // Closing the event channel lets the renderer finish.
    drop(orchestrator);
    if let Some(handle) = render {
        let _ = handle.await;
    }
    result
}
