use std::collections::HashMap;

use tokio::sync::mpsc;

/// Highest percentage a worker may report; 100 is reserved for completion.
const MAX_IN_FLIGHT_PERCENT: u8 = 99;

/// Worker-side end of a per-file progress stream.
///
/// Reports are clamped below 100 and deduplicated so the receiver sees a
/// strictly increasing sequence. Dropping the reporter ends the stream.
#[derive(Debug)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<u8>,
    last: Option<u8>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<u8>) -> Self {
        Self { tx, last: None }
    }

    /// Reports a percentage. Values that would not advance progress are dropped.
    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(MAX_IN_FLIGHT_PERCENT);
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        // Receiver gone means nobody is watching; the upload carries on.
        let _ = self.tx.send(percent);
    }

    /// Reports progress as bytes sent out of a total, rounded to the nearest percent.
    pub fn report_bytes(&mut self, sent: u64, total: u64) {
        if total == 0 {
            return;
        }
        let percent = ((sent.min(total) as f64 * 100.0) / total as f64).round() as u8;
        self.report(percent);
    }
}

/// Per-file upload percentages for the current batch, keyed by file id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadProgress {
    percents: HashMap<String, u8>,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a percentage if it moves the file forward.
    ///
    /// Returns `true` when the stored value changed.
    pub fn record(&mut self, file_id: &str, percent: u8) -> bool {
        let percent = percent.min(100);
        let entry = self.percents.entry(file_id.to_string()).or_insert(0);
        if percent > *entry {
            *entry = percent;
            true
        } else {
            false
        }
    }

    /// Marks a file as fully uploaded.
    pub fn complete(&mut self, file_id: &str) -> bool {
        self.record(file_id, 100)
    }

    /// Percent for a file; unknown files are at 0.
    pub fn get(&self, file_id: &str) -> u8 {
        self.percents.get(file_id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.percents.clear();
    }
}
