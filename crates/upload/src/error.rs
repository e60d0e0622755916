//! Upload error types.

use dreamhome_protocol::UploadedImage;

use crate::validation::RejectReason;

/// Errors produced while uploading images.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Network or connection error: {0}")]
    NetworkFailure(String),

    #[error("{message}")]
    ServiceRejected { message: String },

    #[error("Upload succeeded but parsing failed: {0}")]
    ResponseParseFailure(String),

    #[error("You can only upload a maximum of {max} images")]
    BatchTooLarge {
        requested: usize,
        existing: usize,
        max: usize,
    },

    #[error("Please choose images first")]
    EmptyBatch,

    #[error("{0}")]
    InvalidFile(RejectReason),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dreamhome_image_host::Error> for UploadError {
    fn from(err: dreamhome_image_host::Error) -> Self {
        use dreamhome_image_host::Error;

        match err {
            Error::Http(e) => UploadError::NetworkFailure(e.to_string()),
            Error::Rejected { message, .. } => UploadError::ServiceRejected { message },
            Error::Json(e) => UploadError::ResponseParseFailure(e.to_string()),
            Error::MissingUrl => UploadError::ResponseParseFailure("missing secure_url".into()),
            Error::InvalidCloudName => UploadError::ServiceRejected {
                message: "invalid cloud name".into(),
            },
        }
    }
}

/// A batch that stopped at its first failing file.
///
/// Images uploaded before the failure are kept in `completed`; they are
/// not attached to any listing until the caller merges them.
#[derive(Debug, thiserror::Error)]
#[error("Upload error: {error}")]
pub struct BatchFailure {
    pub completed: Vec<UploadedImage>,
    pub failed_file: Option<String>,
    #[source]
    pub error: UploadError,
}

impl BatchFailure {
    /// A failure raised before any file was attempted.
    pub fn before_start(error: UploadError) -> Self {
        Self {
            completed: Vec::new(),
            failed_file: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_host_errors_map_to_taxonomy() {
        let rejected = dreamhome_image_host::Error::Rejected {
            status: 400,
            message: "Upload preset not found".into(),
        };
        assert!(matches!(
            UploadError::from(rejected),
            UploadError::ServiceRejected { message } if message == "Upload preset not found"
        ));
        assert!(matches!(
            UploadError::from(dreamhome_image_host::Error::MissingUrl),
            UploadError::ResponseParseFailure(_)
        ));
    }

    #[test]
    fn batch_failure_display_prefixes_cause() {
        let failure = BatchFailure::before_start(UploadError::EmptyBatch);
        assert_eq!(failure.to_string(), "Upload error: Please choose images first");
    }
}
