use std::path::Path;

use dreamhome_protocol::constants::{IMAGE_CONTENT_PREFIX, MAX_IMAGE_BYTES, MAX_LISTING_IMAGES};

/// Why a selected file was not staged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("{name} is not an image")]
    NotAnImage { name: String },

    #[error("{name} is larger than 5 MB")]
    TooLarge { name: String, size: u64 },

    #[error("{name} is already selected")]
    Duplicate { name: String },

    #[error("You can only upload up to {max} images ({name} skipped)")]
    LimitReached { name: String, max: usize },
}

impl RejectReason {
    /// The display name of the rejected file.
    pub fn file_name(&self) -> &str {
        match self {
            RejectReason::NotAnImage { name }
            | RejectReason::TooLarge { name, .. }
            | RejectReason::Duplicate { name }
            | RejectReason::LimitReached { name, .. } => name,
        }
    }

    pub fn limit_reached(name: impl Into<String>) -> Self {
        RejectReason::LimitReached {
            name: name.into(),
            max: MAX_LISTING_IMAGES,
        }
    }
}

/// Checks the image content type and the 5 MiB size cap.
pub fn validate_image(name: &str, content_type: &str, size: u64) -> Result<(), RejectReason> {
    let is_image = content_type
        .get(..IMAGE_CONTENT_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(IMAGE_CONTENT_PREFIX));
    if !is_image {
        return Err(RejectReason::NotAnImage { name: name.into() });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(RejectReason::TooLarge {
            name: name.into(),
            size,
        });
    }
    Ok(())
}

/// Stable identifier of a selected file: `{name}_{size}_{last_modified_ms}`.
pub fn file_id(name: &str, size: u64, last_modified_ms: i64) -> String {
    format!("{name}_{size}_{last_modified_ms}")
}

/// Guesses a content type from the file extension.
pub fn detect_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
