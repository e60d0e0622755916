//! Response types for the image host upload API.

use serde::{Deserialize, Serialize};

/// Successful upload response.
///
/// Only `secure_url` is relied upon; the rest is informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub public_id: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_tolerates_unknown_fields() {
        let json = r#"{"asset_id":"a1","public_id":"listings/front","version":1,
            "format":"jpg","width":800,"height":600,"bytes":52311,
            "secure_url":"https://res.cloudinary.com/demo/image/upload/v1/listings/front.jpg"}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert!(resp.secure_url.starts_with("https://"));
        assert_eq!(resp.width, 800);
    }

    #[test]
    fn error_response_parses() {
        let json = r#"{"error":{"message":"Upload preset not found"}}"#;
        let resp: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.error.message, "Upload preset not found");
    }
}
