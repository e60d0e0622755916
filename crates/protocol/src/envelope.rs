use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_FAILURE_MESSAGE;

/// Structured failure returned by the listing API.
///
/// The API reports business-logic errors with `success: false`, sometimes
/// under a 2xx status, so the flag has to be checked on every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

/// A response body classified as either a failure envelope or a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Success(T),
    Failure(ApiFailure),
}

impl<T: DeserializeOwned> ApiReply<T> {
    /// Classifies a raw response body.
    ///
    /// A JSON object with `"success": false` is always a failure, whatever
    /// else it contains. Anything else must deserialize as `T`.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if let Some(failure) = failure_from_value(&value) {
            return Ok(ApiReply::Failure(failure));
        }
        Ok(ApiReply::Success(serde_json::from_value(value)?))
    }
}

/// Extracts a failure envelope from an already-parsed body, if it is one.
pub fn failure_from_value(value: &serde_json::Value) -> Option<ApiFailure> {
    let obj = value.as_object()?;
    if obj.get("success").and_then(serde_json::Value::as_bool) != Some(false) {
        return None;
    }
    let message = obj
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_FAILURE_MESSAGE)
        .to_string();
    let status_code = obj
        .get("statusCode")
        .and_then(serde_json::Value::as_u64)
        .and_then(|c| u16::try_from(c).ok());
    Some(ApiFailure {
        success: false,
        status_code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::CreatedListing;

    #[test]
    fn success_false_is_failure_even_with_id() {
        let body = br#"{"success":false,"_id":"l1","message":"Discount price must be lower"}"#;
        let reply = ApiReply::<CreatedListing>::from_slice(body).unwrap();
        match reply {
            ApiReply::Failure(f) => assert_eq!(f.message, "Discount price must be lower"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn created_record_is_success() {
        let body = br#"{"_id":"l1","name":"Flat"}"#;
        let reply = ApiReply::<CreatedListing>::from_slice(body).unwrap();
        assert_eq!(
            reply,
            ApiReply::Success(CreatedListing {
                id: "l1".into(),
                name: "Flat".into()
            })
        );
    }

    #[test]
    fn failure_without_message_gets_fallback() {
        let body = br#"{"success":false,"statusCode":500}"#;
        let reply = ApiReply::<CreatedListing>::from_slice(body).unwrap();
        let ApiReply::Failure(f) = reply else {
            panic!("expected failure");
        };
        assert_eq!(f.message, FALLBACK_FAILURE_MESSAGE);
        assert_eq!(f.status_code, Some(500));
    }

    #[test]
    fn success_true_is_not_a_failure() {
        let value = serde_json::json!({"success": true, "message": "ok"});
        assert!(failure_from_value(&value).is_none());
    }

    #[test]
    fn malformed_body_is_error() {
        assert!(ApiReply::<CreatedListing>::from_slice(b"<html>").is_err());
        assert!(ApiReply::<CreatedListing>::from_slice(br#"{"name":"x"}"#).is_err());
    }
}
