//! Listing submission: validate, post, classify the reply.

use std::future::Future;
use std::pin::Pin;

use dreamhome_protocol::envelope::failure_from_value;
use dreamhome_protocol::{CreatedListing, ListingPayload, User};
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::form::ListingForm;

/// Status and body of a create-listing response, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Transport for the create-listing request.
///
/// The app implements this over its authenticated HTTP client; tests use
/// canned responses. Transport errors map to [`SubmitError::NetworkFailure`].
pub trait ListingApi: Send + Sync {
    fn post_listing<'a>(
        &'a self,
        payload: &'a ListingPayload,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, SubmitError>> + Send + 'a>>;
}

/// Interprets a create-listing response.
///
/// A `success: false` envelope is a rejection regardless of status. A
/// non-2xx status without one is a rejection carrying the status. A 2xx
/// body must be the created record.
pub fn classify_create_response(status: u16, body: &[u8]) -> Result<String, SubmitError> {
    let value: Option<serde_json::Value> = serde_json::from_slice(body).ok();

    if let Some(failure) = value.as_ref().and_then(failure_from_value) {
        return Err(SubmitError::ServerRejected {
            status: failure.status_code.unwrap_or(status),
            message: failure.message,
        });
    }

    if !(200..300).contains(&status) {
        let message = value
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(SubmitError::ServerRejected { status, message });
    }

    let value = value.ok_or_else(|| {
        SubmitError::ResponseParseFailure("response body is not JSON".to_string())
    })?;
    let created: CreatedListing = serde_json::from_value(value)
        .map_err(|e| SubmitError::ResponseParseFailure(e.to_string()))?;
    if created.id.is_empty() {
        return Err(SubmitError::ResponseParseFailure(
            "created listing has no id".to_string(),
        ));
    }
    Ok(created.id)
}

/// Sends validated drafts to the listing API.
pub struct ListingSubmitter<'a> {
    api: &'a dyn ListingApi,
}

impl<'a> ListingSubmitter<'a> {
    pub fn new(api: &'a dyn ListingApi) -> Self {
        Self { api }
    }

    /// Validates the form and creates the listing for `user`.
    ///
    /// Returns the new listing id. Nothing is sent when validation fails or
    /// nobody is signed in.
    pub async fn submit(&self, form: &ListingForm, user: &User) -> Result<String, SubmitError> {
        form.validate_for_submit()?;
        if user.id.is_empty() {
            return Err(SubmitError::NotSignedIn);
        }

        let payload = form.draft().to_payload(&user.id);
        let response = self.api.post_listing(&payload).await?;

        match classify_create_response(response.status, &response.body) {
            Ok(id) => {
                info!(
                    listing = %id,
                    images = payload.image_urls.len(),
                    deal = %payload.deal_type,
                    "listing created"
                );
                Ok(id)
            }
            Err(e) => {
                warn!(status = response.status, error = %e, "listing rejected");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use chrono::Utc;
    use dreamhome_protocol::UploadedImage;
    use std::sync::Mutex;

    struct CannedApi {
        reply: Result<RawResponse, String>,
        sent: Mutex<Vec<ListingPayload>>,
    }

    impl CannedApi {
        fn new(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(RawResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                reply: Err("connection refused".into()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl ListingApi for CannedApi {
        fn post_listing<'a>(
            &'a self,
            payload: &'a ListingPayload,
        ) -> Pin<Box<dyn Future<Output = Result<RawResponse, SubmitError>> + Send + 'a>> {
            Box::pin(async move {
                self.sent.lock().unwrap().push(payload.clone());
                self.reply.clone().map_err(SubmitError::NetworkFailure)
            })
        }
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            avatar: None,
        }
    }

    fn ready_form() -> ListingForm {
        let mut form = ListingForm::new();
        form.set_field("name", "Cosy cottage by the lake").unwrap();
        form.set_field("description", "Two bedrooms, quiet").unwrap();
        form.set_field("address", "5 Lake Road").unwrap();
        form.merge_uploaded(vec![UploadedImage {
            id: "a.jpg_10_1".into(),
            url: "https://img.example/a.jpg".into(),
            name: "a.jpg".into(),
            uploaded_at: Utc::now(),
        }]);
        form
    }

    #[test]
    fn success_false_under_200_is_rejection() {
        let body = br#"{"success":false,"message":"Discount price must be lower"}"#;
        match classify_create_response(200, body) {
            Err(SubmitError::ServerRejected { message, .. }) => {
                assert_eq!(message, "Discount price must be lower")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn envelope_status_code_wins() {
        let body = br#"{"success":false,"statusCode":401,"message":"Unauthorized"}"#;
        assert!(matches!(
            classify_create_response(500, body),
            Err(SubmitError::ServerRejected { status: 401, .. })
        ));
    }

    #[test]
    fn bare_error_status_is_rejection_with_status() {
        match classify_create_response(502, b"<html>Bad Gateway</html>") {
            Err(SubmitError::ServerRejected { status, message }) => {
                assert_eq!(status, 502);
                assert!(message.contains("502"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn created_record_yields_id() {
        let body = br#"{"_id":"64f0c2","name":"Cosy cottage","imageUrls":[]}"#;
        assert_eq!(classify_create_response(201, body).unwrap(), "64f0c2");
    }

    #[test]
    fn unexpected_success_body_is_parse_failure() {
        assert!(matches!(
            classify_create_response(200, br#"{"ok":true}"#),
            Err(SubmitError::ResponseParseFailure(_))
        ));
        assert!(matches!(
            classify_create_response(200, b"not json"),
            Err(SubmitError::ResponseParseFailure(_))
        ));
    }

    #[tokio::test]
    async fn submit_posts_payload_with_user_ref() {
        let api = CannedApi::new(201, r#"{"_id":"l1"}"#);
        let id = ListingSubmitter::new(&api)
            .submit(&ready_form(), &user())
            .await
            .unwrap();
        assert_eq!(id, "l1");

        let sent = api.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_ref, "u1");
        assert_eq!(sent[0].image_urls.len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_network() {
        let api = CannedApi::new(201, r#"{"_id":"l1"}"#);
        let err = ListingSubmitter::new(&api)
            .submit(&ListingForm::new(), &user())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Validation(ValidationFailure::NoImages)));
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_user_is_refused() {
        let api = CannedApi::new(201, r#"{"_id":"l1"}"#);
        let anonymous = User {
            id: String::new(),
            ..user()
        };
        let err = ListingSubmitter::new(&api)
            .submit(&ready_form(), &anonymous)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::NotSignedIn));
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_network_failure() {
        let api = CannedApi::offline();
        let err = ListingSubmitter::new(&api)
            .submit(&ready_form(), &user())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::NetworkFailure(_)));
    }
}
