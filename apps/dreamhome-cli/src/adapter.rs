//! Bridges `ApiClient` to the `ListingApi` trait required by the listing
//! crate.

use std::future::Future;
use std::pin::Pin;

use dreamhome_api::{ApiClient, ApiError};
use dreamhome_listing::{ListingApi, RawResponse, SubmitError};
use dreamhome_protocol::ListingPayload;
use dreamhome_protocol::constants::CREATE_LISTING_PATH;

/// Implements `ListingApi` by posting through the signed-in `ApiClient`.
pub struct ListingAdapter {
    api: ApiClient,
}

impl ListingAdapter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl ListingApi for ListingAdapter {
    fn post_listing<'a>(
        &'a self,
        payload: &'a ListingPayload,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, SubmitError>> + Send + 'a>> {
        Box::pin(async move {
            let (status, body) = self
                .api
                .post_json(CREATE_LISTING_PATH, payload)
                .await
                .map_err(|e: ApiError| SubmitError::NetworkFailure(e.to_string()))?;
            Ok(RawResponse { status, body })
        })
    }
}
