//! HTTP client for the auth and listing endpoints.

use dreamhome_protocol::constants::{DEFAULT_API_BASE_URL, SIGN_IN_PATH, SIGN_UP_PATH};
use dreamhome_protocol::{ApiReply, SignInRequest, SignUpRequest, SignUpResponse, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Errors from the REST API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network or connection error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected server response: {0}")]
    ResponseParse(String),
}

/// Cookie-aware client bound to one API base URL.
///
/// Clones share the same connection pool and cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for [`DEFAULT_API_BASE_URL`].
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Creates an account. The new account is not signed in.
    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpResponse, ApiError> {
        let resp: SignUpResponse = self.call(SIGN_UP_PATH, req).await?;
        info!(user = %resp.user.username, "account created");
        Ok(resp)
    }

    /// Signs in and keeps the session cookie for later requests.
    pub async fn sign_in(&self, req: &SignInRequest) -> Result<User, ApiError> {
        let user: User = self.call(SIGN_IN_PATH, req).await?;
        info!(user = %user.username, "signed in");
        Ok(user)
    }

    /// Posts a JSON body and returns the status and raw body unchanged.
    ///
    /// Only transport failures are errors here; interpreting the reply is
    /// left to the caller.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, Vec<u8>), ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        debug!(%url, status, bytes = bytes.len(), "response");
        Ok((status, bytes.to_vec()))
    }

    async fn call<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, bytes) = self.post_json(path, body).await?;
        let ok = (200..300).contains(&status);
        match ApiReply::<T>::from_slice(&bytes) {
            Ok(ApiReply::Failure(f)) => Err(ApiError::Rejected {
                status: f.status_code.unwrap_or(status),
                message: f.message,
            }),
            Ok(ApiReply::Success(value)) if ok => Ok(value),
            Err(e) if ok => Err(ApiError::ResponseParse(e.to_string())),
            _ => Err(ApiError::Rejected {
                status,
                message: format!("Request failed with status {status}"),
            }),
        }
    }
}
