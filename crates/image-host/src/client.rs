//! Image host API client.
//!
//! Async HTTP client using `reqwest` multipart uploads with an unsigned
//! upload preset.

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::types::{ErrorResponse, UploadResponse};

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Size of the slices the request body is streamed in.
const BODY_CHUNK_SIZE: usize = 64 * 1024;

/// Errors from the image host client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("upload response has no secure_url")]
    MissingUrl,

    #[error("invalid cloud name")]
    InvalidCloudName,
}

/// Image host client bound to one cloud and upload preset.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl Client {
    /// Creates a new client for the given cloud and unsigned preset.
    pub fn new(cloud_name: &str, upload_preset: &str) -> Result<Self, Error> {
        let cloud_name = cloud_name.trim();
        if cloud_name.is_empty() || cloud_name.contains('/') {
            return Err(Error::InvalidCloudName);
        }

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
        })
    }

    /// Overrides the API base URL (tests, self-hosted proxies).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Full URL of the image upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.cloud_name)
    }

    /// Uploads one image.
    ///
    /// `on_progress(sent, total)` is called each time a slice of the body is
    /// handed to the transport. It never reports more than `total`.
    pub async fn upload<F>(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        mut on_progress: F,
    ) -> Result<UploadResponse, Error>
    where
        F: FnMut(u64, u64) + Send + Sync + 'static,
    {
        let data = Bytes::from(data);
        let total = data.len() as u64;

        // Slices share the one buffer; nothing is copied per chunk.
        let body = futures_util::stream::iter((0..data.len()).step_by(BODY_CHUNK_SIZE)).map(
            move |start| {
                let end = (start + BODY_CHUNK_SIZE).min(data.len());
                on_progress(end as u64, total);
                Ok::<_, std::io::Error>(data.slice(start..end))
            },
        );

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        debug!(file = %file_name, bytes = total, "uploading image");
        let resp = self.http.post(self.upload_url()).multipart(form).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        let parsed: UploadResponse = serde_json::from_slice(&body)?;
        if parsed.secure_url.is_empty() {
            return Err(Error::MissingUrl);
        }
        Ok(parsed)
    }
}

/// Extracts the service's `error.message`, falling back to a generic text.
fn rejection_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Upload failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot HTTP server that drains the request, then answers
    /// with `status` and `body`. The handle resolves to the raw request.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = Vec::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 64 * 1024];
                loop {
                    match tokio::time::timeout(Duration::from_millis(300), stream.read(&mut buf))
                        .await
                    {
                        Ok(Ok(n)) if n > 0 => request.extend_from_slice(&buf[..n]),
                        _ => break,
                    }
                }

                let resp = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    fn test_client(url: String) -> Client {
        Client::new("demo", "Dream Home Preset")
            .unwrap()
            .with_base_url(url)
    }

    #[tokio::test]
    async fn upload_returns_secure_url_and_reports_progress() {
        let json = r#"{"secure_url":"https://res.cloudinary.com/demo/image/upload/front.jpg","public_id":"front","bytes":200000}"#;
        let (url, handle) = mock_server(200, json).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let data = vec![7u8; 200_000];

        let resp = test_client(url)
            .upload("front.jpg", "image/jpeg", data, move |sent, total| {
                s.lock().unwrap().push((sent, total));
            })
            .await
            .unwrap();

        assert_eq!(
            resp.secure_url,
            "https://res.cloudinary.com/demo/image/upload/front.jpg"
        );

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 2, "expected several progress reports");
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(seen.last().copied(), Some((200_000, 200_000)));

        let request = String::from_utf8_lossy(&handle.await.unwrap()).into_owned();
        assert!(request.starts_with("POST /demo/image/upload"));
        assert!(request.contains("name=\"upload_preset\""));
        assert!(request.contains("Dream Home Preset"));
        assert!(request.contains("filename=\"front.jpg\""));
    }

    #[tokio::test]
    async fn body_is_streamed_in_whole_slices_of_the_file() {
        let (url, handle) = mock_server(200, r#"{"secure_url":"https://img.example/x.png"}"#).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        // Two full slices plus a short tail, with a marker byte at each edge.
        let mut data = vec![0u8; 2 * BODY_CHUNK_SIZE + 10];
        data[0] = b'A';
        data[BODY_CHUNK_SIZE] = b'B';
        *data.last_mut().unwrap() = b'Z';

        test_client(url)
            .upload("x.png", "image/png", data, move |sent, _| {
                s.lock().unwrap().push(sent);
            })
            .await
            .unwrap();

        let chunk = BODY_CHUNK_SIZE as u64;
        assert_eq!(*seen.lock().unwrap(), vec![chunk, 2 * chunk, 2 * chunk + 10]);

        let request = handle.await.unwrap();
        let find = |hay: &[u8], needle: &[u8]| hay.windows(needle.len()).position(|w| w == needle);
        let part = find(&request, b"filename=\"x.png\"").unwrap();
        let content_start = part + find(&request[part..], b"\r\n\r\n").unwrap() + 4;
        let content = &request[content_start..];
        assert_eq!(content[0], b'A');
        assert_eq!(content[BODY_CHUNK_SIZE], b'B');
        assert_eq!(content[2 * BODY_CHUNK_SIZE + 9], b'Z');
    }

    #[tokio::test]
    async fn rejected_upload_carries_service_message() {
        let (url, _handle) =
            mock_server(400, r#"{"error":{"message":"Upload preset not found"}}"#).await;

        let err = test_client(url)
            .upload("a.png", "image/png", vec![1, 2, 3], |_, _| {})
            .await
            .unwrap_err();

        match err {
            Error::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Upload preset not found");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_upload_without_body_uses_fallback() {
        let (url, _handle) = mock_server(502, "").await;

        let err = test_client(url)
            .upload("a.png", "image/png", vec![1], |_, _| {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Upload failed"), "{err}");
    }

    #[tokio::test]
    async fn success_without_secure_url_is_missing_url() {
        let (url, _handle) = mock_server(200, r#"{"public_id":"x"}"#).await;

        let err = test_client(url)
            .upload("a.png", "image/png", vec![1], |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingUrl));
    }

    #[tokio::test]
    async fn success_with_garbage_body_is_json_error() {
        let (url, _handle) = mock_server(200, "not json").await;

        let err = test_client(url)
            .upload("a.png", "image/png", vec![1], |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = test_client(format!("http://127.0.0.1:{port}"))
            .upload("a.png", "image/png", vec![1], |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn upload_url_includes_cloud_name() {
        let client = Client::new("dzl3lrrdm", "preset").unwrap();
        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/dzl3lrrdm/image/upload"
        );
    }

    #[test]
    fn blank_cloud_name_is_rejected() {
        assert!(matches!(
            Client::new("  ", "preset"),
            Err(Error::InvalidCloudName)
        ));
    }
}
