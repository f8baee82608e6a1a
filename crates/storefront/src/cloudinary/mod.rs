//! Cloudinary image host client.
//!
//! Uses the REST upload API directly with `reqwest` 0.13. Uploads are signed
//! with the API secret (SHA-1 over the sorted parameters followed by the
//! secret); the secret itself never leaves the process.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::config::CloudinaryConfig;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Errors that can occur when talking to Cloudinary.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cloudinary answered with a non-success status.
    #[error("Cloudinary returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the API documents.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    /// HTTPS delivery URL.
    pub url: String,
    /// Cloudinary asset identifier, including the folder.
    pub public_id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// Client for the Cloudinary upload and admin APIs.
#[derive(Clone)]
pub struct CloudinaryClient {
    inner: Arc<CloudinaryClientInner>,
}

struct CloudinaryClientInner {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: SecretString,
    folder: String,
}

impl CloudinaryClient {
    /// Create a client for the public Cloudinary API.
    #[must_use]
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Create a client against another API base (e.g. a local stub).
    #[must_use]
    pub fn with_api_base(config: &CloudinaryConfig, api_base: &str) -> Self {
        Self {
            inner: Arc::new(CloudinaryClientInner {
                client: reqwest::Client::new(),
                api_base: api_base.trim_end_matches('/').to_owned(),
                cloud_name: config.cloud_name.clone(),
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
                folder: config.folder.clone(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.inner.api_base, self.inner.cloud_name)
    }

    /// Verify the credentials with an authenticated ping.
    ///
    /// # Errors
    ///
    /// Returns `CloudinaryError::Api` if Cloudinary rejects the credentials
    /// and `CloudinaryError::Http` if it cannot be reached.
    pub async fn ping(&self) -> Result<(), CloudinaryError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("ping"))
            .basic_auth(
                &self.inner.api_key,
                Some(self.inner.api_secret.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    /// Upload an image into the configured folder.
    ///
    /// # Errors
    ///
    /// Returns `CloudinaryError` if the request fails, Cloudinary rejects it,
    /// or the response cannot be parsed.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<UploadedImage, CloudinaryError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.inner.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.inner.api_secret,
        );
        let file = data_uri(content_type, bytes);

        let form = [
            ("file", file.as_str()),
            ("api_key", self.inner.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("folder", self.inner.folder.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .inner
            .client
            .post(self.endpoint("image/upload"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Cloudinary upload failed"
            );
            return Err(api_error(status, &body));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| CloudinaryError::InvalidResponse(e.to_string()))?;

        tracing::info!(public_id = %uploaded.public_id, "image uploaded");
        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> CloudinaryError {
    let message = serde_json::from_str::<ApiErrorBody>(body).map_or_else(
        |_| body.chars().take(200).collect(),
        |parsed| parsed.error.message,
    );
    CloudinaryError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Sign request parameters the way Cloudinary expects.
///
/// Parameters are sorted by name, joined as `k=v` with `&`, the secret is
/// appended, and the result is SHA-1 hashed to lowercase hex.
#[must_use]
pub fn sign_params(params: &[(&str, &str)], api_secret: &SecretString) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by_key(|(name, _)| *name);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha1::digest(format!("{joined}{}", api_secret.expose_secret()).as_bytes());
    format!("{digest:x}")
}

/// Encode bytes as a `data:` URI.
#[must_use]
pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: SecretString::from("abcd"),
            folder: "ecommerce".to_string(),
        }
    }

    #[test]
    fn test_sign_params_sorts_and_hashes() {
        // sha1("folder=ecommerce&timestamp=1315060510abcd")
        let expected = {
            let digest = Sha1::digest(b"folder=ecommerce&timestamp=1315060510abcd");
            format!("{digest:x}")
        };
        let signature = sign_params(
            &[("timestamp", "1315060510"), ("folder", "ecommerce")],
            &SecretString::from("abcd"),
        );
        assert_eq!(signature, expected);
        assert_eq!(signature.len(), 40);
    }

    #[test]
    fn test_known_signature() {
        // Published example from the Cloudinary signing documentation.
        let signature = sign_params(
            &[
                ("timestamp", "1315060510"),
                ("public_id", "sample_image"),
                ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ],
            &SecretString::from("abcd"),
        );
        assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_endpoint() {
        let client = CloudinaryClient::with_api_base(&config(), "http://localhost:9000/v1_1/");
        assert_eq!(
            client.endpoint("ping"),
            "http://localhost:9000/v1_1/demo/ping"
        );
    }

    #[test]
    fn test_api_error_parses_message() {
        let err = api_error(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid api_key 1234"}}"#,
        );
        assert!(matches!(
            err,
            CloudinaryError::Api { status: 401, ref message } if message == "Invalid api_key 1234"
        ));
    }
}
