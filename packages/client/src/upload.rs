use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use common::config::UploadConfig;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, error_message};

/// Bytes handed to the transport per progress step.
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Receives upload progress as a whole percentage (0-100).
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// A local file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk. The file name sent to the gateway is the last
    /// path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Validation(format!("Cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    /// Public, permanent URL of the hosted file.
    pub url: String,
}

#[derive(Deserialize)]
struct GatewayResponse {
    secure_url: Option<String>,
}

/// Client for the third-party file-hosting endpoint.
#[derive(Clone)]
pub struct UploadGateway {
    http: Client,
    endpoint: String,
    preset: String,
}

impl UploadGateway {
    pub fn new(config: &UploadConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::network)?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: Client, config: &UploadConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            preset: config.preset.clone(),
        }
    }

    /// Upload a file and return its public URL.
    ///
    /// `progress` is called with the percentage of bytes handed to the
    /// transport, and once more with 100 when the gateway has answered.
    #[instrument(skip(self, file, progress), fields(file = %file.file_name, size = file.len()))]
    pub async fn upload(
        &self,
        file: UploadFile,
        progress: Option<ProgressFn>,
    ) -> Result<Uploaded, ClientError> {
        let total = file.len() as u64;
        let content_type = file.content_type();
        let UploadFile { file_name, bytes } = file;

        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let reporter = progress.clone();
        let mut sent: u64 = 0;
        let body = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            if let Some(report) = &reporter {
                report(percent(sent, total));
            }
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|e| ClientError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone());

        let res = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!(status = status.as_u16(), %message, "Upload gateway rejected file");
            return Err(ClientError::Upload(format!(
                "{message} (HTTP {})",
                status.as_u16()
            )));
        }

        let body: GatewayResponse = res
            .json()
            .await
            .map_err(|e| ClientError::Upload(format!("Unreadable gateway response: {e}")))?;
        let url = body
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClientError::Upload("Gateway response has no secure_url".into()))?;

        if let Some(report) = &progress {
            report(100);
        }
        debug!(%url, "Upload finished");
        Ok(Uploaded { url })
    }
}

/// Whole percentage of `sent` out of `total`, rounded. An empty body counts
/// as complete.
pub(crate) fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent.min(total) * 100 + total / 2) / total;
    pct as u8
}
