//! Chunked attachment upload
//!
//! The attachment endpoint limits single-request body size, so a file is
//! transported as a bounded-size series of requests: the base64-encoded
//! payload is sliced at fixed boundaries and the slices are submitted
//! strictly sequentially, each through the standard authenticated
//! pipeline. The server assigns a continuation file id on an early chunk
//! and expects it threaded through every following chunk, which is why
//! chunk `i + 1` is never submitted before chunk `i`'s response has been
//! received and validated.
//!
//! A failed chunk aborts the whole upload; no resume state is kept, so
//! the caller restarts from chunk 0.
//!
//! # Example
//!
//! ```rust,no_run
//! use k3cloud_client::upload::{AttachmentUploader, UploadModel};
//! # async fn run(client: k3cloud_client::K3CloudClient) -> anyhow::Result<()> {
//! let model = UploadModel::new("SAL_ORDER", "100001", "SO-001", "contract.pdf");
//! let uploader = AttachmentUploader::new(&client);
//! let result = uploader.upload("contract.pdf", &std::fs::read("contract.pdf")?, &model).await?;
//! # Ok(())
//! # }
//! ```

mod chunk;
mod model;

pub use chunk::{chunks, FileChunk, DEFAULT_CHUNK_SIZE};
pub use model::UploadModel;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, instrument};

use crate::client::K3CloudClient;
use crate::error::{ClientError, Result};
use crate::types::{UploadChunkRequest, UploadChunkResponse};

/// Per-chunk progress report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// Zero-based index of the completed chunk
    pub index: usize,
    /// Total number of chunks in this upload
    pub total: usize,
    /// Size of this chunk in base64 characters
    pub size: usize,
    /// Whether this was the final chunk
    pub is_last: bool,
}

/// Observer invoked once per chunk, after the chunk's request has
/// completed and before its success flag is validated.
pub trait ProgressObserver {
    fn chunk_completed(&mut self, progress: &ChunkProgress);
}

/// Drives a chunked attachment upload through a [`K3CloudClient`]
#[derive(Debug, Clone, Copy)]
pub struct AttachmentUploader<'a> {
    client: &'a K3CloudClient,
    chunk_size: usize,
}

impl<'a> AttachmentUploader<'a> {
    /// Create an uploader with the default 2 MiB chunk size
    pub fn new(client: &'a K3CloudClient) -> Self {
        Self::with_chunk_size(client, DEFAULT_CHUNK_SIZE)
    }

    /// Create an uploader with a custom chunk size (base64 characters
    /// per request)
    pub fn with_chunk_size(client: &'a K3CloudClient, chunk_size: usize) -> Self {
        Self { client, chunk_size }
    }

    /// Upload raw bytes; the payload is base64-encoded before slicing.
    ///
    /// Returns the final chunk's raw response body.
    pub async fn upload(
        &self,
        file_name: &str,
        payload: &[u8],
        model: &UploadModel,
    ) -> Result<String> {
        let encoded = STANDARD.encode(payload);
        self.upload_base64(file_name, &encoded, model).await
    }

    /// Upload raw bytes, reporting per-chunk progress.
    pub async fn upload_with_progress(
        &self,
        file_name: &str,
        payload: &[u8],
        model: &UploadModel,
        observer: &mut dyn ProgressObserver,
    ) -> Result<String> {
        let encoded = STANDARD.encode(payload);
        self.run(file_name, &encoded, model, Some(observer)).await
    }

    /// Upload an already base64-encoded payload.
    pub async fn upload_base64(
        &self,
        file_name: &str,
        encoded: &str,
        model: &UploadModel,
    ) -> Result<String> {
        self.run(file_name, encoded, model, None).await
    }

    /// Upload an already base64-encoded payload, reporting per-chunk
    /// progress.
    pub async fn upload_base64_with_progress(
        &self,
        file_name: &str,
        encoded: &str,
        model: &UploadModel,
        observer: &mut dyn ProgressObserver,
    ) -> Result<String> {
        self.run(file_name, encoded, model, Some(observer)).await
    }

    #[instrument(skip(self, encoded, model, observer))]
    async fn run(
        &self,
        file_name: &str,
        encoded: &str,
        model: &UploadModel,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<String> {
        if encoded.is_empty() {
            return Err(ClientError::Upload("empty attachment payload".to_string()));
        }
        if !encoded.is_ascii() {
            return Err(ClientError::Upload(
                "attachment payload is not base64 text".to_string(),
            ));
        }

        let slices = chunks(encoded, self.chunk_size);
        let total = slices.len();
        info!(total, size = encoded.len(), "starting chunked upload");

        // Continuation token assigned by the server; threaded into every
        // chunk after it first appears.
        let mut file_id: Option<String> = None;
        let mut last_body = String::new();

        for chunk in slices {
            let request = UploadChunkRequest {
                file_name: file_name.to_string(),
                f_entry_key: String::new(),
                form_id: model.form_id.clone(),
                is_last: chunk.is_last(),
                inter_id: model.inter_id.clone(),
                bill_no: model.bill_no.clone(),
                alias_file_name: model.alias_file_name.clone(),
                send_byte: chunk.data().to_string(),
                file_id: file_id.clone(),
            };
            let payload = serde_json::to_value(&request)
                .map_err(|e| ClientError::Upload(format!("failed to encode chunk request: {e}")))?;

            debug!(index = chunk.index(), size = chunk.len(), "submitting chunk");
            let body = self.client.attachment_upload(&payload).await?;

            if let Some(ref mut obs) = observer {
                obs.chunk_completed(&ChunkProgress {
                    index: chunk.index(),
                    total,
                    size: chunk.len(),
                    is_last: chunk.is_last(),
                });
            }

            let decoded: UploadChunkResponse =
                serde_json::from_str(&body).map_err(|_| ClientError::Upload(body.clone()))?;
            if !decoded.is_success() {
                return Err(ClientError::Upload(body));
            }

            if let Some(id) = decoded.result.file_id {
                file_id = if id.is_empty() { None } else { Some(id) };
            }
            last_body = body;
        }

        info!(total, "upload complete");
        Ok(last_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn offline_client() -> K3CloudClient {
        // points nowhere; tests below must fail before any request
        let config = ClientConfig::builder("http://127.0.0.1:9")
            .acct_id("a")
            .username("u")
            .app_id("i")
            .app_secret("s")
            .build()
            .unwrap();
        K3CloudClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_empty_payload_rejected_before_any_request() {
        let client = offline_client();
        let uploader = AttachmentUploader::new(&client);
        let model = UploadModel::default();

        let err = uploader
            .upload_base64("empty.bin", "", &model)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));
    }

    #[tokio::test]
    async fn test_non_ascii_payload_rejected() {
        let client = offline_client();
        let uploader = AttachmentUploader::new(&client);
        let model = UploadModel::default();

        let err = uploader
            .upload_base64("bad.bin", "不是base64", &model)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));
    }
}
