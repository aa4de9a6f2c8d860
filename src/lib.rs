//! K3Cloud Web API client
//!
//! A typed HTTP client for the Kingdee K3Cloud ERP Web API: builds the
//! dispatcher's request envelopes, manages the session token obtained at
//! login, and uploads large attachments as a strictly sequential series
//! of bounded-size chunks.
//!
//! # Example
//!
//! ```rust,no_run
//! use k3cloud_client::{ClientConfig, K3CloudClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::builder("https://k3.example.com")
//!         .acct_id("62e9d6b0a7c3fa")
//!         .username("administrator")
//!         .app_id("230720_x7Qj")
//!         .app_secret("1d6e5b9a0f3c48")
//!         .build()?;
//!
//!     let mut client = K3CloudClient::new(config)?;
//!     client.login().await?;
//!
//!     let response = client
//!         .save("BD_MATERIAL", &json!({"Model": {"FNumber": "M-001"}}))
//!         .await?;
//!     println!("{response}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Attachments
//!
//! The attachment endpoint caps single-request body size; use
//! [`upload::AttachmentUploader`] to transport a file as sequential
//! base64 chunks with a server-assigned continuation id threaded
//! through.
//!
//! # Testing
//!
//! The [`testing`] module provides an in-process mock dispatcher plus an
//! ephemeral [`testing::TestServer`] for driving the client end-to-end:
//!
//! ```rust,ignore
//! use k3cloud_client::testing::{TestServer, VendorMock};
//!
//! let mock = VendorMock::always(r#"{"Result":{"ResponseStatus":{"IsSuccess":true}}}"#);
//! let server = TestServer::start(mock.router()).await?;
//! let response = server.client.save("BD_MATERIAL", &payload).await?;
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod session;
pub mod sso;
pub mod testing;
mod types;
pub mod upload;

pub use client::K3CloudClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use envelope::EnvelopeStyle;
pub use error::{ClientError, Result};
pub use session::{SessionState, SESSION_HEADER};
pub use types::{
    ErrorDetail, LoginResponse, ResponseStatus, UploadChunkRequest, UploadChunkResponse,
    UploadResult,
};

// Re-export the upload entry points for convenience
pub use upload::{AttachmentUploader, UploadModel};
