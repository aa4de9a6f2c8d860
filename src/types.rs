//! Wire types for the vendor's JSON envelopes
//!
//! Field names follow the vendor's PascalCase wire vocabulary. Decoded
//! types are tolerant (`#[serde(default)]`) because the service omits
//! fields freely between versions; the raw body is always available to
//! callers who need more than these projections.

use serde::{Deserialize, Serialize};

/// Nested success/failure envelope carried by operation responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResponseStatus {
    /// Success flag; failure responses carry `errors` alongside
    pub is_success: bool,
    /// Vendor error messages, surfaced verbatim
    pub errors: Vec<ErrorDetail>,
    pub msg_code: Option<i32>,
}

/// One vendor error entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ErrorDetail {
    pub field_name: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "DIndex")]
    pub d_index: Option<i64>,
}

/// Decoded login response.
///
/// Only the fields the client itself consumes; the login methods still
/// return the raw body for callers interested in the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginResponse {
    pub login_result_type: Option<i32>,
    pub message: Option<String>,
    #[serde(rename = "KDSVCSessionId")]
    pub kdsvc_session_id: Option<String>,
}

/// Wire request for one attachment chunk
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadChunkRequest {
    pub file_name: String,
    /// Entry key; the attachment service expects the field present even
    /// when empty
    #[serde(rename = "FEntryKey")]
    pub f_entry_key: String,
    pub form_id: String,
    pub is_last: bool,
    pub inter_id: String,
    #[serde(rename = "BillNO")]
    pub bill_no: String,
    pub alias_file_name: String,
    /// Base64 text slice for this chunk
    pub send_byte: String,
    /// Continuation token; absent on the first chunk, then threaded
    /// forward from the server's response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

/// Decoded chunk-upload response: `{"Result": {...}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadChunkResponse {
    pub result: UploadResult,
}

/// Inner result of a chunk upload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UploadResult {
    pub response_status: Option<ResponseStatus>,
    /// Continuation token assigned by the server, fed into the next chunk
    pub file_id: Option<String>,
}

impl UploadChunkResponse {
    /// Whether the chunk was accepted
    pub fn is_success(&self) -> bool {
        self.result
            .response_status
            .as_ref()
            .is_some_and(|s| s.is_success)
    }
}
