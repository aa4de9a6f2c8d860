//! Integration tests for k3cloud-client
//!
//! These tests spin up an in-process mock of the vendor dispatcher and
//! drive the real client against it over HTTP, so header policy, session
//! threading and upload sequencing are exercised end-to-end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use k3cloud_client::testing::{RecordedRequest, TestServer, VendorMock};
use k3cloud_client::upload::{AttachmentUploader, ChunkProgress, ProgressObserver, UploadModel};
use k3cloud_client::{ClientError, EnvelopeStyle, SESSION_HEADER};

const SUCCESS_BODY: &str = r#"{"Result":{"ResponseStatus":{"IsSuccess":true}}}"#;
const LOGIN_BODY: &str = r#"{"LoginResultType":1,"KDSVCSessionId":"abc123"}"#;

const LOGIN_APP_SECRET: &str = "LoginByAppSecret.common.kdsvc";
const LOGIN_BY_SIGN: &str = "LoginBySign.common.kdsvc";
const LOGOUT: &str = "AuthService.Logout.common.kdsvc";
const ATTACHMENT_UPLOAD: &str = "AttachmentUpload.common.kdsvc";

/// Mock answering login-family calls with a session and everything else
/// with a generic success envelope
fn session_mock() -> VendorMock {
    VendorMock::new(|record| {
        if record.path.contains("AuthService") && !record.is_operation(LOGOUT) {
            (200, LOGIN_BODY.to_string())
        } else {
            (200, SUCCESS_BODY.to_string())
        }
    })
}

/// Decode the chunk request travelling inside a positional envelope
fn chunk_request(record: &RecordedRequest) -> Value {
    let envelope: Value = serde_json::from_str(&record.body).unwrap();
    let inner = envelope["parameters"][0].as_str().unwrap();
    serde_json::from_str(inner).unwrap()
}

// =============================================================================
// Header policy and session threading
// =============================================================================

#[tokio::test]
async fn test_authenticated_call_carries_identity_headers() {
    let mock = session_mock();
    let server = TestServer::start(mock.router()).await.unwrap();

    server.client.save("BD_MATERIAL", &json!({})).await.unwrap();

    let requests = mock.requests();
    let record = &requests[0];
    assert_eq!(record.header("X-KDApi-AcctID"), Some("acct-1"));
    assert_eq!(record.header("X-KDApi-UserName"), Some("admin"));
    assert_eq!(record.header("X-KDApi-AppID"), Some("app-1"));
    assert_eq!(record.header("X-KDApi-AppSec"), Some("secret"));
    assert_eq!(record.header("X-KDApi-LCID"), Some("2052"));
    assert_eq!(record.header("X-KDApi-OrgNum"), Some("100"));
    // no session before any login
    assert_eq!(record.header(SESSION_HEADER), None);
}

#[tokio::test]
async fn test_login_establishes_session_header() {
    let mock = session_mock();
    let mut server = TestServer::start(mock.router()).await.unwrap();

    server
        .client
        .login_by_app_secret("acct-1", "admin", "app-1", "secret", 2052)
        .await
        .unwrap();
    server.client.save("BD_MATERIAL", &json!({})).await.unwrap();

    let requests = mock.requests();
    assert!(requests[0].is_operation(LOGIN_APP_SECRET));
    // login itself carries neither identity nor session headers
    assert_eq!(requests[0].header("X-KDApi-AcctID"), None);
    assert_eq!(requests[0].header(SESSION_HEADER), None);
    // the next authenticated call carries the extracted session id
    assert_eq!(requests[1].header(SESSION_HEADER), Some("abc123"));
}

#[tokio::test]
async fn test_every_login_overwrites_session() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mock = {
        let counter = counter.clone();
        VendorMock::new(move |record| {
            if record.path.contains("AuthService") {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                (200, format!(r#"{{"KDSVCSessionId":"session-{n}"}}"#))
            } else {
                (200, SUCCESS_BODY.to_string())
            }
        })
    };
    let mut server = TestServer::start(mock.router()).await.unwrap();

    server.client.login().await.unwrap();
    server.client.login().await.unwrap();
    server.client.save("BD_MATERIAL", &json!({})).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[2].header(SESSION_HEADER), Some("session-1"));
}

#[tokio::test]
async fn test_logout_keeps_local_token() {
    let mock = session_mock();
    let mut server = TestServer::start(mock.router()).await.unwrap();

    server.client.login().await.unwrap();
    server.client.logout().await.unwrap();
    server.client.save("BD_MATERIAL", &json!({})).await.unwrap();

    let requests = mock.requests();
    assert!(requests[1].is_operation(LOGOUT));
    // logout is in the skip-auth family
    assert_eq!(requests[1].header("X-KDApi-AcctID"), None);
    // invalidation is server-side only: the stale token still goes out
    assert_eq!(requests[2].header(SESSION_HEADER), Some("abc123"));
}

#[tokio::test]
async fn test_malformed_login_response_leaves_session_unset() {
    let mock = VendorMock::always(r#"{"LoginResultType":-1,"Message":"bad credentials"}"#);
    let mut server = TestServer::start(mock.router()).await.unwrap();

    // extraction is best-effort: no session field is not an error
    server.client.login().await.unwrap();
    server.client.save("BD_MATERIAL", &json!({})).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[1].header(SESSION_HEADER), None);
}

// =============================================================================
// Envelope shapes on the wire
// =============================================================================

#[tokio::test]
async fn test_positional_envelope_on_the_wire() {
    let mock = session_mock();
    let server = TestServer::start(mock.router()).await.unwrap();

    let data = json!({"Model": {"FNumber": "M-001"}});
    server.client.save("BD_MATERIAL", &data).await.unwrap();

    let body: Value = serde_json::from_str(&mock.requests()[0].body).unwrap();
    let params = body["parameters"].as_array().unwrap();
    assert_eq!(params[0], "BD_MATERIAL");
    let inner: Value = serde_json::from_str(params[1].as_str().unwrap()).unwrap();
    assert_eq!(inner, data);
}

#[tokio::test]
async fn test_form_fields_envelope_on_the_wire() {
    let mock = session_mock();
    let server = TestServer::start_with(mock.router(), |builder| {
        builder.envelope(EnvelopeStyle::FormFields)
    })
    .await
    .unwrap();

    let data = json!({"Ids": "100001"});
    server.client.delete("SAL_ORDER", &data).await.unwrap();

    let body: Value = serde_json::from_str(&mock.requests()[0].body).unwrap();
    assert_eq!(body["formid"], "SAL_ORDER");
    let inner: Value = serde_json::from_str(body["data"].as_str().unwrap()).unwrap();
    assert_eq!(inner, data);
}

#[tokio::test]
async fn test_custom_service_uri_and_sql_payload() {
    let mock = session_mock();
    let server = TestServer::start(mock.router()).await.unwrap();

    server.client.execute_sql("SELECT 1").await.unwrap();

    let record = &mock.requests()[0];
    assert!(record.path.ends_with(
        "GlobalServiceCustom.WebApi.DataServiceHandler.ExecuteDynamicObject,GlobalServiceCustom.WebApi.common.kdsvc"
    ));
    let body: Value = serde_json::from_str(&record.body).unwrap();
    assert_eq!(body["parameters"], json!(["SELECT 1"]));
}

#[tokio::test]
async fn test_get_uses_same_header_policy() {
    let mock = session_mock();
    let server = TestServer::start(mock.router()).await.unwrap();

    server.client.get("HealthCheck.ashx", true).await.unwrap();

    let record = &mock.requests()[0];
    assert!(record.path.ends_with("/k3cloud/HealthCheck.ashx"));
    assert_eq!(record.header("X-KDApi-AcctID"), Some("acct-1"));
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn test_http_status_error_carries_status_and_body() {
    let mock = VendorMock::new(|_| (500, "dispatcher exploded".to_string()));
    let server = TestServer::start(mock.router()).await.unwrap();

    let err = server
        .client
        .save("BD_MATERIAL", &json!({}))
        .await
        .unwrap_err();
    match err {
        ClientError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "dispatcher exploded");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_html_body_classified_as_unexpected_content() {
    let mock = VendorMock::always("<html><body>502 Bad Gateway</body></html>");
    let server = TestServer::start(mock.router()).await.unwrap();

    let err = server
        .client
        .save("BD_MATERIAL", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedContent(_)));
}

#[tokio::test]
async fn test_vendor_business_failure_surfaces_verbatim() {
    // business-level failure is a 200 with IsSuccess=false; the client
    // does not reinterpret it, callers read the raw body
    let body = r#"{"Result":{"ResponseStatus":{"IsSuccess":false,
        "Errors":[{"Message":"duplicate number"}]}}}"#;
    let mock = VendorMock::always(body);
    let server = TestServer::start(mock.router()).await.unwrap();

    let response = server.client.save("BD_MATERIAL", &json!({})).await.unwrap();
    assert!(response.contains("duplicate number"));
}

// =============================================================================
// Signed login
// =============================================================================

#[tokio::test]
async fn test_signed_login_signature_verifiable_server_side() {
    let mock = session_mock();
    let mut server = TestServer::start(mock.router()).await.unwrap();

    server
        .client
        .login_by_sign("A1", "U1", "APP1", "S1", 2052)
        .await
        .unwrap();

    let requests = mock.requests();
    assert!(requests[0].is_operation(LOGIN_BY_SIGN));
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    let params = body["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 6);
    assert_eq!(params[0], "A1");
    assert_eq!(params[1], "U1");
    assert_eq!(params[2], "APP1");
    let timestamp = params[3].as_str().unwrap();
    let signature = params[4].as_str().unwrap();
    assert_eq!(params[5], 2052);

    // reconstruct the signature the way the server does: sort the five
    // values lexicographically as strings and hash the concatenation
    let mut parts = ["A1", "U1", "APP1", "S1", timestamp];
    parts.sort_unstable();
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    assert_eq!(signature, hex::encode(hasher.finalize()));
}

// =============================================================================
// Chunked upload
// =============================================================================

/// Mock for the attachment endpoint: assigns a continuation id on the
/// first chunk, then plain success
fn upload_mock() -> VendorMock {
    VendorMock::new(|record| {
        if record.is_operation(ATTACHMENT_UPLOAD) {
            let chunk = chunk_request(record);
            if chunk.get("FileId").is_none() {
                (
                    200,
                    r#"{"Result":{"ResponseStatus":{"IsSuccess":true},"FileId":"file-7"}}"#
                        .to_string(),
                )
            } else {
                (200, SUCCESS_BODY.to_string())
            }
        } else {
            (200, LOGIN_BODY.to_string())
        }
    })
}

#[tokio::test]
async fn test_upload_sequences_chunks_and_threads_continuation_id() {
    let mock = upload_mock();
    let mut server = TestServer::start(mock.router()).await.unwrap();
    server.client.login().await.unwrap();

    let encoded = STANDARD.encode(b"hello world"); // 16 chars
    let model = UploadModel::new("SAL_ORDER", "100001", "SO-001", "hello.txt");
    let uploader = AttachmentUploader::with_chunk_size(&server.client, 5);
    uploader
        .upload_base64("hello.txt", &encoded, &model)
        .await
        .unwrap();

    let chunks: Vec<Value> = mock
        .requests()
        .iter()
        .filter(|r| r.is_operation(ATTACHMENT_UPLOAD))
        .map(chunk_request)
        .collect();
    assert_eq!(chunks.len(), 4); // ceil(16 / 5)

    // strict index order: concatenating the slices in arrival order
    // reconstructs the encoded payload exactly
    let rebuilt: String = chunks
        .iter()
        .map(|c| c["SendByte"].as_str().unwrap())
        .collect();
    assert_eq!(rebuilt, encoded);

    // continuation id: absent on the first chunk, threaded through the rest
    assert!(chunks[0].get("FileId").is_none());
    for chunk in &chunks[1..] {
        assert_eq!(chunk["FileId"], "file-7");
    }

    // exactly the final chunk is flagged last
    let last_flags: Vec<bool> = chunks.iter().map(|c| c["IsLast"].as_bool().unwrap()).collect();
    assert_eq!(last_flags, vec![false, false, false, true]);

    // session-descriptor fields ride on every chunk
    for chunk in &chunks {
        assert_eq!(chunk["FileName"], "hello.txt");
        assert_eq!(chunk["FEntryKey"], "");
        assert_eq!(chunk["FormId"], "SAL_ORDER");
        assert_eq!(chunk["InterId"], "100001");
        assert_eq!(chunk["BillNO"], "SO-001");
        assert_eq!(chunk["AliasFileName"], "hello.txt");
    }
}

#[tokio::test]
async fn test_upload_goes_through_authenticated_pipeline() {
    let mock = upload_mock();
    let mut server = TestServer::start(mock.router()).await.unwrap();
    server.client.login().await.unwrap();

    let model = UploadModel::new("SAL_ORDER", "100001", "SO-001", "a.bin");
    let uploader = AttachmentUploader::with_chunk_size(&server.client, 8);
    uploader.upload("a.bin", &[0u8; 12], &model).await.unwrap();

    for record in mock.requests().iter().skip(1) {
        assert_eq!(record.header("X-KDApi-AcctID"), Some("acct-1"));
        assert_eq!(record.header(SESSION_HEADER), Some("abc123"));
    }
}

#[tokio::test]
async fn test_failed_chunk_aborts_upload() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mock = {
        let counter = counter.clone();
        VendorMock::new(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                (
                    200,
                    r#"{"Result":{"ResponseStatus":{"IsSuccess":false,
                        "Errors":[{"Message":"storage quota exceeded"}]}}}"#
                        .to_string(),
                )
            } else {
                (200, SUCCESS_BODY.to_string())
            }
        })
    };
    let server = TestServer::start(mock.router()).await.unwrap();

    let model = UploadModel::new("SAL_ORDER", "100001", "SO-001", "big.bin");
    let uploader = AttachmentUploader::with_chunk_size(&server.client, 4);
    let err = uploader
        .upload_base64("big.bin", &"A".repeat(16), &model)
        .await
        .unwrap_err();

    // the raw chunk response is the error detail
    match err {
        ClientError::Upload(body) => assert!(body.contains("storage quota exceeded")),
        other => panic!("expected Upload, got {other:?}"),
    }
    // chunks 2 and 3 were never submitted
    assert_eq!(mock.request_count(), 2);
}

struct ProgressRecorder {
    events: Vec<(usize, usize, bool)>,
}

impl ProgressObserver for ProgressRecorder {
    fn chunk_completed(&mut self, progress: &ChunkProgress) {
        self.events.push((progress.index, progress.size, progress.is_last));
    }
}

#[tokio::test]
async fn test_progress_observer_sees_every_chunk() {
    let mock = upload_mock();
    let server = TestServer::start(mock.router()).await.unwrap();

    let model = UploadModel::new("SAL_ORDER", "100001", "SO-001", "p.bin");
    let uploader = AttachmentUploader::with_chunk_size(&server.client, 6);
    let mut recorder = ProgressRecorder { events: Vec::new() };
    uploader
        .upload_base64_with_progress("p.bin", &"B".repeat(14), &model, &mut recorder)
        .await
        .unwrap();

    assert_eq!(
        recorder.events,
        vec![(0, 6, false), (1, 6, false), (2, 2, true)]
    );
}
