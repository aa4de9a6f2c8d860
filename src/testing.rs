//! Test utilities for k3cloud-client
//!
//! Provides an in-process stand-in for the vendor dispatcher so
//! integration tests can drive the client end-to-end: a catch-all
//! recording router ([`VendorMock`]) and an ephemeral HTTP server
//! ([`TestServer`]) that hands back a client pointed at it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::K3CloudClient;

/// One request as seen by the mock dispatcher
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Zero-based arrival index
    pub index: usize,
    /// Request path, including the `/k3cloud/` prefix
    pub path: String,
    /// Headers, lowercased names
    pub headers: HashMap<String, String>,
    /// Raw request body
    pub body: String,
}

impl RecordedRequest {
    /// Header value by (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Whether the path targets the given dispatcher operation
    pub fn is_operation(&self, operation: &str) -> bool {
        self.path.ends_with(operation)
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

/// Catch-all mock of the vendor dispatcher.
///
/// Records every request in arrival order and answers through a
/// programmable responder, which makes it the call-order test double for
/// upload-sequencing assertions.
#[derive(Clone)]
pub struct VendorMock {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

impl VendorMock {
    /// Create a mock answering through the given responder
    pub fn new(
        responder: impl Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    ) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        }
    }

    /// Create a mock answering every request with 200 and a fixed body
    pub fn always(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(move |_| (200, body.clone()))
    }

    /// Build the axum router serving this mock
    pub fn router(&self) -> Router {
        let mock = self.clone();
        Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
            let mock = mock.clone();
            async move {
                let record = {
                    let mut requests = mock.requests.lock().expect("mock state poisoned");
                    let record = RecordedRequest {
                        index: requests.len(),
                        path: uri.path().to_string(),
                        headers: headers
                            .iter()
                            .map(|(name, value)| {
                                (
                                    name.as_str().to_lowercase(),
                                    value.to_str().unwrap_or_default().to_string(),
                                )
                            })
                            .collect(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    requests.push(record.clone());
                    record
                };

                let (status, response_body) = (mock.responder)(&record);
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    response_body,
                )
            }
        })
    }

    /// Snapshot of all recorded requests in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock state poisoned").clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock state poisoned").len()
    }
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: K3CloudClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start a server for the given router and hand back a client
    /// configured against it with fixed test credentials.
    pub async fn start(router: Router) -> anyhow::Result<Self> {
        Self::start_with(router, |builder| builder).await
    }

    /// Start a server, letting the caller adjust the client
    /// configuration (envelope style, credentials, timeouts).
    pub async fn start_with(
        router: Router,
        configure: impl FnOnce(ClientConfigBuilder) -> ClientConfigBuilder,
    ) -> anyhow::Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        // Spawn the server
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let builder = ClientConfig::builder(format!("http://{}", addr))
            .acct_id("acct-1")
            .username("admin")
            .app_id("app-1")
            .app_secret("secret")
            .connect_timeout_secs(2)
            .request_timeout_secs(5);
        let config = configure(builder).build()?;
        let client = K3CloudClient::new(config)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal if not already done
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Wait for a condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_format() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let url = format!("http://{}", addr);
        assert_eq!(url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_recorded_request_header_lookup() {
        let mut headers = HashMap::new();
        headers.insert("x-kdapi-acctid".to_string(), "acct-1".to_string());
        let record = RecordedRequest {
            index: 0,
            path: "/k3cloud/op".to_string(),
            headers,
            body: String::new(),
        };
        assert_eq!(record.header("X-KDApi-AcctID"), Some("acct-1"));
        assert_eq!(record.header("missing"), None);
    }
}
