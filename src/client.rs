//! K3Cloud HTTP client implementation

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::envelope::EnvelopeBuilder;
use crate::error::{ClientError, Result};
use crate::session::{SessionState, SESSION_HEADER};

/// Vendor dispatcher endpoints, relative to the `/k3cloud/` API root
mod endpoints {
    pub const VALIDATE_USER: &str =
        "Kingdee.BOS.WebApi.ServicesStub.AuthService.ValidateUser.common.kdsvc";
    pub const VALIDATE_USER_BY_ORG: &str =
        "Kingdee.BOS.WebApi.ServicesStub.AuthService.ValidateUserByOrgNumber.common.kdsvc";
    pub const LOGIN_BY_APP_SECRET: &str =
        "Kingdee.BOS.WebApi.ServicesStub.AuthService.LoginByAppSecret.common.kdsvc";
    pub const LOGIN_BY_SIMPLE_PASSPORT: &str =
        "Kingdee.BOS.WebApi.ServicesStub.AuthService.LoginBySimplePassport.common.kdsvc";
    pub const LOGIN_BY_SIGN: &str =
        "Kingdee.BOS.WebApi.ServicesStub.AuthService.LoginBySign.common.kdsvc";
    pub const LOGOUT: &str = "Kingdee.BOS.WebApi.ServicesStub.AuthService.Logout.common.kdsvc";

    pub const SAVE: &str = "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Save.common.kdsvc";
    pub const BATCH_SAVE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.BatchSave.common.kdsvc";
    pub const SUBMIT: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Submit.common.kdsvc";
    pub const AUDIT: &str = "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Audit.common.kdsvc";
    pub const UNAUDIT: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.UnAudit.common.kdsvc";
    pub const DELETE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Delete.common.kdsvc";
    pub const VIEW: &str = "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.View.common.kdsvc";
    pub const DRAFT: &str = "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Draft.common.kdsvc";
    pub const ALLOCATE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Allocate.common.kdsvc";
    pub const CANCEL_ALLOCATE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.CancelAllocate.common.kdsvc";
    pub const CANCEL_ASSIGN: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.CancelAssign.common.kdsvc";
    pub const EXECUTE_BILL_QUERY: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.ExecuteBillQuery.common.kdsvc";
    pub const QUERY_BUSINESS_INFO: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.QueryBusinessInfo.common.kdsvc";
    pub const QUERY_GROUP_INFO: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.QueryGroupInfo.common.kdsvc";
    // "Excute" is the vendor's spelling on the wire
    pub const EXECUTE_OPERATION: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.ExcuteOperation.common.kdsvc";
    pub const FLEX_SAVE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.FlexSave.common.kdsvc";
    pub const SEND_MSG: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.SendMsg.common.kdsvc";
    pub const PUSH: &str = "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Push.common.kdsvc";
    pub const GROUP_SAVE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.GroupSave.common.kdsvc";
    pub const GROUP_DELETE: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.GroupDelete.common.kdsvc";
    pub const DISASSEMBLY: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Disassembly.common.kdsvc";
    pub const WORKFLOW_AUDIT: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.WorkflowAudit.common.kdsvc";
    pub const SWITCH_ORG: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.SwitchOrg.common.kdsvc";
    pub const GET_SYS_REPORT_DATA: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.GetSysReportData.common.kdsvc";
    pub const ATTACHMENT_UPLOAD: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.AttachmentUpload.common.kdsvc";
    // "DownLoad" is the vendor's spelling on the wire
    pub const ATTACHMENT_DOWNLOAD: &str =
        "Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.AttachmentDownLoad.common.kdsvc";
}

/// K3Cloud Web API client
///
/// Owns one HTTP connection pool, the endpoint configuration, and the
/// current session state. Operation methods return the raw response body;
/// the vendor's envelopes vary per operation and business semantics are
/// the caller's concern.
///
/// Login-family methods take `&mut self` because they may transition the
/// session state; share a client across tasks behind external
/// synchronization if concurrent logins are possible.
#[derive(Debug, Clone)]
pub struct K3CloudClient {
    http: Client,
    base_url: Url,
    envelope: EnvelopeBuilder,
    session: SessionState,
    config: ClientConfig,
}

impl K3CloudClient {
    /// Create a new client from a configuration.
    ///
    /// Validates the configuration (fails fast with
    /// [`ClientError::Configuration`] before any network call) and builds
    /// the underlying HTTP client with the configured timeouts, proxy and
    /// TLS posture.
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout());
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        let base_url = Url::parse(&config.server_url)?;
        let envelope = EnvelopeBuilder::new(config.envelope);

        Ok(Self {
            http,
            base_url,
            envelope,
            session: SessionState::default(),
            config,
        })
    }

    /// The normalized base URL (always ends with the API root segment)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The endpoint configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// POST a pre-shaped payload to a dispatcher endpoint.
    ///
    /// This is the primitive every operation funnels through: it joins
    /// the endpoint onto the base URL, attaches headers according to
    /// `requires_auth`, executes the request, and classifies failures.
    /// Network failures surface as [`ClientError::Transport`], status
    /// >= 400 as [`ClientError::HttpStatus`], and HTML-shaped bodies as
    /// [`ClientError::UnexpectedContent`]. No retries happen here.
    #[instrument(skip(self, payload))]
    pub async fn send(&self, endpoint: &str, payload: String, requires_auth: bool) -> Result<String> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "dispatching POST");

        let request = self.apply_headers(self.http.post(url), requires_auth);
        let response = request.body(payload).send().await?;
        Self::check_response(response).await
    }

    /// GET a dispatcher endpoint. Same header and failure-classification
    /// rules as [`send`](Self::send).
    #[instrument(skip(self))]
    pub async fn get(&self, endpoint: &str, requires_auth: bool) -> Result<String> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "dispatching GET");

        let request = self.apply_headers(self.http.get(url), requires_auth);
        let response = request.send().await?;
        Self::check_response(response).await
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url.join(endpoint).map_err(Into::into)
    }

    fn apply_headers(
        &self,
        request: reqwest::RequestBuilder,
        requires_auth: bool,
    ) -> reqwest::RequestBuilder {
        let mut request = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        // Login-family calls must not carry identity or session headers;
        // the dispatcher rejects credentialed login requests.
        if requires_auth {
            request = request
                .header("X-KDApi-AcctID", &self.config.acct_id)
                .header("X-KDApi-UserName", &self.config.username)
                .header("X-KDApi-AppID", &self.config.app_id)
                .header("X-KDApi-AppSec", &self.config.app_secret)
                .header("X-KDApi-LCID", self.config.lcid.to_string())
                .header("X-KDApi-OrgNum", &self.config.org_num);
            if let Some(id) = self.session.session_id() {
                request = request.header(SESSION_HEADER, id);
            }
        }

        request
    }

    async fn check_response(response: reqwest::Response) -> Result<String> {
        let status = response.status().as_u16();
        let body = response.text().await?;

        if status >= 400 {
            return Err(ClientError::http_status(status, body));
        }

        // A gateway or reverse proxy in front of the dispatcher answers
        // errors with HTML pages and status 200.
        if body.contains("<!DOCTYPE html>") || body.contains("<html") {
            return Err(ClientError::UnexpectedContent(body));
        }

        Ok(body)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Log in with the configured identity (app-secret flow).
    ///
    /// Convenience over [`login_by_app_secret`](Self::login_by_app_secret)
    /// using the account, user and application credentials already held
    /// in the configuration.
    #[instrument(skip(self))]
    pub async fn login(&mut self) -> Result<String> {
        let (acct_id, username, app_id, app_secret, lcid) = (
            self.config.acct_id.clone(),
            self.config.username.clone(),
            self.config.app_id.clone(),
            self.config.app_secret.clone(),
            self.config.lcid,
        );
        self.login_by_app_secret(&acct_id, &username, &app_id, &app_secret, lcid)
            .await
    }

    /// Validate a user with account id, user name and password.
    #[instrument(skip(self, password))]
    pub async fn validate_user(
        &mut self,
        acct_id: &str,
        username: &str,
        password: &str,
        lcid: u32,
    ) -> Result<String> {
        let payload = self.envelope.positional(vec![
            json!(acct_id),
            json!(username),
            json!(password),
            json!(lcid),
        ]);
        self.login_internal(endpoints::VALIDATE_USER, payload).await
    }

    /// Validate a user and select the given organization.
    #[instrument(skip(self, password))]
    pub async fn validate_user_by_org(
        &mut self,
        acct_id: &str,
        username: &str,
        password: &str,
        lcid: u32,
        org_number: &str,
    ) -> Result<String> {
        let mut params = vec![
            json!(acct_id),
            json!(username),
            json!(password),
            json!(lcid),
        ];
        if !org_number.is_empty() {
            params.push(json!(org_number));
        }
        let payload = self.envelope.positional(params);
        self.login_internal(endpoints::VALIDATE_USER_BY_ORG, payload).await
    }

    /// Log in with a registered application id and secret.
    #[instrument(skip(self, app_secret))]
    pub async fn login_by_app_secret(
        &mut self,
        acct_id: &str,
        username: &str,
        app_id: &str,
        app_secret: &str,
        lcid: u32,
    ) -> Result<String> {
        let payload = self.envelope.positional(vec![
            json!(acct_id),
            json!(username),
            json!(app_id),
            json!(app_secret),
            json!(lcid),
        ]);
        self.login_internal(endpoints::LOGIN_BY_APP_SECRET, payload).await
    }

    /// Log in with an integration passport token.
    #[instrument(skip(self, passport))]
    pub async fn login_by_simple_passport(&mut self, passport: &str, lcid: u32) -> Result<String> {
        let payload = self
            .envelope
            .positional(vec![json!(passport), json!(lcid)]);
        self.login_internal(endpoints::LOGIN_BY_SIMPLE_PASSPORT, payload).await
    }

    /// Signed login: submits a SHA-256 signature over the identity tuple
    /// instead of the raw secret.
    ///
    /// The timestamp is seconds-since-epoch at signing time and the
    /// server reconstructs the same signature; clock skew beyond the
    /// server's tolerance window fails authentication.
    #[instrument(skip(self, app_secret))]
    pub async fn login_by_sign(
        &mut self,
        acct_id: &str,
        username: &str,
        app_id: &str,
        app_secret: &str,
        lcid: u32,
    ) -> Result<String> {
        let timestamp = unix_timestamp().to_string();
        let signature = signed_login_signature(acct_id, username, app_id, app_secret, &timestamp);

        let payload = self.envelope.positional(vec![
            json!(acct_id),
            json!(username),
            json!(app_id),
            json!(timestamp),
            json!(signature),
            json!(lcid),
        ]);
        self.login_internal(endpoints::LOGIN_BY_SIGN, payload).await
    }

    /// Tell the server to invalidate the current session.
    ///
    /// The locally held token is left in place: session invalidation is
    /// server-side only, and a subsequent authenticated call will still
    /// send the old (now rejected) session header until the next login.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<String> {
        self.send(endpoints::LOGOUT, String::new(), false).await
    }

    /// Issue a login-family call and feed the response through session
    /// extraction. Extraction is best-effort; a response without a
    /// session field leaves the state unchanged.
    async fn login_internal(&mut self, endpoint: &str, payload: String) -> Result<String> {
        let body = self.send(endpoint, payload, false).await?;
        self.session.absorb(&body);
        Ok(body)
    }

    // =========================================================================
    // Form operations
    // =========================================================================

    /// Save a bill or base record.
    #[instrument(skip(self, data))]
    pub async fn save(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::SAVE, form_id, None, data).await
    }

    /// Save a batch of records in one call.
    #[instrument(skip(self, data))]
    pub async fn batch_save(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::BATCH_SAVE, form_id, None, data).await
    }

    /// Submit records to the approval flow.
    #[instrument(skip(self, data))]
    pub async fn submit(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::SUBMIT, form_id, None, data).await
    }

    /// Audit (approve) records.
    #[instrument(skip(self, data))]
    pub async fn audit(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::AUDIT, form_id, None, data).await
    }

    /// Reverse a previous audit.
    #[instrument(skip(self, data))]
    pub async fn unaudit(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::UNAUDIT, form_id, None, data).await
    }

    /// Delete records.
    #[instrument(skip(self, data))]
    pub async fn delete(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::DELETE, form_id, None, data).await
    }

    /// View a single record in full detail.
    #[instrument(skip(self, data))]
    pub async fn view(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::VIEW, form_id, None, data).await
    }

    /// Save a record as draft.
    #[instrument(skip(self, data))]
    pub async fn draft(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::DRAFT, form_id, None, data).await
    }

    /// Allocate records to organizations.
    #[instrument(skip(self, data))]
    pub async fn allocate(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::ALLOCATE, form_id, None, data).await
    }

    /// Cancel a previous allocation.
    #[instrument(skip(self, data))]
    pub async fn cancel_allocate(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::CANCEL_ALLOCATE, form_id, None, data).await
    }

    /// Cancel an assignment.
    #[instrument(skip(self, data))]
    pub async fn cancel_assign(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::CANCEL_ASSIGN, form_id, None, data).await
    }

    /// Run a bill query.
    #[instrument(skip(self, data))]
    pub async fn execute_bill_query(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::EXECUTE_BILL_QUERY, data).await
    }

    /// Query form metadata.
    #[instrument(skip(self, data))]
    pub async fn query_business_info(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::QUERY_BUSINESS_INFO, data).await
    }

    /// Query grouping metadata.
    #[instrument(skip(self, data))]
    pub async fn query_group_info(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::QUERY_GROUP_INFO, data).await
    }

    /// Execute a named operation (e.g. a custom menu action) on records.
    #[instrument(skip(self, data))]
    pub async fn execute_operation(
        &self,
        form_id: &str,
        op_number: &str,
        data: &Value,
    ) -> Result<String> {
        self.form_op(endpoints::EXECUTE_OPERATION, form_id, Some(op_number), data)
            .await
    }

    /// Save flex (custom dimension) data.
    #[instrument(skip(self, data))]
    pub async fn flex_save(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::FLEX_SAVE, form_id, None, data).await
    }

    /// Send an in-system message.
    #[instrument(skip(self, data))]
    pub async fn send_msg(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::SEND_MSG, data).await
    }

    /// Push records down the bill conversion chain.
    #[instrument(skip(self, data))]
    pub async fn push(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::PUSH, form_id, None, data).await
    }

    /// Save a record group.
    #[instrument(skip(self, data))]
    pub async fn group_save(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::GROUP_SAVE, form_id, None, data).await
    }

    /// Delete a record group.
    #[instrument(skip(self, data))]
    pub async fn group_delete(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::GROUP_DELETE, data).await
    }

    /// Split a bill into parts.
    #[instrument(skip(self, data))]
    pub async fn disassembly(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::DISASSEMBLY, form_id, None, data).await
    }

    /// Drive a workflow approval step.
    #[instrument(skip(self, data))]
    pub async fn workflow_audit(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::WORKFLOW_AUDIT, data).await
    }

    /// Switch the active organization for the session.
    #[instrument(skip(self, data))]
    pub async fn switch_org(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::SWITCH_ORG, data).await
    }

    /// Fetch system report data.
    #[instrument(skip(self, data))]
    pub async fn get_sys_report_data(&self, form_id: &str, data: &Value) -> Result<String> {
        self.form_op(endpoints::GET_SYS_REPORT_DATA, form_id, None, data)
            .await
    }

    /// Upload one attachment chunk. Driven by
    /// [`AttachmentUploader`](crate::upload::AttachmentUploader) for
    /// whole-file uploads.
    #[instrument(skip(self, data))]
    pub async fn attachment_upload(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::ATTACHMENT_UPLOAD, data).await
    }

    /// Download an attachment.
    #[instrument(skip(self, data))]
    pub async fn attachment_download(&self, data: &Value) -> Result<String> {
        self.data_op(endpoints::ATTACHMENT_DOWNLOAD, data).await
    }

    // =========================================================================
    // Custom services
    // =========================================================================

    /// Invoke an operation at an arbitrary dispatcher URI.
    #[instrument(skip(self, data))]
    pub async fn execute(&self, uri: &str, data: &Value) -> Result<String> {
        let payload = self.envelope.data_operation(data);
        self.send(uri, payload, true).await
    }

    /// Invoke a custom business service deployed on the instance.
    #[instrument(skip(self, parameters))]
    pub async fn custom_business_service(
        &self,
        parameters: Vec<Value>,
        namespace: &str,
        class_name: &str,
        method: &str,
    ) -> Result<String> {
        let payload = self.envelope.positional(parameters);
        self.custom_business_service_raw(payload, namespace, class_name, method)
            .await
    }

    /// Invoke a custom business service with a caller-shaped JSON payload.
    #[instrument(skip(self, payload))]
    pub async fn custom_business_service_raw(
        &self,
        payload: String,
        namespace: &str,
        class_name: &str,
        method: &str,
    ) -> Result<String> {
        let endpoint = format!("{namespace}.{class_name}.{method},{namespace}.common.kdsvc");
        self.send(&endpoint, payload, true).await
    }

    /// Run a SQL statement through the conventional data-service handler.
    #[instrument(skip(self, sql))]
    pub async fn execute_sql(&self, sql: &str) -> Result<String> {
        self.custom_business_service(
            vec![json!(sql)],
            "GlobalServiceCustom.WebApi",
            "DataServiceHandler",
            "ExecuteDynamicObject",
        )
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn form_op(
        &self,
        endpoint: &str,
        form_id: &str,
        op_number: Option<&str>,
        data: &Value,
    ) -> Result<String> {
        let payload = self.envelope.form_operation(form_id, op_number, data);
        self.send(endpoint, payload, true).await
    }

    async fn data_op(&self, endpoint: &str, data: &Value) -> Result<String> {
        let payload = self.envelope.data_operation(data);
        self.send(endpoint, payload, true).await
    }
}

/// Seconds since the Unix epoch
pub(crate) fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Signed-login signature: the five identity values are sorted
/// lexicographically as strings, concatenated with no delimiter, and
/// hashed with SHA-256.
fn signed_login_signature(
    acct_id: &str,
    username: &str,
    app_id: &str,
    app_secret: &str,
    timestamp: &str,
) -> String {
    let mut parts = [acct_id, username, app_id, app_secret, timestamp];
    parts.sort_unstable();

    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::builder("http://k3.example.com")
            .acct_id("acct-1")
            .username("admin")
            .app_id("app-1")
            .app_secret("secret")
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = K3CloudClient::new(test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_rejects_incomplete_config() {
        let mut config = test_config();
        config.acct_id.clear();
        let err = K3CloudClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_url_join() {
        let client = K3CloudClient::new(test_config()).unwrap();
        let url = client.endpoint_url(endpoints::SAVE).unwrap();
        assert_eq!(
            url.as_str(),
            "http://k3.example.com/k3cloud/Kingdee.BOS.WebApi.ServicesStub.DynamicFormService.Save.common.kdsvc"
        );
    }

    #[test]
    fn test_signed_login_signature_pinned() {
        // sorted as strings: "1000", "A1", "APP1", "S1", "U1"
        let signature = signed_login_signature("A1", "U1", "APP1", "S1", "1000");
        assert_eq!(
            signature,
            "5f822ffd3db77b5ffd454ef6a634d119ac320dbe7d7bbff18211687cba83c36b"
        );
    }

    #[test]
    fn test_signed_login_signature_order_independent_of_roles() {
        // the signature sorts by value, so swapping which role carries
        // which string must not change the digest
        let a = signed_login_signature("A1", "U1", "APP1", "S1", "1000");
        let b = signed_login_signature("U1", "A1", "S1", "APP1", "1000");
        assert_eq!(a, b);
    }
}
