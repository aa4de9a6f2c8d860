//! Client configuration with YAML/JSON loading and validation
//!
//! Configuration comes from a key/value source: a YAML or JSON file, or the
//! programmatic builder. File keys accept both the snake_case names used
//! here and the vendor's documented `X-KDApi-*` key vocabulary, so an
//! existing connection profile can be pasted in unchanged.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::envelope::EnvelopeStyle;

/// Default locale id (simplified Chinese, the vendor default)
pub const DEFAULT_LCID: u32 = 2052;
/// Default organization number
pub const DEFAULT_ORG_NUM: &str = "100";
/// Default connect/request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 360;

/// K3Cloud endpoint configuration
///
/// Immutable after construction except for explicit field assignment.
/// All five identity fields must be non-empty and `server_url` is
/// normalized to end with the `/k3cloud/` API root segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the K3Cloud instance
    #[serde(alias = "X-KDApi-ServerUrl")]
    pub server_url: String,

    /// Account set (data center) id
    #[serde(alias = "X-KDApi-AcctID")]
    pub acct_id: String,

    /// Login user name
    #[serde(alias = "X-KDApi-UserName")]
    pub username: String,

    /// Registered application id
    #[serde(alias = "X-KDApi-AppID")]
    pub app_id: String,

    /// Registered application secret
    #[serde(alias = "X-KDApi-AppSec")]
    pub app_secret: String,

    /// Locale id sent with every authenticated request
    #[serde(default = "default_lcid", alias = "X-KDApi-LCID")]
    pub lcid: u32,

    /// Organization number sent with every authenticated request
    #[serde(default = "default_org_num", alias = "X-KDApi-OrgNum")]
    pub org_num: String,

    /// Connection-establishment timeout in seconds
    #[serde(
        default = "default_timeout",
        alias = "connect_timeout",
        alias = "X-KDApi-ConnectTimeout"
    )]
    pub connect_timeout_secs: u64,

    /// Total-request timeout in seconds
    #[serde(
        default = "default_timeout",
        alias = "request_timeout",
        alias = "X-KDApi-RequestTimeout"
    )]
    pub request_timeout_secs: u64,

    /// Optional proxy URL routed through for every request
    #[serde(default, alias = "X-KDApi-Proxy")]
    pub proxy: Option<String>,

    /// Accept invalid TLS certificates.
    ///
    /// Off by default. The upstream SDK disabled certificate verification
    /// unconditionally; here it is an explicit opt-in for lab instances
    /// with self-signed certificates. Do not enable against production.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Wire envelope shape expected by the configured endpoint generation.
    /// Fixed once per client instance, not per call.
    #[serde(default)]
    pub envelope: EnvelopeStyle,
}

fn default_lcid() -> u32 {
    DEFAULT_LCID
}

fn default_org_num() -> String {
    DEFAULT_ORG_NUM.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a builder for programmatic configuration
    pub fn builder(server_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(server_url)
    }

    /// Connection-establishment timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Total-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate required fields and normalize the server URL.
    ///
    /// Idempotent: the `/k3cloud/` API root segment is appended at most
    /// once, so validating an already-validated config is a no-op.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("server_url", &self.server_url),
            ("acct_id", &self.acct_id),
            ("username", &self.username),
            ("app_id", &self.app_id),
            ("app_secret", &self.app_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }

        Url::parse(&self.server_url).map_err(|e| ConfigError::InvalidServerUrl {
            url: self.server_url.clone(),
            reason: e.to_string(),
        })?;

        let trimmed = self.server_url.trim_end_matches('/');
        self.server_url = if trimmed.ends_with("/k3cloud") {
            format!("{}/", trimmed)
        } else {
            format!("{}/k3cloud/", trimmed)
        };

        Ok(())
    }
}

/// Builder for [`ClientConfig`]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given server URL
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                server_url: server_url.into(),
                acct_id: String::new(),
                username: String::new(),
                app_id: String::new(),
                app_secret: String::new(),
                lcid: DEFAULT_LCID,
                org_num: DEFAULT_ORG_NUM.to_string(),
                connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
                request_timeout_secs: DEFAULT_TIMEOUT_SECS,
                proxy: None,
                accept_invalid_certs: false,
                envelope: EnvelopeStyle::default(),
            },
        }
    }

    /// Set the account set id
    pub fn acct_id(mut self, id: impl Into<String>) -> Self {
        self.config.acct_id = id.into();
        self
    }

    /// Set the user name
    pub fn username(mut self, name: impl Into<String>) -> Self {
        self.config.username = name.into();
        self
    }

    /// Set the application id
    pub fn app_id(mut self, id: impl Into<String>) -> Self {
        self.config.app_id = id.into();
        self
    }

    /// Set the application secret
    pub fn app_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.app_secret = secret.into();
        self
    }

    /// Set the locale id
    pub fn lcid(mut self, lcid: u32) -> Self {
        self.config.lcid = lcid;
        self
    }

    /// Set the organization number
    pub fn org_num(mut self, org: impl Into<String>) -> Self {
        self.config.org_num = org.into();
        self
    }

    /// Set the connect timeout in seconds
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Set the request timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// Route requests through the given proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Accept invalid TLS certificates (explicit opt-in, see
    /// [`ClientConfig::accept_invalid_certs`])
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Set the wire envelope shape
    pub fn envelope(mut self, style: EnvelopeStyle) -> Self {
        self.config.envelope = style;
        self
    }

    /// Validate and build the configuration
    pub fn build(mut self) -> Result<ClientConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration field '{0}' must not be empty")]
    MissingField(&'static str),

    #[error("invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),
}
