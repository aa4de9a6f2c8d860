//! Session state held by the client across calls

use tracing::debug;

use crate::types::LoginResponse;

/// Wire header carrying the session id on authenticated requests
pub const SESSION_HEADER: &str = "kdservice-sessionid";

/// Login session state, owned by the client instance.
///
/// Starts `Unauthenticated`; a login-family response containing a session
/// identifier moves it to `Authenticated`, and every subsequent login
/// overwrites the held token. There is no terminal state: `logout` tells
/// the server to invalidate the session but leaves the local token in
/// place (server-side-only invalidation, matching the upstream protocol).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session token held; authenticated calls go out without a
    /// session header
    #[default]
    Unauthenticated,
    /// Session established; the token is attached to every authenticated
    /// call
    Authenticated(String),
}

impl SessionState {
    /// The held session id, if any
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated(id) => Some(id),
        }
    }

    /// Best-effort extraction of a session id from a login response body.
    ///
    /// A malformed body or a missing/non-string session field leaves the
    /// state unchanged; extraction failure is not an error.
    pub fn absorb(&mut self, login_body: &str) {
        let Ok(login) = serde_json::from_str::<LoginResponse>(login_body) else {
            return;
        };
        if let Some(id) = login.kdsvc_session_id {
            debug!("session established");
            *self = Self::Authenticated(id);
        }
    }
}
