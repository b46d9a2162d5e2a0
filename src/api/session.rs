//! Session Module
//!
//! The bearer token is explicit context owned by the caller and shared with
//! the HTTP client. When the API reports that the token is no longer valid,
//! the client hands control to a `SessionInterceptor`, which decides where
//! the operator goes next.

use reqwest::Url;
use std::sync::RwLock;
use tracing::{info, warn};

/// Login route of the portal
pub const LOGIN_PATH: &str = "/login";

/// Credential context for calls to the certificate API
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Creates a session with no token
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Navigation capability supplied by the presentation layer
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// Hook run when the API rejects the session token
pub trait SessionInterceptor: Send + Sync {
    fn on_session_expired(&self, session: &Session, current_location: &str);
}

/// Clears the session and sends the operator back to the login page
pub struct RedirectToLogin<N> {
    navigator: N,
}

impl<N: Navigator> RedirectToLogin<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

impl<N: Navigator> SessionInterceptor for RedirectToLogin<N> {
    fn on_session_expired(&self, session: &Session, current_location: &str) {
        session.clear();

        // Already on the login page, nothing to redirect
        if current_location.starts_with(LOGIN_PATH) {
            return;
        }

        let target = login_redirect(current_location);
        warn!("Session expired at {}, redirecting to {}", current_location, target);
        self.navigator.navigate(&target);
    }
}

/// Build `/login?reason=session-expired&from=<location>` with `from` URL-encoded
pub fn login_redirect(from: &str) -> String {
    let Ok(mut url) = Url::parse("http://portal.invalid/login") else {
        return LOGIN_PATH.to_string();
    };
    url.query_pairs_mut()
        .append_pair("reason", "session-expired")
        .append_pair("from", from);

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Navigator for non-interactive callers; it only logs the target
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, location: &str) {
        info!("Log in again to continue: {}", location);
    }
}
