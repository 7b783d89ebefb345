//! Signed-in admin session.
//!
//! The session is created by [`crate::Console::sign_in`] (or from a token
//! supplied out of band) and read on every request to build the
//! `Authorization: Bearer <token>` header. It is cleared on sign-out and
//! whenever the API answers 401.

use std::sync::Arc;

use lunchdesk_core::{AdminId, Email, LoginResponse};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

const DEFAULT_DISPLAY_NAME: &str = "Admin";

/// An authenticated admin.
///
/// Implements `Debug` manually to redact the bearer token.
pub struct Session {
    /// Admin user id reported at login, if any.
    pub user_id: Option<AdminId>,
    /// Name shown in the dashboard header.
    pub display_name: String,
    /// Email used to sign in. Unknown when the token was supplied directly.
    pub email: Option<Email>,
    token: SecretString,
}

impl Session {
    /// Build a session from a successful login.
    #[must_use]
    pub fn from_login(email: Email, response: LoginResponse) -> Self {
        let user = response.user.unwrap_or_default();
        Self {
            user_id: user.id,
            display_name: user
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: Some(email),
            token: SecretString::from(response.token),
        }
    }

    /// Build a session around a token obtained elsewhere (e.g. a previous
    /// `lunchdesk login`).
    #[must_use]
    pub fn from_token(token: SecretString) -> Self {
        Self {
            user_id: None,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            email: None,
            token,
        }
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Shared holder of the current session.
///
/// Cloning is cheap; all clones see the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Arc<Session>>>>,
}

impl SessionStore {
    /// An empty store (signed out).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if signed in.
    pub async fn current(&self) -> Option<Arc<Session>> {
        self.current.read().await.clone()
    }

    /// Whether a session is present.
    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the current session.
    pub async fn set(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        *self.current.write().await = Some(Arc::clone(&session));
        session
    }

    /// Drop the current session. Returns whether one was present.
    pub async fn clear(&self) -> bool {
        self.current.write().await.take().is_some()
    }
}
