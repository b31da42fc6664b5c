//! Admin authentication - credential checking and session tokens.
//!
//! Credentials are checked through the [`CredentialStore`] trait so the source of
//! truth can be swapped; the service ships with [`StaticCredentials`] built from
//! configuration. A successful login issues a random bearer token that stays valid
//! for a fixed time-to-live.

use crate::{
    config::settings::AuthConfig,
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Source of admin credentials
pub trait CredentialStore: Send + Sync {
    /// Whether `username` and `password` identify an admin.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured username/password pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    /// Creates a store accepting exactly one username/password pair.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// An issued admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Bearer token identifying the session
    pub token: String,
    /// Admin the session belongs to
    pub username: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// In-memory table of live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issues a fresh session for `username`, dropping any expired ones.
    pub async fn issue(&self, username: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            expires_at: now + self.ttl,
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Number of sessions currently held, expired or not.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns the live session for `token`, dropping it if it has expired.
    pub async fn validate(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if session.expires_at <= Utc::now() {
            self.sessions.write().await.remove(token);
            return None;
        }
        Some(session)
    }

    /// Ends the session for `token`. Returns whether one existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// Login policy combining a credential store with session issuance.
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
    sessions: SessionStore,
    required: bool,
}

impl Authenticator {
    /// Creates an authenticator.
    ///
    /// When `required` is false, admin routes stay open and sessions are only
    /// informational.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, ttl: Duration, required: bool) -> Self {
        Self {
            credentials,
            sessions: SessionStore::new(ttl),
            required,
        }
    }

    /// Builds the authenticator described by the `[auth]` config section.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let credentials = StaticCredentials::new(
            config.admin_username.clone(),
            config.admin_password.clone(),
        );
        Self::new(
            Arc::new(credentials),
            Duration::minutes(config.session_ttl_minutes),
            config.require_admin_session,
        )
    }

    /// Whether admin routes demand a session.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Checks credentials and issues a session.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentials` if the pair is not accepted.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if !self.credentials.verify(username, password) {
            tracing::warn!(username, "rejected admin login");
            return Err(Error::InvalidCredentials);
        }
        let session = self.sessions.issue(username).await;
        tracing::info!(username, "admin logged in");
        Ok(session)
    }

    /// Ends a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        if self.sessions.revoke(token).await {
            tracing::info!("admin logged out");
        }
    }

    /// Returns the session behind `token`.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` if the token is unknown or expired.
    pub async fn session(&self, token: &str) -> Result<Session> {
        self.sessions
            .validate(token)
            .await
            .ok_or(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn authenticator(ttl: Duration) -> Authenticator {
        Authenticator::new(
            Arc::new(StaticCredentials::new(
                "admin".to_string(),
                "secret".to_string(),
            )),
            ttl,
            true,
        )
    }

    #[test]
    fn test_static_credentials() {
        let store = StaticCredentials::new("admin".to_string(), "secret".to_string());
        assert!(store.verify("admin", "secret"));
        assert!(!store.verify("admin", "Secret"));
        assert!(!store.verify("Admin", "secret"));
        assert!(!store.verify("", ""));
    }

    #[tokio::test]
    async fn test_login_issues_usable_session() {
        let auth = authenticator(Duration::minutes(5));

        let session = auth.login("admin", "secret").await.unwrap();
        assert_eq!(session.username, "admin");
        assert!(session.expires_at > Utc::now());

        let found = auth.session(&session.token).await.unwrap();
        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let auth = authenticator(Duration::minutes(5));
        let result = auth.login("admin", "nope").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let auth = authenticator(Duration::minutes(5));
        let session = auth.login("admin", "secret").await.unwrap();

        auth.logout(&session.token).await;
        assert!(matches!(
            auth.session(&session.token).await,
            Err(Error::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let auth = authenticator(Duration::zero());
        let session = auth.login("admin", "secret").await.unwrap();

        assert!(matches!(
            auth.session(&session.token).await,
            Err(Error::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_issue_sweeps_expired_sessions() {
        let store = SessionStore::new(Duration::seconds(-1));
        store.issue("admin").await;
        store.issue("admin").await;
        store.issue("admin").await;

        // Each session is already expired, so only the newest one is kept
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::minutes(1));
        let a = store.issue("admin").await;
        let b = store.issue("admin").await;
        assert_ne!(a.token, b.token);
    }
}
