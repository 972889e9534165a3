//! Session/identity gate: resolves who is acting and persists it.
//!
//! Login trusts any registered email (there is no password check in this
//! system); register pairs a fresh user with its registration atomically.
//! Role derivation from the email domain is a presentation concern -- the
//! gate only exposes the raw identity.

use tracing::info;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::User;
use crate::registry::Registry;
use crate::storage::Database;

/// The active session identity, mirrored to the `session` slot.
pub struct Session {
    db: Database,
    current: Option<User>,
}

impl Session {
    pub(crate) fn new(db: Database, current: Option<User>) -> Self {
        Self { db, current }
    }

    /// The active identity, if anyone is logged in.
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Log in as the account matching `email` (case-insensitive).
    ///
    /// On failure the session (in memory and persisted) is unchanged.
    pub async fn login(&mut self, registry: &Registry, email: &str) -> Result<User> {
        let record = registry
            .find_by_email(email)
            .ok_or_else(|| StoreError::UnknownEmail(email.to_string()))?;

        let user = User {
            id: record.id.clone(),
            email: record.email.clone(),
        };
        self.db.save_identity(Some(&user)).await?;

        info!(user_id = %user.id, "Logged in");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Create a new account and its paired registration, then log in as it.
    pub async fn register(&mut self, registry: &mut Registry, email: &str) -> Result<User> {
        if registry.find_by_email(email).is_some() {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            email: email.to_string(),
        };
        registry.create_registration(&user).await?;
        self.db.save_identity(Some(&user)).await?;

        info!(user_id = %user.id, "Account registered");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Clear the session identity and its persisted copy.
    pub async fn logout(&mut self) -> Result<()> {
        self.db.save_identity(None).await?;
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn fresh() -> (Registry, Session) {
        let db = Database::open_in_memory().await.unwrap();
        (Registry::new(db.clone(), Vec::new()), Session::new(db, None))
    }

    #[tokio::test]
    async fn register_creates_user_and_record_and_logs_in() {
        let (mut registry, mut session) = fresh().await;

        let user = session
            .register(&mut registry, "rider@example.com")
            .await
            .unwrap();
        assert!(user.id.starts_with("user-"));
        assert_eq!(user.email, "rider@example.com");

        let record = registry.get_by_user_id(&user.id).unwrap();
        assert_eq!(record.email, "rider@example.com");
        assert_eq!(session.current_user(), Some(&user));
    }

    #[tokio::test]
    async fn register_duplicate_email_leaves_collection_unchanged() {
        let (mut registry, mut session) = fresh().await;
        session
            .register(&mut registry, "rider@example.com")
            .await
            .unwrap();
        let before = registry.records().to_vec();

        let err = session
            .register(&mut registry, "RIDER@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(registry.records(), before.as_slice());
    }

    #[tokio::test]
    async fn login_matches_email_case_insensitively() {
        let (mut registry, mut session) = fresh().await;
        let id = session
            .register(&mut registry, "rider@example.com")
            .await
            .unwrap()
            .id;
        session.logout().await.unwrap();
        assert!(session.current_user().is_none());

        let user = session.login(&registry, "Rider@Example.com").await.unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn login_unknown_email_does_not_change_session() {
        let (registry, mut session) = fresh().await;
        let err = session.login(&registry, "ghost@example.com").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownEmail(_)));
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn logout_always_succeeds() {
        let (_, mut session) = fresh().await;
        session.logout().await.unwrap();
        assert!(session.current_user().is_none());
    }
}
