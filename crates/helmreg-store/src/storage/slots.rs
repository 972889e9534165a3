//! Durable key-value slot queries.
//!
//! Two slots back the whole application: the full collection snapshot under
//! `registrations` and the active session identity under `session`. Writes
//! replace the slot value wholesale.

use helmreg_core::db::unix_timestamp;

use super::db::{Database, DatabaseError};
use crate::error::Result;
use crate::models::{Registration, User};

const REGISTRATIONS_SLOT: &str = "registrations";
const SESSION_SLOT: &str = "session";

impl Database {
    /// Load the persisted collection and session identity. Called once at
    /// startup; absent slots yield the empty/default state.
    pub async fn load_initial_state(&self) -> Result<(Vec<Registration>, Option<User>)> {
        let registrations = match self.read_slot(REGISTRATIONS_SLOT).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        let identity = match self.read_slot(SESSION_SLOT).await? {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };

        Ok((registrations, identity))
    }

    /// Snapshot the full collection.
    pub async fn save_state(&self, registrations: &[Registration]) -> Result<()> {
        let json = serde_json::to_string(registrations)?;
        self.write_slot(REGISTRATIONS_SLOT, &json).await?;
        Ok(())
    }

    /// Persist the session identity, or clear it when `None`.
    pub async fn save_identity(&self, identity: Option<&User>) -> Result<()> {
        match identity {
            Some(user) => {
                let json = serde_json::to_string(user)?;
                self.write_slot(SESSION_SLOT, &json).await?;
            }
            None => self.clear_slot(SESSION_SLOT).await?,
        }
        Ok(())
    }

    async fn read_slot(&self, key: &str) -> std::result::Result<Option<String>, DatabaseError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM slots WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn write_slot(&self, key: &str, value: &str) -> std::result::Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn clear_slot(&self, key: &str) -> std::result::Result<(), DatabaseError> {
        sqlx::query("DELETE FROM slots WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Registration, User};

    #[tokio::test]
    async fn absent_slots_load_as_empty_state() {
        let db = Database::open_in_memory().await.unwrap();
        let (registrations, identity) = db.load_initial_state().await.unwrap();
        assert!(registrations.is_empty());
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn state_and_identity_roundtrip() {
        let db = Database::open_in_memory().await.unwrap();

        let user = User {
            id: "user-1".to_string(),
            email: "rider@example.com".to_string(),
        };
        let records = vec![Registration::new(&user)];

        db.save_state(&records).await.unwrap();
        db.save_identity(Some(&user)).await.unwrap();

        let (loaded, identity) = db.load_initial_state().await.unwrap();
        assert_eq!(loaded, records);
        assert_eq!(identity, Some(user));
    }

    #[tokio::test]
    async fn clearing_identity_removes_the_slot() {
        let db = Database::open_in_memory().await.unwrap();
        let user = User {
            id: "user-2".to_string(),
            email: "other@example.com".to_string(),
        };

        db.save_identity(Some(&user)).await.unwrap();
        db.save_identity(None).await.unwrap();

        let (_, identity) = db.load_initial_state().await.unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn save_state_replaces_the_previous_snapshot() {
        let db = Database::open_in_memory().await.unwrap();
        let user = User {
            id: "user-3".to_string(),
            email: "third@example.com".to_string(),
        };

        db.save_state(&[Registration::new(&user)]).await.unwrap();
        db.save_state(&[]).await.unwrap();

        let (loaded, _) = db.load_initial_state().await.unwrap();
        assert!(loaded.is_empty());
    }
}
