//! Database connection and schema initialization.

use std::path::Path;

pub use helmreg_core::db::DatabaseError;
use helmreg_core::db::{open_pool, open_pool_in_memory};
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Handle to the SQLite slot store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open or create the slot database at the given path.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let db = Self {
            pool: open_pool(path).await?,
        };
        db.init_schema().await?;
        Ok(db)
    }

    /// Open an in-memory slot database (for testing).
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Self {
            pool: open_pool_in_memory().await?,
        };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS slots (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Schema(e.to_string()))?;

        info!("Slot schema ready");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_in_memory_works() {
        let db = Database::open_in_memory().await;
        assert!(db.is_ok());
    }
}
