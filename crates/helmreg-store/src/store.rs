//! Application facade wiring the persistence bridge, record store, and
//! session gate together.

use std::path::Path;

use crate::error::Result;
use crate::registry::Registry;
use crate::session::Session;
use crate::storage::Database;

/// The open application state: record store plus session gate over one
/// durable slot database.
pub struct Store {
    pub registry: Registry,
    pub session: Session,
}

impl Store {
    /// Open the slot database at `path` and restore the persisted
    /// collection and session identity.
    pub async fn open(path: &Path) -> Result<Self> {
        Self::from_database(Database::open(path).await?).await
    }

    /// Open a fresh in-memory store (for testing).
    pub async fn open_in_memory() -> Result<Self> {
        Self::from_database(Database::open_in_memory().await?).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let (records, identity) = db.load_initial_state().await?;
        Ok(Self {
            registry: Registry::new(db.clone(), records),
            session: Session::new(db, identity),
        })
    }
}
