//! Durable storage for the registration store.
//!
//! The persistence bridge: a SQLite-backed key-value slot table holding the
//! full collection snapshot and the active session identity.

mod db;
mod slots;

pub use db::{Database, DatabaseError};
