//! Error types for the registration store.

use thiserror::Error;

use crate::models::DocumentKind;

/// Result type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by the record store and session gate. All of these are
/// recoverable; prior state is untouched on every failure path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update or attach against a user id with no registration.
    #[error("no registration for user {0}")]
    UnknownUser(String),

    /// Authority lookup or status change with an unmatched helmet id.
    #[error("no registration matches helmet id \"{0}\"")]
    UnknownHelmet(String),

    /// Login with an email no registration carries.
    #[error("no account registered for {0}")]
    UnknownEmail(String),

    /// Registering an email that already belongs to a record.
    #[error("an account already exists for {0}")]
    DuplicateEmail(String),

    /// Creating a second registration for the same user id.
    #[error("user {0} already has a registration")]
    AlreadyRegistered(String),

    /// Setting a helmet id that already identifies another record.
    #[error("helmet id \"{0}\" is already registered to another user")]
    HelmetIdTaken(String),

    /// A loaded snapshot is missing one of the five fixed document slots.
    #[error("registration {user_id} is missing its {kind} document slot")]
    CorruptRecord { user_id: String, kind: DocumentKind },

    #[error(transparent)]
    Database(#[from] helmreg_core::db::DatabaseError),

    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}
