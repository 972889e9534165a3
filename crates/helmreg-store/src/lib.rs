//! Helmreg Store
//!
//! The record-management core: domain models, the registration record store,
//! the session/identity gate, and the durable slot storage backing them.
//! Presentation layers (the `helmreg` CLI) call into this crate only.

pub mod error;
pub mod models;
pub mod registry;
pub mod session;
pub mod storage;
mod store;

pub use error::{Result, StoreError};
pub use models::{
    Document, DocumentKind, Registration, RegistrationUpdate, Role, User, VerificationStatus,
};
pub use registry::Registry;
pub use session::Session;
pub use store::Store;
