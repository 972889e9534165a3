//! The record store: single source of truth for registration records.
//!
//! All reads and writes to registration data go through [`Registry`]. Every
//! successful mutation snapshots the full collection to the slot store
//! before returning; logical failures are detected before anything is
//! mutated, so failed calls leave both copies untouched.

use std::collections::HashMap;

use tracing::{debug, info};

use helmreg_core::encoding;

use crate::error::{Result, StoreError};
use crate::models::{DocumentKind, Registration, RegistrationUpdate, User, VerificationStatus};
use crate::storage::Database;

/// In-memory collection of registrations mirrored to the slot store.
///
/// Records live in insertion order (helmet-id lookup returns the first
/// match in that order); a side index keys them by owning user id.
pub struct Registry {
    db: Database,
    records: Vec<Registration>,
    by_user: HashMap<String, usize>,
}

impl Registry {
    pub(crate) fn new(db: Database, records: Vec<Registration>) -> Self {
        let by_user = records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id.clone(), idx))
            .collect();
        Self {
            db,
            records,
            by_user,
        }
    }

    /// All records in collection order.
    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    /// Create the 1:1 registration for a newly registered user: five empty
    /// document slots, `PENDING` status, email copied from the user.
    pub async fn create_registration(&mut self, user: &User) -> Result<&Registration> {
        if self.by_user.contains_key(&user.id) {
            return Err(StoreError::AlreadyRegistered(user.id.clone()));
        }

        let idx = self.records.len();
        self.insert(Registration::new(user));
        self.snapshot().await?;

        info!(user_id = %user.id, "Registration created");
        Ok(&self.records[idx])
    }

    /// Exact match on the owning user id.
    pub fn get_by_user_id(&self, user_id: &str) -> Option<&Registration> {
        self.by_user.get(user_id).map(|&idx| &self.records[idx])
    }

    /// Case-insensitive helmet-id lookup; first match in collection order.
    pub fn get_by_helmet_id(&self, helmet_id: &str) -> Option<&Registration> {
        self.records
            .iter()
            .find(|r| r.helmet_id.eq_ignore_ascii_case(helmet_id))
    }

    /// Case-insensitive email lookup, used by the session gate.
    pub fn find_by_email(&self, email: &str) -> Option<&Registration> {
        self.records
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(email))
    }

    /// Merge a partial update into the record owned by `user_id`.
    ///
    /// A non-empty helmet id that case-insensitively collides with another
    /// record is rejected with [`StoreError::HelmetIdTaken`].
    pub async fn update_details(&mut self, user_id: &str, update: RegistrationUpdate) -> Result<()> {
        let idx = *self
            .by_user
            .get(user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;

        if let Some(helmet_id) = update.helmet_id.as_deref() {
            let taken = !helmet_id.is_empty()
                && self
                    .records
                    .iter()
                    .any(|r| r.id != user_id && r.helmet_id.eq_ignore_ascii_case(helmet_id));
            if taken {
                return Err(StoreError::HelmetIdTaken(helmet_id.to_string()));
            }
        }

        let record = &mut self.records[idx];
        if let Some(helmet_id) = update.helmet_id {
            record.helmet_id = helmet_id;
        }
        if let Some(owner_name) = update.owner_name {
            record.owner_name = owner_name;
        }
        if let Some(phone_number) = update.phone_number {
            record.phone_number = phone_number;
        }
        if let Some(bike_registration) = update.bike_registration {
            record.bike_registration = bike_registration;
        }
        if let Some(email) = update.email {
            record.email = email;
        }

        self.snapshot().await?;
        debug!(user_id, "Registration details updated");
        Ok(())
    }

    /// Replace the payload of one document slot and mark it uploaded.
    pub async fn attach_document(
        &mut self,
        user_id: &str,
        kind: DocumentKind,
        image: &[u8],
    ) -> Result<()> {
        let idx = *self
            .by_user
            .get(user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;

        let record = &mut self.records[idx];
        let doc = record
            .documents
            .iter_mut()
            .find(|d| d.kind == kind)
            .ok_or_else(|| StoreError::CorruptRecord {
                user_id: user_id.to_string(),
                kind,
            })?;

        doc.image_data = Some(encoding::encode(image));
        doc.uploaded = true;

        self.snapshot().await?;
        debug!(user_id, kind = %kind, "Document attached");
        Ok(())
    }

    /// Overwrite the verification status of the record matching
    /// `helmet_id` (same case-insensitive lookup as [`get_by_helmet_id`]).
    ///
    /// [`get_by_helmet_id`]: Registry::get_by_helmet_id
    pub async fn set_verification_status(
        &mut self,
        helmet_id: &str,
        status: VerificationStatus,
    ) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.helmet_id.eq_ignore_ascii_case(helmet_id))
            .ok_or_else(|| StoreError::UnknownHelmet(helmet_id.to_string()))?;

        record.verification_status = status;

        self.snapshot().await?;
        info!(helmet_id, status = %status, "Verification status set");
        Ok(())
    }

    /// Insert the demo authority account and a sample pre-filled owner
    /// record. Fails without touching the collection if either email is
    /// already registered.
    pub async fn seed_demo(&mut self) -> Result<()> {
        let officer = User {
            id: "police-001".to_string(),
            email: "officer@police.gov".to_string(),
        };
        let rider = User {
            id: "user-001".to_string(),
            email: "test@example.com".to_string(),
        };

        for user in [&officer, &rider] {
            if self.find_by_email(&user.email).is_some() {
                return Err(StoreError::DuplicateEmail(user.email.clone()));
            }
            if self.by_user.contains_key(&user.id) {
                return Err(StoreError::AlreadyRegistered(user.id.clone()));
            }
        }

        self.insert(Registration::new(&officer));

        let mut sample = Registration::new(&rider);
        sample.helmet_id = "SH-12345".to_string();
        sample.owner_name = "John Doe".to_string();
        sample.phone_number = "123-456-7890".to_string();
        sample.bike_registration = "MH-12-AB-3456".to_string();
        self.insert(sample);

        self.snapshot().await?;
        info!("Demo records seeded");
        Ok(())
    }

    fn insert(&mut self, record: Registration) {
        self.by_user.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    async fn snapshot(&self) -> Result<()> {
        self.db.save_state(&self.records).await
    }
}
