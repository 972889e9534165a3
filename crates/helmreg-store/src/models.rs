//! Domain models for the registration store.

use serde::{Deserialize, Serialize};

/// Verification state of a registration. Mutated only through the
/// authority's helmet-id lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five required evidence categories. Every registration carries one
/// document slot per kind, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    AadharCard,
    DriversLicense,
    VehicleRegistration,
    Rc,
    Insurance,
}

impl DocumentKind {
    pub const ALL: [Self; 5] = [
        Self::AadharCard,
        Self::DriversLicense,
        Self::VehicleRegistration,
        Self::Rc,
        Self::Insurance,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::AadharCard => "Aadhar Card",
            Self::DriversLicense => "Driver's License",
            Self::VehicleRegistration => "Vehicle Registration",
            Self::Rc => "RC",
            Self::Insurance => "Insurance",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One required evidence item attached to a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable id, re-derivable from the owning record id and the kind.
    pub id: String,
    pub kind: DocumentKind,
    /// Base64 payload; `None` until the owner supplies an image.
    pub image_data: Option<String>,
    /// Invariant: `uploaded == image_data.is_some()` after every mutation.
    pub uploaded: bool,
}

impl Document {
    pub(crate) fn placeholder(owner_id: &str, kind: DocumentKind) -> Self {
        Self {
            id: format!("{owner_id}-{}", kind.label()),
            kind,
            image_data: None,
            uploaded: false,
        }
    }

    /// Decode the inline payload back into raw image bytes, if one was
    /// supplied.
    pub fn payload_bytes(&self) -> helmreg_core::Result<Option<Vec<u8>>> {
        self.image_data
            .as_deref()
            .map(helmreg_core::encoding::decode)
            .transpose()
    }
}

/// A registered account; doubles as the persisted session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// The per-user record of helmet, owner, and vehicle details, evidence
/// documents, and verification state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Equals the owning user's id; one registration per user.
    pub id: String,
    pub helmet_id: String,
    pub owner_name: String,
    pub phone_number: String,
    pub email: String,
    pub bike_registration: String,
    /// Exactly one entry per [`DocumentKind`], fixed at creation; only the
    /// payloads mutate.
    pub documents: Vec<Document>,
    pub verification_status: VerificationStatus,
}

impl Registration {
    pub(crate) fn new(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            helmet_id: String::new(),
            owner_name: String::new(),
            phone_number: String::new(),
            email: user.email.clone(),
            bike_registration: String::new(),
            documents: DocumentKind::ALL
                .iter()
                .map(|&kind| Document::placeholder(&user.id, kind))
                .collect(),
            verification_status: VerificationStatus::Pending,
        }
    }

    /// The document slot for `kind`.
    pub fn document(&self, kind: DocumentKind) -> Option<&Document> {
        self.documents.iter().find(|d| d.kind == kind)
    }
}

/// Partial update of the owner-mutable registration fields. Fields left as
/// `None` are untouched; `id`, `documents`, and `verification_status` are
/// not reachable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationUpdate {
    pub helmet_id: Option<String>,
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub bike_registration: Option<String>,
    pub email: Option<String>,
}

/// Acting role, derived purely from the session email's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Authority,
}

impl Role {
    /// An email whose domain equals `authority_domain` acts as the
    /// authority; everyone else is an owner.
    pub fn for_email(email: &str, authority_domain: &str) -> Self {
        match email.rsplit_once('@') {
            Some((_, domain)) if domain.eq_ignore_ascii_case(authority_domain) => Self::Authority,
            _ => Self::Owner,
        }
    }
}
