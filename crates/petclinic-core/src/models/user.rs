//! User directory models.
//!
//! Identity issuance (sessions, passwords) lives outside this crate; callers
//! hand every operation an already-authenticated [`Principal`].

use serde::{Deserialize, Serialize};

/// Role attached to every user in the directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    /// Regular pet owner
    User,
    /// Full administrative access
    Admin,
    /// Can author medical records and run appointments
    Veterinarian,
    /// Moderates social content; no scheduling privileges
    Moderator,
}

/// A user in the read-mostly directory backing ownership lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Row id assigned by the store
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unique email
    pub email: String,
    /// Directory role
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub role: UserRole,
}

impl Principal {
    /// Create a principal from an id and role pair.
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Roles allowed to see clinic-wide listings.
    pub fn is_clinic_staff(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Veterinarian)
    }
}
