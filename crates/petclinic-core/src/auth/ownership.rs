//! Ownership chain resolution.
//!
//! Walks `resource → pet → owning user` and compares the chain against the
//! calling principal. The result is a small facts value the policy can
//! evaluate without touching the store again.

use super::ResourceKind;
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::Principal;

/// Per-request ownership facts. Derived, never persisted or cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipFacts {
    /// Principal owns the pet behind the resource
    pub is_pet_owner: bool,
    /// Principal is the appointment's assigned veterinarian
    pub is_assigned_veterinarian: bool,
    /// Principal authored the medical record
    pub is_record_author: bool,
    /// Principal carries the admin role
    pub is_admin: bool,
}

/// Resolves ownership chains against the store.
pub struct OwnershipResolver<'a> {
    db: &'a Database,
}

impl<'a> OwnershipResolver<'a> {
    /// Create a new resolver.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Resolve facts for an existing resource. Fails with `NotFound` when the
    /// resource id (or its pet) does not exist.
    pub fn resolve(
        &self,
        kind: ResourceKind,
        resource_id: i64,
        principal: &Principal,
    ) -> ClinicResult<OwnershipFacts> {
        match kind {
            ResourceKind::Appointment => {
                let appointment = self
                    .db
                    .get_appointment(resource_id)?
                    .ok_or_else(|| ClinicError::NotFound("appointment not found".into()))?;
                let mut facts = self.for_pet(appointment.pet_id, principal)?;
                facts.is_assigned_veterinarian = appointment.veterinarian_id == principal.id;
                Ok(facts)
            }
            ResourceKind::MedicalRecord => {
                let record = self
                    .db
                    .get_medical_record(resource_id)?
                    .ok_or_else(|| ClinicError::NotFound("medical record not found".into()))?;
                let mut facts = self.for_pet(record.pet_id, principal)?;
                facts.is_record_author = record.veterinarian_id == principal.id;
                Ok(facts)
            }
            ResourceKind::Event => {
                let event = self
                    .db
                    .get_event(resource_id)?
                    .ok_or_else(|| ClinicError::NotFound("event not found".into()))?;
                self.for_pet(event.pet_id, principal)
            }
        }
    }

    /// Resolve the pet → owner part of the chain only. Used by create paths
    /// where the resource does not exist yet.
    pub fn for_pet(&self, pet_id: i64, principal: &Principal) -> ClinicResult<OwnershipFacts> {
        let pet = self
            .db
            .get_pet(pet_id)?
            .ok_or_else(|| ClinicError::NotFound("pet not found".into()))?;

        Ok(OwnershipFacts {
            is_pet_owner: pet.user_id == principal.id,
            is_assigned_veterinarian: false,
            is_record_author: false,
            is_admin: principal.is_admin(),
        })
    }
}
