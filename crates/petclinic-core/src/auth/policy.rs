//! The access policy rule table.
//!
//! One table covers appointments, medical records, and events, so the
//! permission rules cannot drift apart per resource. Adding a role or a rule
//! is a table edit, not a new type.

use super::OwnershipFacts;
use crate::models::{Principal, UserRole};

/// Protected resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Appointment,
    MedicalRecord,
    Event,
}

/// Operations gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    ChangeStatus,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// How a denial is surfaced to the caller.
///
/// Ownership-sensitive resources hide their existence from strangers, so a
/// denial reads as "not found". Purely role- or authorship-gated denials,
/// where the caller may legitimately know the resource exists, read as
/// "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    NotFound,
    Forbidden,
}

/// Pure decision function over the rule table.
pub fn decide(
    kind: ResourceKind,
    action: Action,
    facts: &OwnershipFacts,
    principal: &Principal,
) -> Decision {
    use Action::*;
    use ResourceKind::*;

    let staff = matches!(principal.role, UserRole::Veterinarian | UserRole::Admin);

    let allowed = match (kind, action) {
        (Appointment, Create) => facts.is_pet_owner,
        (Appointment, Read) => {
            facts.is_pet_owner || facts.is_assigned_veterinarian || facts.is_admin
        }
        (Appointment, ChangeStatus) => facts.is_assigned_veterinarian || facts.is_admin,
        (Appointment, Delete) => facts.is_pet_owner || facts.is_admin,
        (Appointment, Update) => false,

        (MedicalRecord, Create) => staff,
        (MedicalRecord, Read) => facts.is_pet_owner || staff,
        (MedicalRecord, Update) => facts.is_record_author || facts.is_admin,
        (MedicalRecord, Delete) => facts.is_admin,
        (MedicalRecord, ChangeStatus) => false,

        (Event, _) => facts.is_pet_owner,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// How to report a denial for the given resource and action.
pub fn denial(kind: ResourceKind, action: Action) -> DenialKind {
    use Action::*;
    use ResourceKind::*;

    match (kind, action) {
        // Strangers must not learn that the resource exists.
        (Appointment, Create | Read | Delete) => DenialKind::NotFound,
        (Event, _) => DenialKind::NotFound,
        // Role- and authorship-gated actions; existence is not sensitive.
        _ => DenialKind::Forbidden,
    }
}
