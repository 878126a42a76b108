//! The scheduling service: orchestrates ownership resolution, the policy,
//! conflict detection, and the lifecycle against the store.
//!
//! Every protected operation follows the same shape: load the target, compute
//! ownership facts, ask the policy, then act. Create and status-change paths
//! additionally validate availability or the lifecycle before committing.

use tracing::{info, warn};

use super::lifecycle;
use crate::auth::{decide, denial, Action, Decision, DenialKind, OwnershipFacts, OwnershipResolver, ResourceKind};
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentStatus, Event, EventUpdate, MedicalRecord, MedicalRecordUpdate,
    NewAppointment, NewEvent, NewMedicalRecord, NewPet, Paginated, Pet, Principal, UserRole,
    MIN_APPOINTMENT_MINUTES,
};

/// Orchestrates all scheduling and record operations for one store handle.
///
/// Handlers may each own a `SchedulingService` over the same database file;
/// cross-handle correctness comes from the store, not from this type.
pub struct SchedulingService {
    db: Database,
}

impl SchedulingService {
    /// Create a service over an opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Access the underlying store (setup, assertions in tests).
    pub fn db(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Book an appointment for one of the principal's pets. The conflict
    /// check and the insert run as one atomic unit; on overlap nothing is
    /// written and the caller gets `SchedulingConflict`.
    pub fn create_appointment(
        &mut self,
        new: NewAppointment,
        principal: &Principal,
    ) -> ClinicResult<Appointment> {
        if new.duration_minutes < MIN_APPOINTMENT_MINUTES {
            return Err(ClinicError::Validation(format!(
                "appointment duration must be at least {} minutes",
                MIN_APPOINTMENT_MINUTES
            )));
        }
        if new.reason.trim().is_empty() {
            return Err(ClinicError::Validation("reason is required".into()));
        }

        let facts = OwnershipResolver::new(&self.db).for_pet(new.pet_id, principal)?;
        if decide(ResourceKind::Appointment, Action::Create, &facts, principal) == Decision::Deny {
            // The pet belongs to someone else; do not reveal that it exists.
            return Err(ClinicError::NotFound("pet not found".into()));
        }

        match self.db.get_user_role(new.veterinarian_id)? {
            Some(UserRole::Veterinarian) => {}
            _ => return Err(ClinicError::NotFound("veterinarian not found".into())),
        }

        match self.db.book_appointment(&new) {
            Ok(appointment) => {
                info!(
                    appointment_id = appointment.id,
                    veterinarian_id = appointment.veterinarian_id,
                    "appointment booked"
                );
                Ok(appointment)
            }
            Err(e) => {
                let err = ClinicError::from(e);
                if matches!(err, ClinicError::SchedulingConflict(_)) {
                    warn!(
                        veterinarian_id = new.veterinarian_id,
                        "booking rejected: slot conflict"
                    );
                }
                Err(err)
            }
        }
    }

    /// Fetch one appointment, visible to the pet owner, the assigned
    /// veterinarian, and admins.
    pub fn get_appointment(&self, id: i64, principal: &Principal) -> ClinicResult<Appointment> {
        self.authorize(ResourceKind::Appointment, Action::Read, id, principal)?;
        self.db
            .get_appointment(id)?
            .ok_or_else(|| ClinicError::NotFound("appointment not found".into()))
    }

    /// Clinic-wide appointment listing; staff only.
    pub fn list_appointments(
        &self,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<Appointment>> {
        self.require_staff(principal, "list appointments")?;
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self.db.list_appointments(limit_n, offset)?;
        let total = self.db.count_appointments()?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Appointments for the principal's own pets.
    pub fn list_my_appointments(
        &self,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<Appointment>> {
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self
            .db
            .list_appointments_for_owner(principal.id, limit_n, offset)?;
        let total = self.db.count_appointments_for_owner(principal.id)?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Appointments assigned to one veterinarian; staff only.
    pub fn list_appointments_for_veterinarian(
        &self,
        veterinarian_id: i64,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<Appointment>> {
        self.require_staff(principal, "list veterinarian appointments")?;
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self
            .db
            .list_appointments_for_veterinarian(veterinarian_id, limit_n, offset)?;
        let total = self
            .db
            .count_appointments_for_veterinarian(veterinarian_id)?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Drive the appointment lifecycle. Only the assigned veterinarian or an
    /// admin may do this, and only along a defined transition.
    pub fn change_appointment_status(
        &self,
        id: i64,
        new_status: AppointmentStatus,
        principal: &Principal,
    ) -> ClinicResult<Appointment> {
        let appointment = self
            .db
            .get_appointment(id)?
            .ok_or_else(|| ClinicError::NotFound("appointment not found".into()))?;

        let mut facts = OwnershipResolver::new(&self.db).for_pet(appointment.pet_id, principal)?;
        facts.is_assigned_veterinarian = appointment.veterinarian_id == principal.id;
        if decide(ResourceKind::Appointment, Action::ChangeStatus, &facts, principal)
            == Decision::Deny
        {
            return Err(self.deny_error(ResourceKind::Appointment, Action::ChangeStatus));
        }

        // Compare-and-set against a validated status; a concurrent update in
        // between shows up as zero affected rows. When that happens, re-check
        // the transition against the fresh status and try again: the request
        // only fails once the transition is genuinely undefined from wherever
        // the row actually is. Statuses move monotonically toward a terminal
        // state, so this converges.
        let mut current = appointment.status;
        loop {
            lifecycle::validate_transition(current, new_status)?;
            if self.db.set_appointment_status(id, current, new_status)? {
                break;
            }
            current = self
                .db
                .get_appointment(id)?
                .ok_or_else(|| ClinicError::NotFound("appointment not found".into()))?
                .status;
        }

        info!(appointment_id = id, status = ?new_status, "appointment status changed");
        self.db
            .get_appointment(id)?
            .ok_or_else(|| ClinicError::NotFound("appointment not found".into()))
    }

    /// Remove an appointment entirely. Distinct from cancelling: the row is
    /// deleted and does not route through the lifecycle.
    pub fn delete_appointment(&self, id: i64, principal: &Principal) -> ClinicResult<()> {
        self.authorize(ResourceKind::Appointment, Action::Delete, id, principal)?;
        if !self.db.delete_appointment(id)? {
            return Err(ClinicError::NotFound("appointment not found".into()));
        }
        info!(appointment_id = id, "appointment deleted");
        Ok(())
    }

    // =========================================================================
    // Medical Records
    // =========================================================================

    /// Create a medical record. The author is always the calling principal.
    pub fn create_medical_record(
        &self,
        new: NewMedicalRecord,
        principal: &Principal,
    ) -> ClinicResult<MedicalRecord> {
        // Role gate first; no ownership resolution needed to reject.
        if decide(
            ResourceKind::MedicalRecord,
            Action::Create,
            &OwnershipFacts::default(),
            principal,
        ) == Decision::Deny
        {
            return Err(self.deny_error(ResourceKind::MedicalRecord, Action::Create));
        }
        if new.diagnosis.trim().is_empty() {
            return Err(ClinicError::Validation("diagnosis is required".into()));
        }
        if new.treatment.trim().is_empty() {
            return Err(ClinicError::Validation("treatment is required".into()));
        }
        if self.db.get_pet(new.pet_id)?.is_none() {
            return Err(ClinicError::NotFound("pet not found".into()));
        }

        let record = self.db.insert_medical_record(principal.id, &new)?;
        info!(record_id = record.id, pet_id = record.pet_id, "medical record created");
        Ok(record)
    }

    /// Fetch one record, visible to the pet owner and clinic staff.
    pub fn get_medical_record(&self, id: i64, principal: &Principal) -> ClinicResult<MedicalRecord> {
        self.authorize(ResourceKind::MedicalRecord, Action::Read, id, principal)?;
        self.db
            .get_medical_record(id)?
            .ok_or_else(|| ClinicError::NotFound("medical record not found".into()))
    }

    /// Clinic-wide record listing; staff only.
    pub fn list_medical_records(
        &self,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<MedicalRecord>> {
        self.require_staff(principal, "list medical records")?;
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self.db.list_medical_records(limit_n, offset)?;
        let total = self.db.count_medical_records()?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Records of one pet, for its owner or clinic staff.
    pub fn list_medical_records_for_pet(
        &self,
        pet_id: i64,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<MedicalRecord>> {
        let facts = OwnershipResolver::new(&self.db).for_pet(pet_id, principal)?;
        if decide(ResourceKind::MedicalRecord, Action::Read, &facts, principal) == Decision::Deny {
            return Err(self.deny_error(ResourceKind::MedicalRecord, Action::Read));
        }
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self
            .db
            .list_medical_records_for_pet(pet_id, limit_n, offset)?;
        let total = self.db.count_medical_records_for_pet(pet_id)?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Records authored by one veterinarian; staff only.
    pub fn list_medical_records_for_veterinarian(
        &self,
        veterinarian_id: i64,
        page: u32,
        limit: u32,
        principal: &Principal,
    ) -> ClinicResult<Paginated<MedicalRecord>> {
        self.require_staff(principal, "list veterinarian records")?;
        let (limit_n, offset) = page_window(page, limit)?;
        let items = self
            .db
            .list_medical_records_for_veterinarian(veterinarian_id, limit_n, offset)?;
        let total = self
            .db
            .count_medical_records_for_veterinarian(veterinarian_id)?;
        Ok(Paginated::new(items, page, limit, total))
    }

    /// Update a record's content. Author or admin only; authorship itself is
    /// immutable.
    pub fn update_medical_record(
        &self,
        id: i64,
        update: MedicalRecordUpdate,
        principal: &Principal,
    ) -> ClinicResult<MedicalRecord> {
        self.authorize(ResourceKind::MedicalRecord, Action::Update, id, principal)?;

        if matches!(&update.diagnosis, Some(d) if d.trim().is_empty()) {
            return Err(ClinicError::Validation("diagnosis cannot be empty".into()));
        }
        if matches!(&update.treatment, Some(t) if t.trim().is_empty()) {
            return Err(ClinicError::Validation("treatment cannot be empty".into()));
        }

        let mut record = self
            .db
            .get_medical_record(id)?
            .ok_or_else(|| ClinicError::NotFound("medical record not found".into()))?;
        record.apply(update);
        self.db.update_medical_record(&record)?;

        self.db
            .get_medical_record(id)?
            .ok_or_else(|| ClinicError::NotFound("medical record not found".into()))
    }

    /// Delete a record; admins only.
    pub fn delete_medical_record(&self, id: i64, principal: &Principal) -> ClinicResult<()> {
        // Admin gate needs no ownership resolution.
        let role_facts = OwnershipFacts {
            is_admin: principal.is_admin(),
            ..Default::default()
        };
        if decide(ResourceKind::MedicalRecord, Action::Delete, &role_facts, principal)
            == Decision::Deny
        {
            return Err(self.deny_error(ResourceKind::MedicalRecord, Action::Delete));
        }
        if !self.db.delete_medical_record(id)? {
            return Err(ClinicError::NotFound("medical record not found".into()));
        }
        info!(record_id = id, "medical record deleted");
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Log an event for one of the principal's pets.
    pub fn create_event(
        &self,
        pet_id: i64,
        new: NewEvent,
        principal: &Principal,
    ) -> ClinicResult<Event> {
        let facts = OwnershipResolver::new(&self.db).for_pet(pet_id, principal)?;
        if decide(ResourceKind::Event, Action::Create, &facts, principal) == Decision::Deny {
            return Err(self.deny_error(ResourceKind::Event, Action::Create));
        }
        Ok(self.db.insert_event(pet_id, &new)?)
    }

    /// All events of one of the principal's pets, earliest first.
    pub fn list_events(&self, pet_id: i64, principal: &Principal) -> ClinicResult<Vec<Event>> {
        let facts = OwnershipResolver::new(&self.db).for_pet(pet_id, principal)?;
        if decide(ResourceKind::Event, Action::Read, &facts, principal) == Decision::Deny {
            return Err(self.deny_error(ResourceKind::Event, Action::Read));
        }
        Ok(self.db.list_events_for_pet(pet_id)?)
    }

    /// Fetch one event.
    pub fn get_event(&self, id: i64, principal: &Principal) -> ClinicResult<Event> {
        self.authorize(ResourceKind::Event, Action::Read, id, principal)?;
        self.db
            .get_event(id)?
            .ok_or_else(|| ClinicError::NotFound("event not found".into()))
    }

    /// Update one event.
    pub fn update_event(
        &self,
        id: i64,
        update: EventUpdate,
        principal: &Principal,
    ) -> ClinicResult<Event> {
        self.authorize(ResourceKind::Event, Action::Update, id, principal)?;
        let mut event = self
            .db
            .get_event(id)?
            .ok_or_else(|| ClinicError::NotFound("event not found".into()))?;
        event.apply(update);
        self.db.update_event(&event)?;
        self.db
            .get_event(id)?
            .ok_or_else(|| ClinicError::NotFound("event not found".into()))
    }

    /// Delete one event.
    pub fn delete_event(&self, id: i64, principal: &Principal) -> ClinicResult<()> {
        self.authorize(ResourceKind::Event, Action::Delete, id, principal)?;
        if !self.db.delete_event(id)? {
            return Err(ClinicError::NotFound("event not found".into()));
        }
        Ok(())
    }

    // =========================================================================
    // Pets
    // =========================================================================

    /// Register a pet owned by the calling principal.
    pub fn create_pet(&self, new: NewPet, principal: &Principal) -> ClinicResult<Pet> {
        if new.name.trim().is_empty() {
            return Err(ClinicError::Validation("pet name is required".into()));
        }
        if new.breed.trim().is_empty() {
            return Err(ClinicError::Validation("pet breed is required".into()));
        }
        Ok(self.db.insert_pet(principal.id, &new)?)
    }

    /// Fetch one of the principal's own pets.
    pub fn get_pet(&self, id: i64, principal: &Principal) -> ClinicResult<Pet> {
        let pet = self
            .db
            .get_pet(id)?
            .ok_or_else(|| ClinicError::NotFound("pet not found".into()))?;
        if pet.user_id != principal.id {
            return Err(ClinicError::NotFound("pet not found".into()));
        }
        Ok(pet)
    }

    /// All pets owned by the calling principal.
    pub fn list_pets(&self, principal: &Principal) -> ClinicResult<Vec<Pet>> {
        Ok(self.db.list_pets_for_owner(principal.id)?)
    }

    // =========================================================================
    // Shared gate
    // =========================================================================

    /// Resolve facts for an existing resource and apply the rule table. On
    /// deny, the error kind follows the denial policy for that resource and
    /// action.
    fn authorize(
        &self,
        kind: ResourceKind,
        action: Action,
        resource_id: i64,
        principal: &Principal,
    ) -> ClinicResult<OwnershipFacts> {
        let facts = OwnershipResolver::new(&self.db).resolve(kind, resource_id, principal)?;
        match decide(kind, action, &facts, principal) {
            Decision::Allow => Ok(facts),
            Decision::Deny => Err(self.deny_error(kind, action)),
        }
    }

    fn deny_error(&self, kind: ResourceKind, action: Action) -> ClinicError {
        let what = match kind {
            ResourceKind::Appointment => "appointment",
            ResourceKind::MedicalRecord => "medical record",
            ResourceKind::Event => "event",
        };
        match denial(kind, action) {
            DenialKind::NotFound => ClinicError::NotFound(format!("{} not found", what)),
            DenialKind::Forbidden => {
                ClinicError::Forbidden(format!("not allowed to access this {}", what))
            }
        }
    }

    fn require_staff(&self, principal: &Principal, what: &str) -> ClinicResult<()> {
        if principal.is_clinic_staff() {
            Ok(())
        } else {
            Err(ClinicError::Forbidden(format!(
                "only clinic staff may {}",
                what
            )))
        }
    }
}

fn page_window(page: u32, limit: u32) -> ClinicResult<(i64, i64)> {
    if page < 1 {
        return Err(ClinicError::Validation("page must be at least 1".into()));
    }
    if limit < 1 {
        return Err(ClinicError::Validation("limit must be at least 1".into()));
    }
    let limit_n = i64::from(limit);
    Ok((limit_n, limit_n * (i64::from(page) - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn setup() -> (SchedulingService, Principal, Principal, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner = db.insert_user("Ana", "ana@x.test", UserRole::User).unwrap();
        let vet = db
            .insert_user("Dr. Vega", "vega@x.test", UserRole::Veterinarian)
            .unwrap();
        let pet = db
            .insert_pet(
                owner.id,
                &NewPet {
                    name: "Max".into(),
                    breed: "Beagle".into(),
                    species: None,
                    age: None,
                },
            )
            .unwrap();
        (
            SchedulingService::new(db),
            Principal::new(owner.id, owner.role),
            Principal::new(vet.id, vet.role),
            pet.id,
        )
    }

    fn slot(pet_id: i64, vet_id: i64, hour: u32) -> NewAppointment {
        NewAppointment {
            pet_id,
            veterinarian_id: vet_id,
            start: Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap(),
            duration_minutes: 30,
            reason: "checkup".into(),
            notes: None,
        }
    }

    #[test]
    fn test_duration_floor_rejected() {
        let (mut svc, owner, vet, pet_id) = setup();
        let mut new = slot(pet_id, vet.id, 10);
        new.duration_minutes = 10;
        let result = svc.create_appointment(new, &owner);
        assert!(matches!(result, Err(ClinicError::Validation(_))));
    }

    #[test]
    fn test_blank_reason_rejected() {
        let (mut svc, owner, vet, pet_id) = setup();
        let mut new = slot(pet_id, vet.id, 10);
        new.reason = "   ".into();
        let result = svc.create_appointment(new, &owner);
        assert!(matches!(result, Err(ClinicError::Validation(_))));
    }

    #[test]
    fn test_target_must_be_a_veterinarian() {
        let (mut svc, owner, _vet, pet_id) = setup();
        // Booking against the owner's own (non-vet) id
        let new = slot(pet_id, owner.id, 10);
        let result = svc.create_appointment(new, &owner);
        assert!(matches!(result, Err(ClinicError::NotFound(_))));
    }

    #[test]
    fn test_bad_page_window() {
        let (svc, _owner, vet, _pet_id) = setup();
        assert!(matches!(
            svc.list_appointments(0, 10, &vet),
            Err(ClinicError::Validation(_))
        ));
        assert!(matches!(
            svc.list_appointments(1, 0, &vet),
            Err(ClinicError::Validation(_))
        ));
    }
}
