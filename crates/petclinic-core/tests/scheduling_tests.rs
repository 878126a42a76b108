//! Scheduling integration tests: booking, conflict rejection, the
//! appointment lifecycle, and pagination.

use chrono::{TimeZone, Utc};
use petclinic_core::{
    AppointmentStatus, ClinicError, Database, NewAppointment, NewPet, Principal, SchedulingService,
    UserRole,
};

struct Clinic {
    svc: SchedulingService,
    owner: Principal,
    vet: Principal,
    pet_id: i64,
}

fn make_clinic() -> Clinic {
    let db = Database::open_in_memory().unwrap();
    let owner = db
        .insert_user("Ana Silva", "ana@clinic.test", UserRole::User)
        .unwrap();
    let vet = db
        .insert_user("Dr. Vega", "vega@clinic.test", UserRole::Veterinarian)
        .unwrap();
    let pet = db
        .insert_pet(
            owner.id,
            &NewPet {
                name: "Max".into(),
                breed: "Beagle".into(),
                species: Some("dog".into()),
                age: Some(4),
            },
        )
        .unwrap();
    Clinic {
        svc: SchedulingService::new(db),
        owner: Principal::new(owner.id, owner.role),
        vet: Principal::new(vet.id, vet.role),
        pet_id: pet.id,
    }
}

fn slot(pet_id: i64, vet_id: i64, hour: u32, minute: u32, duration: i64) -> NewAppointment {
    NewAppointment {
        pet_id,
        veterinarian_id: vet_id,
        start: Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap(),
        duration_minutes: duration,
        reason: "annual checkup".into(),
        notes: None,
    }
}

#[test]
fn test_book_and_read_back() -> anyhow::Result<()> {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)?;

    assert_eq!(booked.status, AppointmentStatus::Scheduled);
    assert_eq!(booked.veterinarian_id, c.vet.id);

    let fetched = c.svc.get_appointment(booked.id, &c.owner)?;
    assert_eq!(fetched, booked);
    Ok(())
}

#[test]
fn test_overlapping_slot_rejected() {
    let mut c = make_clinic();
    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 60), &c.owner)
        .unwrap();

    // Starts halfway through the existing hour
    let result = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 30, 30), &c.owner);
    assert!(matches!(result, Err(ClinicError::SchedulingConflict(_))));
}

#[test]
fn test_touching_slots_both_accepted() {
    let mut c = make_clinic();
    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();

    // [10:00, 10:30) then [10:30, 11:00): shared endpoint, no overlap
    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 30, 30), &c.owner)
        .unwrap();
}

#[test]
fn test_cancelled_appointment_frees_the_slot() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();

    c.svc
        .change_appointment_status(booked.id, AppointmentStatus::Cancelled, &c.vet)
        .unwrap();

    // Same slot books again now that the holder is inactive
    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
}

#[test]
fn test_full_lifecycle() -> anyhow::Result<()> {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)?;

    for status in [
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ] {
        let updated = c.svc.change_appointment_status(booked.id, status, &c.vet)?;
        assert_eq!(updated.status, status);
    }
    Ok(())
}

#[test]
fn test_no_skipping_stages() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();

    let result = c
        .svc
        .change_appointment_status(booked.id, AppointmentStatus::InProgress, &c.vet);
    assert!(matches!(
        result,
        Err(ClinicError::InvalidTransition {
            from: AppointmentStatus::Scheduled,
            to: AppointmentStatus::InProgress,
        })
    ));
}

#[test]
fn test_terminal_states_are_final() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
    c.svc
        .change_appointment_status(booked.id, AppointmentStatus::Cancelled, &c.vet)
        .unwrap();

    let result = c
        .svc
        .change_appointment_status(booked.id, AppointmentStatus::Confirmed, &c.vet);
    assert!(matches!(result, Err(ClinicError::InvalidTransition { .. })));
}

#[test]
fn test_cancel_from_any_active_state() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
    c.svc
        .change_appointment_status(booked.id, AppointmentStatus::Confirmed, &c.vet)
        .unwrap();
    c.svc
        .change_appointment_status(booked.id, AppointmentStatus::InProgress, &c.vet)
        .unwrap();

    let cancelled = c
        .svc
        .change_appointment_status(booked.id, AppointmentStatus::Cancelled, &c.vet)
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
}

#[test]
fn test_delete_then_get_is_not_found() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();

    c.svc.delete_appointment(booked.id, &c.owner).unwrap();
    let result = c.svc.get_appointment(booked.id, &c.owner);
    assert!(matches!(result, Err(ClinicError::NotFound(_))));
}

#[test]
fn test_deleted_slot_books_again() {
    let mut c = make_clinic();
    let booked = c
        .svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
    c.svc.delete_appointment(booked.id, &c.owner).unwrap();

    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
}

#[test]
fn test_pagination_window_and_totals() {
    let mut c = make_clinic();
    for i in 0..5 {
        c.svc
            .create_appointment(slot(c.pet_id, c.vet.id, 9 + i, 0, 30), &c.owner)
            .unwrap();
    }

    let page1 = c.svc.list_my_appointments(1, 2, &c.owner).unwrap();
    assert_eq!(page1.items.len(), 2);
    assert_eq!(page1.total, 5);
    assert_eq!(page1.pages, 3);

    let page3 = c.svc.list_my_appointments(3, 2, &c.owner).unwrap();
    assert_eq!(page3.items.len(), 1);

    // Past the end: empty items, same totals
    let page9 = c.svc.list_my_appointments(9, 2, &c.owner).unwrap();
    assert!(page9.items.is_empty());
    assert_eq!(page9.total, 5);
    assert_eq!(page9.pages, 3);
}

#[test]
fn test_vet_listing_sees_only_their_schedule() {
    let mut c = make_clinic();
    let other_vet = c
        .svc
        .db()
        .insert_user("Dr. Ruiz", "ruiz@clinic.test", UserRole::Veterinarian)
        .unwrap();

    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
    c.svc
        .create_appointment(slot(c.pet_id, other_vet.id, 10, 0, 30), &c.owner)
        .unwrap();

    let mine = c
        .svc
        .list_appointments_for_veterinarian(c.vet.id, 1, 10, &c.vet)
        .unwrap();
    assert_eq!(mine.total, 1);
    assert_eq!(mine.items[0].veterinarian_id, c.vet.id);
}

#[test]
fn test_two_vets_can_share_a_time() {
    let mut c = make_clinic();
    let other_vet = c
        .svc
        .db()
        .insert_user("Dr. Ruiz", "ruiz@clinic.test", UserRole::Veterinarian)
        .unwrap();

    c.svc
        .create_appointment(slot(c.pet_id, c.vet.id, 10, 0, 30), &c.owner)
        .unwrap();
    // Same wall-clock slot, different veterinarian: no conflict
    c.svc
        .create_appointment(slot(c.pet_id, other_vet.id, 10, 0, 30), &c.owner)
        .unwrap();
}
