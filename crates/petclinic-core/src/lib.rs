//! Pet-Clinic Core Library
//!
//! Appointment scheduling and authorization core for a veterinary clinic.
//!
//! # Architecture
//!
//! ```text
//!  Principal (id + role)
//!        │
//!        ▼
//!  SchedulingService ──── per-operation gate ────┐
//!        │                                       │
//!        │                              OwnershipResolver
//!        │                              (pet → owner chain)
//!        │                                       │
//!        │                                 rule table
//!        │                              (decide / denial)
//!        ▼                                       │
//!  ┌─────────────────────────────┐     Allow ────┘
//!  │   conflict check + insert   │
//!  │   (one atomic transaction)  │
//!  └──────────────┬──────────────┘
//!                 ▼
//!              SQLite
//! ```
//!
//! # Core Principle
//!
//! **Every protected operation re-derives ownership from the store.** Facts
//! are never cached across requests, and a double booking can never be
//! observed: the availability check and the insert commit together or not
//! at all.
//!
//! # Modules
//!
//! - [`db`]: SQLite store (users, pets, appointments, records, events)
//! - [`models`]: Domain types (Appointment, MedicalRecord, Principal, etc.)
//! - [`auth`]: Ownership resolution and the access rule table
//! - [`scheduling`]: Conflict detection, the appointment lifecycle, and the
//!   orchestrating [`SchedulingService`]
//! - [`error`]: The crate-level error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod scheduling;

// Re-export commonly used types
pub use db::Database;
pub use error::{ClinicError, ClinicResult};
pub use models::{
    Appointment, AppointmentStatus, Event, EventType, MedicalRecord, NewAppointment, NewEvent,
    NewMedicalRecord, NewPet, Paginated, Pet, Principal, User, UserRole,
};
pub use scheduling::SchedulingService;
