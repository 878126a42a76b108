//! Appointment models and the status lifecycle vocabulary.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minimum bookable appointment length in minutes.
pub const MIN_APPOINTMENT_MINUTES: i64 = 15;

/// Appointment status.
///
/// `Completed` and `Cancelled` are terminal; the three remaining statuses are
/// "active" and count toward veterinarian availability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Initial status of every new booking
    Scheduled,
    /// Confirmed by the veterinarian
    Confirmed,
    /// Visit under way
    InProgress,
    /// Visit finished (terminal)
    Completed,
    /// Called off (terminal)
    Cancelled,
}

impl AppointmentStatus {
    /// Whether this status holds the veterinarian's time slot.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled
                | AppointmentStatus::Confirmed
                | AppointmentStatus::InProgress
        )
    }

    /// Whether no further transitions are permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

/// A booked appointment occupying `[start, end)` of a veterinarian's time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Row id assigned by the store
    pub id: i64,
    /// Pet being seen
    pub pet_id: i64,
    /// Assigned veterinarian (a user with role `Veterinarian`)
    pub veterinarian_id: i64,
    /// Slot start, UTC
    pub start: DateTime<Utc>,
    /// Slot length in minutes, at least [`MIN_APPOINTMENT_MINUTES`]
    pub duration_minutes: i64,
    /// Why the visit was booked
    pub reason: String,
    /// Free-form notes
    pub notes: Option<String>,
    /// Current lifecycle status
    pub status: AppointmentStatus,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Appointment {
    /// Exclusive end of the slot: `start + duration`.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

/// Input for booking a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub pet_id: i64,
    pub veterinarian_id: i64,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub reason: String,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Exclusive end of the proposed slot.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_is_start_plus_duration() {
        let appt = NewAppointment {
            pet_id: 1,
            veterinarian_id: 2,
            start: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
            duration_minutes: 30,
            reason: "checkup".into(),
            notes: None,
        };
        assert_eq!(
            appt.end(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_active_and_terminal_partition() {
        use AppointmentStatus::*;
        for status in [Scheduled, Confirmed, InProgress, Completed, Cancelled] {
            assert_ne!(status.is_active(), status.is_terminal());
        }
        assert!(Scheduled.is_active());
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }
}
