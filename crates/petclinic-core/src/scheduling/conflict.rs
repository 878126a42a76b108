//! Veterinarian availability conflict detection.
//!
//! Slots are half-open intervals `[start, end)`: two slots conflict iff
//! `a.start < b.end && b.start < a.end`, so touching endpoints never
//! conflict. The same predicate runs in SQL inside the booking transaction
//! (`Database::book_appointment`); this module is the standalone contract
//! used for pre-checks and reschedule probes.

use chrono::{DateTime, Duration, Utc};

use crate::db::Database;
use crate::error::ClinicResult;

/// Half-open interval overlap test.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Checks proposed slots against a veterinarian's active appointments.
pub struct ConflictDetector<'a> {
    db: &'a Database,
}

impl<'a> ConflictDetector<'a> {
    /// Create a new detector.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Whether an active appointment of the veterinarian overlaps the
    /// proposed slot. `exclude_id` lets a reschedule skip the appointment
    /// being moved.
    pub fn has_conflict(
        &self,
        veterinarian_id: i64,
        start: DateTime<Utc>,
        duration_minutes: i64,
        exclude_id: Option<i64>,
    ) -> ClinicResult<bool> {
        let end = start + Duration::minutes(duration_minutes);
        let hit = self.db.find_conflicting_appointment(
            veterinarian_id,
            start.timestamp(),
            end.timestamp(),
            exclude_id,
        )?;
        Ok(hit.is_some())
    }
}
