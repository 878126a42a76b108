//! Crate-level error taxonomy.

use thiserror::Error;

use crate::db::DbError;
use crate::models::AppointmentStatus;

/// Typed failures surfaced by every operation.
///
/// `SchedulingConflict` and transient `Internal` errors are retryable by the
/// caller (at a different slot, for conflicts); the rest are not. No retries
/// happen inside the core.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Scheduling conflict: {0}")]
    SchedulingConflict(String),

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Storage error: {0}")]
    Internal(DbError),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl From<DbError> for ClinicError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ClinicError::NotFound(msg),
            DbError::Conflict(msg) => ClinicError::SchedulingConflict(msg),
            other => ClinicError::Internal(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conflict_maps_to_scheduling_conflict() {
        let err: ClinicError = DbError::Conflict("slot taken".into()).into();
        assert!(matches!(err, ClinicError::SchedulingConflict(_)));
    }

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: ClinicError = DbError::NotFound("row".into()).into();
        assert!(matches!(err, ClinicError::NotFound(_)));
    }
}
