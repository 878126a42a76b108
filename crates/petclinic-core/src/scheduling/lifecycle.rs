//! The appointment status state machine.
//!
//! ```text
//! SCHEDULED ──> CONFIRMED ──> IN_PROGRESS ──> COMPLETED (terminal)
//!     │             │              │
//!     └─────────────┴──────────────┴────────> CANCELLED (terminal)
//! ```
//!
//! No transition leaves a terminal state. Who may trigger a transition is the
//! policy's concern, not this module's.

use crate::error::{ClinicError, ClinicResult};
use crate::models::AppointmentStatus;

/// Whether the lifecycle defines a transition from `from` to `to`.
pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    use AppointmentStatus::*;
    matches!(
        (from, to),
        (Scheduled, Confirmed)
            | (Confirmed, InProgress)
            | (InProgress, Completed)
            | (Scheduled, Cancelled)
            | (Confirmed, Cancelled)
            | (InProgress, Cancelled)
    )
}

/// Validate a transition, failing with `InvalidTransition` when the
/// lifecycle does not define it.
pub fn validate_transition(from: AppointmentStatus, to: AppointmentStatus) -> ClinicResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ClinicError::InvalidTransition { from, to })
    }
}
