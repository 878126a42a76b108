//! Scheduling: availability conflict detection, the appointment lifecycle,
//! and the orchestrating service.

mod conflict;
mod lifecycle;
mod service;

pub use conflict::*;
pub use lifecycle::*;
pub use service::*;
