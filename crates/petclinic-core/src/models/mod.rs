//! Domain models for the clinic scheduling core.

mod appointment;
mod event;
mod medical_record;
mod page;
mod pet;
mod user;

pub use appointment::*;
pub use event::*;
pub use medical_record::*;
pub use page::*;
pub use pet::*;
pub use user::*;
