//! Authorization: ownership resolution and the access policy.
//!
//! Every protected operation computes a fresh [`OwnershipFacts`] value for
//! the calling principal, then asks the pure [`decide`] rule table whether
//! the action is allowed. Facts are never cached across requests, since
//! roles and ownership can change between calls.

mod ownership;
mod policy;

pub use ownership::*;
pub use policy::*;
