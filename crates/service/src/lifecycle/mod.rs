//! Service request lifecycle: `requested -> accepted -> closed`, plus
//! cancellation (row removal) while still `requested`.
//!
//! Transitions are conditional writes in the repository, so concurrent
//! callers racing on the same request resolve to a single winner.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::{ProfessionalInfo, RequestFilter, RequestRepository};
pub use service::{LifecycleService, Transition};
