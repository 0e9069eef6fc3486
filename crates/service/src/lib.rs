//! Service layer for the household-services marketplace.
//! - Separates business rules from data access and from the HTTP surface.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Every role-scoped operation takes an explicit [`gate::AuthContext`].

pub mod errors;
pub mod gate;
pub mod pagination;
pub mod auth;
pub mod catalog;
pub mod lifecycle;
pub mod reviews;
pub mod admin;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use gate::AuthContext;
pub use pagination::Pagination;
