//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration of customers and professionals, login, session token
//! issuing/verification and the first-start admin bootstrap.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
