pub mod errors;
pub mod db;
pub mod enums;
pub mod user;
pub mod admin;
pub mod customer;
pub mod professional;
pub mod service;
pub mod service_request;
pub mod review;

pub use enums::{RequestStatus, Role};

#[cfg(test)]
mod tests;
