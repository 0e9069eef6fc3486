pub mod errors;
pub mod flash;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;

pub use startup::run;
