//! Domain core for the asset management platform.
//!
//! Pure logic with no I/O: identifier types, the error taxonomy, status
//! enumerations, the borrowing/audit/service-request state machines, deletion
//! and status policies, and input validation helpers.

pub mod asset;
pub mod audit;
pub mod borrowing;
pub mod employee;
pub mod error;
pub mod roles;
pub mod service_request;
pub mod status;
pub mod types;
pub mod validation;
