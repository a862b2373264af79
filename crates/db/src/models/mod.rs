//! Row models and input DTOs, one module per table.

pub mod asset;
pub mod audit;
pub mod borrowing;
pub mod category;
pub mod employee;
pub mod service_request;
