pub mod asset;
pub mod audit;
pub mod auth;
pub mod borrowing;
pub mod category;
pub mod employee;
pub mod service_request;
