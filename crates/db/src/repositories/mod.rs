//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Guarded compound writes open their own
//! transaction and lock the rows they re-validate.

pub mod asset_repo;
pub mod audit_repo;
pub mod borrowing_repo;
pub mod category_repo;
pub mod employee_repo;
pub mod service_request_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditRepo;
pub use borrowing_repo::BorrowingRepo;
pub use category_repo::CategoryRepo;
pub use employee_repo::EmployeeRepo;
pub use service_request_repo::ServiceRequestRepo;
