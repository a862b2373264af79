//! Asset lifecycle workflow engine.
//!
//! Every operation is a free async function taking the entity store as
//! `&dyn EntityStore` plus explicit caller-supplied identities. Operations
//! read current state for precise error reporting, then hand the write to a
//! guarded store operation that re-validates under lock, so a lost race
//! surfaces as `Conflict` rather than as corrupted state.

pub mod audit;
pub mod borrowing;
pub mod catalog;
pub mod config;
pub mod employee;
pub mod error;
pub mod service_request;

pub use config::WorkflowConfig;
pub use error::{EngineError, EngineResult};
