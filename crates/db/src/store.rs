//! The entity store seam consumed by the workflow engine.
//!
//! Plain finders and listers never fail on a miss: single lookups return
//! `Option`, collections return an empty `Vec`. Every multi-row write is a
//! guarded compound operation that re-validates its preconditions inside one
//! unit of work and reports why it declined instead of writing partially.

use ams_core::asset::AssetDeletePolicy;
use ams_core::borrowing::TransitionPlan;
use ams_core::service_request::ServiceStatusPolicy;
use ams_core::status::{AssetStatus, AuditStatus, BorrowingStatus, ServiceRequestStatus};
use ams_core::types::{DbId, Timestamp};
use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::asset::{Asset, AssetFields};
use crate::models::audit::AssetAudit;
use crate::models::borrowing::AssetBorrowing;
use crate::models::category::AssetCategory;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::service_request::{NewServiceRequest, ServiceRequest};

/// Outcome of [`EntityStore::create_borrow_request`].
#[derive(Debug)]
pub enum BorrowRequestOutcome {
    Created(AssetBorrowing),
    AssetNotFound,
    AssetBorrowed,
    DuplicatePending,
}

/// A planned borrowing transition bound to a record and a clock reading.
#[derive(Debug, Clone, Copy)]
pub struct BorrowingTransition {
    pub borrowing_id: DbId,
    pub plan: TransitionPlan,
    pub at: Timestamp,
}

/// Outcome of [`EntityStore::transition_borrowing`].
#[derive(Debug)]
pub enum TransitionOutcome {
    /// Both writes committed. `asset` is set when the plan carried an asset effect.
    Applied {
        borrowing: AssetBorrowing,
        asset: Option<Asset>,
    },
    NotFound,
    /// The record is no longer in the plan's `from` state.
    StatusMismatch(BorrowingStatus),
    /// The asset is not in the state the plan expected.
    AssetMismatch(AssetStatus),
}

/// Outcome of a delete guarded by a reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedDelete {
    Deleted,
    NotFound,
    InUse(i64),
}

/// Outcome of [`EntityStore::delete_asset_guarded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetDeleteOutcome {
    Deleted,
    NotFound,
    Borrowed,
    HasHistory(i64),
}

/// Outcome of [`EntityStore::update_service_request_status`].
#[derive(Debug)]
pub enum ServiceStatusOutcome {
    Updated(ServiceRequest),
    NotFound,
    Refused {
        current: ServiceRequestStatus,
    },
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap reachability probe.
    async fn ping(&self) -> StoreResult<()>;

    // --- employees ---

    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee>;
    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>>;
    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<Employee>>;
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;
    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>>;
    /// Delete unless any borrowing record references the employee.
    async fn delete_employee_if_unreferenced(&self, id: DbId) -> StoreResult<GuardedDelete>;

    // --- categories ---

    async fn insert_category(&self, name: &str) -> StoreResult<AssetCategory>;
    /// Return the category named `name`, creating it if missing.
    async fn find_or_create_category(&self, name: &str) -> StoreResult<AssetCategory>;
    async fn find_category(&self, id: DbId) -> StoreResult<Option<AssetCategory>>;
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<AssetCategory>>;
    async fn list_categories(&self) -> StoreResult<Vec<AssetCategory>>;
    async fn rename_category(&self, id: DbId, name: &str) -> StoreResult<Option<AssetCategory>>;
    async fn delete_category_if_unused(&self, id: DbId) -> StoreResult<GuardedDelete>;

    // --- assets ---

    async fn insert_asset(&self, fields: &AssetFields) -> StoreResult<Asset>;
    async fn find_asset(&self, id: DbId) -> StoreResult<Option<Asset>>;
    async fn list_assets(&self) -> StoreResult<Vec<Asset>>;
    async fn list_assets_by_category(&self, category_id: DbId) -> StoreResult<Vec<Asset>>;
    async fn list_assets_by_name(&self, name: &str) -> StoreResult<Vec<Asset>>;
    /// Assets with an ACTIVE borrowing by `employee_id`.
    async fn list_assets_held_by(&self, employee_id: DbId) -> StoreResult<Vec<Asset>>;
    /// Replace the mutable columns. Never touches `status_id` or `image_path`.
    async fn update_asset(&self, id: DbId, fields: &AssetFields) -> StoreResult<Option<Asset>>;
    async fn delete_asset_guarded(
        &self,
        id: DbId,
        policy: AssetDeletePolicy,
    ) -> StoreResult<AssetDeleteOutcome>;

    // --- borrowings ---

    /// Insert a PENDING record unless the asset is Borrowed or the pair
    /// already has a PENDING request. The asset is left untouched.
    async fn create_borrow_request(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<BorrowRequestOutcome>;
    /// Apply a borrowing transition and its asset effect atomically.
    async fn transition_borrowing(
        &self,
        transition: &BorrowingTransition,
    ) -> StoreResult<TransitionOutcome>;
    async fn find_borrowing(&self, id: DbId) -> StoreResult<Option<AssetBorrowing>>;
    async fn list_borrowings_by_employee(&self, employee_id: DbId)
        -> StoreResult<Vec<AssetBorrowing>>;
    async fn list_borrowings_by_status(
        &self,
        status: BorrowingStatus,
    ) -> StoreResult<Vec<AssetBorrowing>>;

    // --- audits ---

    async fn insert_audit(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<AssetAudit>;
    async fn find_audit(&self, id: DbId) -> StoreResult<Option<AssetAudit>>;
    async fn list_audits(&self) -> StoreResult<Vec<AssetAudit>>;
    async fn list_audits_by_employee(&self, employee_id: DbId) -> StoreResult<Vec<AssetAudit>>;
    /// Close a PENDING audit. `None` when it is missing or already decided.
    async fn decide_audit(
        &self,
        id: DbId,
        to: AuditStatus,
        at: Timestamp,
    ) -> StoreResult<Option<AssetAudit>>;

    // --- service requests ---

    /// Insert a Pending request iff the employee holds an ACTIVE borrowing of
    /// the asset; `None` otherwise.
    async fn create_service_request_for_holder(
        &self,
        input: &NewServiceRequest,
        at: Timestamp,
    ) -> StoreResult<Option<ServiceRequest>>;
    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>>;
    async fn list_service_requests(&self) -> StoreResult<Vec<ServiceRequest>>;
    async fn list_service_requests_by_employee(
        &self,
        employee_id: DbId,
    ) -> StoreResult<Vec<ServiceRequest>>;
    async fn list_service_requests_by_status(
        &self,
        status: ServiceRequestStatus,
    ) -> StoreResult<Vec<ServiceRequest>>;
    async fn update_service_request_status(
        &self,
        id: DbId,
        to: ServiceRequestStatus,
        policy: ServiceStatusPolicy,
    ) -> StoreResult<ServiceStatusOutcome>;
}
