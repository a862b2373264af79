//! PostgreSQL-backed [`EntityStore`].

use ams_core::asset::AssetDeletePolicy;
use ams_core::service_request::ServiceStatusPolicy;
use ams_core::status::{AuditStatus, BorrowingStatus, ServiceRequestStatus};
use ams_core::types::{DbId, Timestamp};
use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::asset::{Asset, AssetFields};
use crate::models::audit::AssetAudit;
use crate::models::borrowing::AssetBorrowing;
use crate::models::category::AssetCategory;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::service_request::{NewServiceRequest, ServiceRequest};
use crate::repositories::{
    AssetRepo, AuditRepo, BorrowingRepo, CategoryRepo, EmployeeRepo, ServiceRequestRepo,
};
use crate::store::{
    AssetDeleteOutcome, BorrowRequestOutcome, BorrowingTransition, EntityStore, GuardedDelete,
    ServiceStatusOutcome, TransitionOutcome,
};
use crate::DbPool;

/// Thin adapter from the store trait onto the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee> {
        Ok(EmployeeRepo::create(&self.pool, input).await?)
    }

    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(EmployeeRepo::list(&self.pool).await?)
    }

    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::update(&self.pool, id, changes).await?)
    }

    async fn delete_employee_if_unreferenced(&self, id: DbId) -> StoreResult<GuardedDelete> {
        EmployeeRepo::delete_if_unreferenced(&self.pool, id).await
    }

    async fn insert_category(&self, name: &str) -> StoreResult<AssetCategory> {
        Ok(CategoryRepo::create(&self.pool, name).await?)
    }

    async fn find_or_create_category(&self, name: &str) -> StoreResult<AssetCategory> {
        Ok(CategoryRepo::find_or_create(&self.pool, name).await?)
    }

    async fn find_category(&self, id: DbId) -> StoreResult<Option<AssetCategory>> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<AssetCategory>> {
        Ok(CategoryRepo::find_by_name(&self.pool, name).await?)
    }

    async fn list_categories(&self) -> StoreResult<Vec<AssetCategory>> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn rename_category(&self, id: DbId, name: &str) -> StoreResult<Option<AssetCategory>> {
        Ok(CategoryRepo::rename(&self.pool, id, name).await?)
    }

    async fn delete_category_if_unused(&self, id: DbId) -> StoreResult<GuardedDelete> {
        CategoryRepo::delete_if_unused(&self.pool, id).await
    }

    async fn insert_asset(&self, fields: &AssetFields) -> StoreResult<Asset> {
        Ok(AssetRepo::create(&self.pool, fields).await?)
    }

    async fn find_asset(&self, id: DbId) -> StoreResult<Option<Asset>> {
        Ok(AssetRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_assets(&self) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list(&self.pool).await?)
    }

    async fn list_assets_by_category(&self, category_id: DbId) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_by_category(&self.pool, category_id).await?)
    }

    async fn list_assets_by_name(&self, name: &str) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_by_name(&self.pool, name).await?)
    }

    async fn list_assets_held_by(&self, employee_id: DbId) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_held_by(&self.pool, employee_id).await?)
    }

    async fn update_asset(&self, id: DbId, fields: &AssetFields) -> StoreResult<Option<Asset>> {
        Ok(AssetRepo::update(&self.pool, id, fields).await?)
    }

    async fn delete_asset_guarded(
        &self,
        id: DbId,
        policy: AssetDeletePolicy,
    ) -> StoreResult<AssetDeleteOutcome> {
        AssetRepo::delete_guarded(&self.pool, id, policy).await
    }

    async fn create_borrow_request(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<BorrowRequestOutcome> {
        BorrowingRepo::create_request(&self.pool, employee_id, asset_id, at).await
    }

    async fn transition_borrowing(
        &self,
        transition: &BorrowingTransition,
    ) -> StoreResult<TransitionOutcome> {
        BorrowingRepo::apply_transition(&self.pool, transition).await
    }

    async fn find_borrowing(&self, id: DbId) -> StoreResult<Option<AssetBorrowing>> {
        Ok(BorrowingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_borrowings_by_employee(
        &self,
        employee_id: DbId,
    ) -> StoreResult<Vec<AssetBorrowing>> {
        Ok(BorrowingRepo::list_by_employee(&self.pool, employee_id).await?)
    }

    async fn list_borrowings_by_status(
        &self,
        status: BorrowingStatus,
    ) -> StoreResult<Vec<AssetBorrowing>> {
        Ok(BorrowingRepo::list_by_status(&self.pool, status).await?)
    }

    async fn insert_audit(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<AssetAudit> {
        Ok(AuditRepo::create(&self.pool, employee_id, asset_id, at).await?)
    }

    async fn find_audit(&self, id: DbId) -> StoreResult<Option<AssetAudit>> {
        Ok(AuditRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_audits(&self) -> StoreResult<Vec<AssetAudit>> {
        Ok(AuditRepo::list(&self.pool).await?)
    }

    async fn list_audits_by_employee(&self, employee_id: DbId) -> StoreResult<Vec<AssetAudit>> {
        Ok(AuditRepo::list_by_employee(&self.pool, employee_id).await?)
    }

    async fn decide_audit(
        &self,
        id: DbId,
        to: AuditStatus,
        at: Timestamp,
    ) -> StoreResult<Option<AssetAudit>> {
        Ok(AuditRepo::decide(&self.pool, id, to, at).await?)
    }

    async fn create_service_request_for_holder(
        &self,
        input: &NewServiceRequest,
        at: Timestamp,
    ) -> StoreResult<Option<ServiceRequest>> {
        ServiceRequestRepo::create_for_holder(&self.pool, input, at).await
    }

    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>> {
        Ok(ServiceRequestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_service_requests(&self) -> StoreResult<Vec<ServiceRequest>> {
        Ok(ServiceRequestRepo::list(&self.pool).await?)
    }

    async fn list_service_requests_by_employee(
        &self,
        employee_id: DbId,
    ) -> StoreResult<Vec<ServiceRequest>> {
        Ok(ServiceRequestRepo::list_by_employee(&self.pool, employee_id).await?)
    }

    async fn list_service_requests_by_status(
        &self,
        status: ServiceRequestStatus,
    ) -> StoreResult<Vec<ServiceRequest>> {
        Ok(ServiceRequestRepo::list_by_status(&self.pool, status).await?)
    }

    async fn update_service_request_status(
        &self,
        id: DbId,
        to: ServiceRequestStatus,
        policy: ServiceStatusPolicy,
    ) -> StoreResult<ServiceStatusOutcome> {
        ServiceRequestRepo::update_status(&self.pool, id, to, policy).await
    }
}
