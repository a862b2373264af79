//! In-process [`EntityStore`] used by engine and API tests and local tooling.
//!
//! One mutex guards every table, so each trait call is trivially atomic and
//! isolated. Unique and foreign-key constraints mirror the SQL schema and
//! report the same constraint names as PostgreSQL would.

use std::collections::BTreeMap;

use ams_core::asset::AssetDeletePolicy;
use ams_core::borrowing::BorrowingStamp;
use ams_core::service_request::ServiceStatusPolicy;
use ams_core::status::{AssetStatus, AuditStatus, BorrowingStatus, ServiceRequestStatus};
use ams_core::types::{DbId, Timestamp};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::models::asset::{Asset, AssetFields};
use crate::models::audit::AssetAudit;
use crate::models::borrowing::AssetBorrowing;
use crate::models::category::AssetCategory;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::models::service_request::{NewServiceRequest, ServiceRequest};
use crate::store::{
    AssetDeleteOutcome, BorrowRequestOutcome, BorrowingTransition, EntityStore, GuardedDelete,
    ServiceStatusOutcome, TransitionOutcome,
};

struct Table<T> {
    last_id: DbId,
    rows: BTreeMap<DbId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: DbId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|r| keep(r)).cloned().collect()
    }
}

#[derive(Default)]
struct Tables {
    employees: Table<Employee>,
    categories: Table<AssetCategory>,
    assets: Table<Asset>,
    borrowings: Table<AssetBorrowing>,
    audits: Table<AssetAudit>,
    service_requests: Table<ServiceRequest>,
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.employees
            .rows
            .values()
            .any(|e| e.email == email && Some(e.id) != except)
    }

    fn category_name_taken(&self, name: &str, except: Option<DbId>) -> bool {
        self.categories
            .rows
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn require_employee_and_asset(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        table: &str,
    ) -> StoreResult<()> {
        if !self.employees.rows.contains_key(&employee_id) {
            return Err(foreign_key(&format!("{table}_employee_id_fkey")));
        }
        if !self.assets.rows.contains_key(&asset_id) {
            return Err(foreign_key(&format!("{table}_asset_id_fkey")));
        }
        Ok(())
    }

    fn borrowings_where(&self, keep: impl Fn(&AssetBorrowing) -> bool) -> i64 {
        self.borrowings.rows.values().filter(|b| keep(b)).count() as i64
    }

    fn has_borrowing(&self, employee_id: DbId, asset_id: DbId, status: BorrowingStatus) -> bool {
        self.borrowings_where(|b| {
            b.employee_id == employee_id && b.asset_id == asset_id && b.status_id == status.id()
        }) > 0
    }

    fn write_asset(&mut self, id: DbId, fields: &AssetFields, now: Timestamp) -> Option<Asset> {
        let asset = self.assets.rows.get_mut(&id)?;
        asset.name = fields.name.clone();
        asset.category_id = fields.category_id;
        asset.model = fields.model.clone();
        asset.manufacturing_date = fields.manufacturing_date;
        asset.expiry_date = fields.expiry_date;
        asset.value = fields.value;
        asset.description = fields.description.clone();
        asset.updated_at = now;
        Some(asset.clone())
    }

    /// Drop an asset along with the rows that cascade from it.
    fn remove_asset(&mut self, id: DbId) {
        self.assets.rows.remove(&id);
        self.audits.rows.retain(|_, a| a.asset_id != id);
        self.service_requests.rows.retain(|_, s| s.asset_id != id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee> {
        let mut t = self.tables.lock().await;
        let p = &input.profile;
        if t.email_taken(&p.email, None) {
            return Err(unique("uq_employees_email"));
        }
        let now = Utc::now();
        let employee = Employee {
            id: t.employees.next_id(),
            name: p.name.clone(),
            gender: p.gender.map(|g| g.as_str().to_string()),
            contact_number: p.contact_number.clone(),
            address: p.address.clone(),
            email: p.email.clone(),
            password_hash: input.password_hash.clone(),
            role_id: input.role.id(),
            created_at: now,
            updated_at: now,
        };
        t.employees.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(self.tables.lock().await.employees.get(id))
    }

    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        let t = self.tables.lock().await;
        Ok(t.employees.rows.values().find(|e| e.email == email).cloned())
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.tables.lock().await.employees.filtered(|_| true))
    }

    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        let mut t = self.tables.lock().await;
        let p = &changes.profile;
        if !t.employees.rows.contains_key(&id) {
            return Ok(None);
        }
        if t.email_taken(&p.email, Some(id)) {
            return Err(unique("uq_employees_email"));
        }
        let Some(e) = t.employees.rows.get_mut(&id) else {
            return Ok(None);
        };
        e.name = p.name.clone();
        e.gender = p.gender.map(|g| g.as_str().to_string());
        e.contact_number = p.contact_number.clone();
        e.address = p.address.clone();
        e.email = p.email.clone();
        if let Some(hash) = &changes.password_hash {
            e.password_hash = hash.clone();
        }
        e.updated_at = Utc::now();
        Ok(Some(e.clone()))
    }

    async fn delete_employee_if_unreferenced(&self, id: DbId) -> StoreResult<GuardedDelete> {
        let mut t = self.tables.lock().await;
        if !t.employees.rows.contains_key(&id) {
            return Ok(GuardedDelete::NotFound);
        }
        let refs = t.borrowings_where(|b| b.employee_id == id);
        if refs > 0 {
            return Ok(GuardedDelete::InUse(refs));
        }
        t.employees.rows.remove(&id);
        t.audits.rows.retain(|_, a| a.employee_id != id);
        t.service_requests.rows.retain(|_, s| s.employee_id != id);
        Ok(GuardedDelete::Deleted)
    }

    async fn insert_category(&self, name: &str) -> StoreResult<AssetCategory> {
        let mut t = self.tables.lock().await;
        if t.category_name_taken(name, None) {
            return Err(unique("uq_asset_categories_name"));
        }
        let now = Utc::now();
        let category = AssetCategory {
            id: t.categories.next_id(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.categories.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_or_create_category(&self, name: &str) -> StoreResult<AssetCategory> {
        if let Some(existing) = self.find_category_by_name(name).await? {
            return Ok(existing);
        }
        match self.insert_category(name).await {
            Err(e) if e.is_unique_violation("uq_asset_categories_name") => self
                .find_category_by_name(name)
                .await?
                .ok_or(e),
            other => other,
        }
    }

    async fn find_category(&self, id: DbId) -> StoreResult<Option<AssetCategory>> {
        Ok(self.tables.lock().await.categories.get(id))
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<AssetCategory>> {
        let t = self.tables.lock().await;
        Ok(t.categories.rows.values().find(|c| c.name == name).cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<AssetCategory>> {
        Ok(self.tables.lock().await.categories.filtered(|_| true))
    }

    async fn rename_category(&self, id: DbId, name: &str) -> StoreResult<Option<AssetCategory>> {
        let mut t = self.tables.lock().await;
        if !t.categories.rows.contains_key(&id) {
            return Ok(None);
        }
        if t.category_name_taken(name, Some(id)) {
            return Err(unique("uq_asset_categories_name"));
        }
        Ok(t.categories.rows.get_mut(&id).map(|c| {
            c.name = name.to_string();
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete_category_if_unused(&self, id: DbId) -> StoreResult<GuardedDelete> {
        let mut t = self.tables.lock().await;
        if !t.categories.rows.contains_key(&id) {
            return Ok(GuardedDelete::NotFound);
        }
        let in_use = t.assets.rows.values().filter(|a| a.category_id == id).count() as i64;
        if in_use > 0 {
            return Ok(GuardedDelete::InUse(in_use));
        }
        t.categories.rows.remove(&id);
        Ok(GuardedDelete::Deleted)
    }

    async fn insert_asset(&self, fields: &AssetFields) -> StoreResult<Asset> {
        let mut t = self.tables.lock().await;
        if !t.categories.rows.contains_key(&fields.category_id) {
            return Err(foreign_key("assets_category_id_fkey"));
        }
        let now = Utc::now();
        let asset = Asset {
            id: t.assets.next_id(),
            name: fields.name.clone(),
            category_id: fields.category_id,
            model: fields.model.clone(),
            manufacturing_date: fields.manufacturing_date,
            expiry_date: fields.expiry_date,
            value: fields.value,
            status_id: AssetStatus::Available.id(),
            description: fields.description.clone(),
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        t.assets.rows.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn find_asset(&self, id: DbId) -> StoreResult<Option<Asset>> {
        Ok(self.tables.lock().await.assets.get(id))
    }

    async fn list_assets(&self) -> StoreResult<Vec<Asset>> {
        Ok(self.tables.lock().await.assets.filtered(|_| true))
    }

    async fn list_assets_by_category(&self, category_id: DbId) -> StoreResult<Vec<Asset>> {
        let t = self.tables.lock().await;
        Ok(t.assets.filtered(|a| a.category_id == category_id))
    }

    async fn list_assets_by_name(&self, name: &str) -> StoreResult<Vec<Asset>> {
        let t = self.tables.lock().await;
        Ok(t.assets.filtered(|a| a.name == name))
    }

    async fn list_assets_held_by(&self, employee_id: DbId) -> StoreResult<Vec<Asset>> {
        let t = self.tables.lock().await;
        Ok(t.assets
            .filtered(|a| t.has_borrowing(employee_id, a.id, BorrowingStatus::Active)))
    }

    async fn update_asset(&self, id: DbId, fields: &AssetFields) -> StoreResult<Option<Asset>> {
        let mut t = self.tables.lock().await;
        if !t.assets.rows.contains_key(&id) {
            return Ok(None);
        }
        if !t.categories.rows.contains_key(&fields.category_id) {
            return Err(foreign_key("assets_category_id_fkey"));
        }
        Ok(t.write_asset(id, fields, Utc::now()))
    }

    async fn delete_asset_guarded(
        &self,
        id: DbId,
        policy: AssetDeletePolicy,
    ) -> StoreResult<AssetDeleteOutcome> {
        let mut t = self.tables.lock().await;
        let Some(asset) = t.assets.get(id) else {
            return Ok(AssetDeleteOutcome::NotFound);
        };
        if asset.status()? == AssetStatus::Borrowed {
            return Ok(AssetDeleteOutcome::Borrowed);
        }
        match policy {
            AssetDeletePolicy::RejectWithHistory => {
                let history = t.borrowings_where(|b| b.asset_id == id);
                if history > 0 {
                    return Ok(AssetDeleteOutcome::HasHistory(history));
                }
            }
            AssetDeletePolicy::RejectWhenBorrowed => {
                t.borrowings.rows.retain(|_, b| b.asset_id != id);
            }
        }
        t.remove_asset(id);
        Ok(AssetDeleteOutcome::Deleted)
    }

    async fn create_borrow_request(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<BorrowRequestOutcome> {
        let mut t = self.tables.lock().await;
        let Some(asset) = t.assets.get(asset_id) else {
            return Ok(BorrowRequestOutcome::AssetNotFound);
        };
        if asset.status()? == AssetStatus::Borrowed {
            return Ok(BorrowRequestOutcome::AssetBorrowed);
        }
        if t.has_borrowing(employee_id, asset_id, BorrowingStatus::Pending) {
            return Ok(BorrowRequestOutcome::DuplicatePending);
        }
        t.require_employee_and_asset(employee_id, asset_id, "asset_borrowings")?;

        let borrowing = AssetBorrowing {
            id: t.borrowings.next_id(),
            employee_id,
            asset_id,
            status_id: BorrowingStatus::Pending.id(),
            borrowed_at: at,
            returned_at: None,
            created_at: at,
            updated_at: at,
        };
        t.borrowings.rows.insert(borrowing.id, borrowing.clone());
        Ok(BorrowRequestOutcome::Created(borrowing))
    }

    async fn transition_borrowing(
        &self,
        transition: &BorrowingTransition,
    ) -> StoreResult<TransitionOutcome> {
        let mut t = self.tables.lock().await;
        let plan = &transition.plan;

        let Some(current) = t.borrowings.get(transition.borrowing_id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        let status = current.status()?;
        if status != plan.from {
            return Ok(TransitionOutcome::StatusMismatch(status));
        }

        // Validate everything before the first write so a refusal leaves no trace.
        if let Some(effect) = plan.asset_effect {
            let asset = t
                .assets
                .get(current.asset_id)
                .ok_or_else(|| foreign_key("asset_borrowings_asset_id_fkey"))?;
            let asset_status = asset.status()?;
            if effect.expect.is_some_and(|expected| expected != asset_status) {
                return Ok(TransitionOutcome::AssetMismatch(asset_status));
            }
            if plan.to == BorrowingStatus::Active
                && t.borrowings_where(|b| {
                    b.asset_id == current.asset_id && b.status_id == BorrowingStatus::Active.id()
                }) > 0
            {
                return Ok(TransitionOutcome::AssetMismatch(AssetStatus::Borrowed));
            }
        }

        let at = transition.at;
        let asset = match plan.asset_effect {
            Some(effect) => t.assets.rows.get_mut(&current.asset_id).map(|a| {
                a.status_id = effect.set.id();
                a.updated_at = at;
                a.clone()
            }),
            None => None,
        };

        let Some(borrowing) = t.borrowings.rows.get_mut(&transition.borrowing_id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        borrowing.status_id = plan.to.id();
        match plan.stamp {
            BorrowingStamp::BorrowedAt => borrowing.borrowed_at = at,
            BorrowingStamp::ReturnedAt => borrowing.returned_at = Some(at),
            BorrowingStamp::None => {}
        }
        borrowing.updated_at = at;

        Ok(TransitionOutcome::Applied {
            borrowing: borrowing.clone(),
            asset,
        })
    }

    async fn find_borrowing(&self, id: DbId) -> StoreResult<Option<AssetBorrowing>> {
        Ok(self.tables.lock().await.borrowings.get(id))
    }

    async fn list_borrowings_by_employee(
        &self,
        employee_id: DbId,
    ) -> StoreResult<Vec<AssetBorrowing>> {
        let t = self.tables.lock().await;
        Ok(t.borrowings.filtered(|b| b.employee_id == employee_id))
    }

    async fn list_borrowings_by_status(
        &self,
        status: BorrowingStatus,
    ) -> StoreResult<Vec<AssetBorrowing>> {
        let t = self.tables.lock().await;
        Ok(t.borrowings.filtered(|b| b.status_id == status.id()))
    }

    async fn insert_audit(
        &self,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<AssetAudit> {
        let mut t = self.tables.lock().await;
        t.require_employee_and_asset(employee_id, asset_id, "asset_audits")?;
        let audit = AssetAudit {
            id: t.audits.next_id(),
            employee_id,
            asset_id,
            status_id: AuditStatus::Pending.id(),
            requested_at: at,
            created_at: at,
            updated_at: at,
        };
        t.audits.rows.insert(audit.id, audit.clone());
        Ok(audit)
    }

    async fn find_audit(&self, id: DbId) -> StoreResult<Option<AssetAudit>> {
        Ok(self.tables.lock().await.audits.get(id))
    }

    async fn list_audits(&self) -> StoreResult<Vec<AssetAudit>> {
        Ok(self.tables.lock().await.audits.filtered(|_| true))
    }

    async fn list_audits_by_employee(&self, employee_id: DbId) -> StoreResult<Vec<AssetAudit>> {
        let t = self.tables.lock().await;
        Ok(t.audits.filtered(|a| a.employee_id == employee_id))
    }

    async fn decide_audit(
        &self,
        id: DbId,
        to: AuditStatus,
        at: Timestamp,
    ) -> StoreResult<Option<AssetAudit>> {
        let mut t = self.tables.lock().await;
        Ok(t.audits
            .rows
            .get_mut(&id)
            .filter(|a| a.status_id == AuditStatus::Pending.id())
            .map(|a| {
                a.status_id = to.id();
                a.updated_at = at;
                a.clone()
            }))
    }

    async fn create_service_request_for_holder(
        &self,
        input: &NewServiceRequest,
        at: Timestamp,
    ) -> StoreResult<Option<ServiceRequest>> {
        let mut t = self.tables.lock().await;
        if !t.has_borrowing(input.employee_id, input.asset_id, BorrowingStatus::Active) {
            return Ok(None);
        }
        let request = ServiceRequest {
            id: t.service_requests.next_id(),
            employee_id: input.employee_id,
            asset_id: input.asset_id,
            issue_type: input.issue_type.as_str().to_string(),
            description: input.description.clone(),
            status_id: ServiceRequestStatus::Pending.id(),
            requested_at: at,
            created_at: at,
            updated_at: at,
        };
        t.service_requests.rows.insert(request.id, request.clone());
        Ok(Some(request))
    }

    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>> {
        Ok(self.tables.lock().await.service_requests.get(id))
    }

    async fn list_service_requests(&self) -> StoreResult<Vec<ServiceRequest>> {
        Ok(self.tables.lock().await.service_requests.filtered(|_| true))
    }

    async fn list_service_requests_by_employee(
        &self,
        employee_id: DbId,
    ) -> StoreResult<Vec<ServiceRequest>> {
        let t = self.tables.lock().await;
        Ok(t.service_requests.filtered(|s| s.employee_id == employee_id))
    }

    async fn list_service_requests_by_status(
        &self,
        status: ServiceRequestStatus,
    ) -> StoreResult<Vec<ServiceRequest>> {
        let t = self.tables.lock().await;
        Ok(t.service_requests.filtered(|s| s.status_id == status.id()))
    }

    async fn update_service_request_status(
        &self,
        id: DbId,
        to: ServiceRequestStatus,
        policy: ServiceStatusPolicy,
    ) -> StoreResult<ServiceStatusOutcome> {
        let mut t = self.tables.lock().await;
        let Some(request) = t.service_requests.rows.get_mut(&id) else {
            return Ok(ServiceStatusOutcome::NotFound);
        };
        let from = request.status()?;
        if policy.check(from, to).is_err() {
            return Ok(ServiceStatusOutcome::Refused { current: from });
        }
        request.status_id = to.id();
        request.updated_at = Utc::now();
        Ok(ServiceStatusOutcome::Updated(request.clone()))
    }
}
