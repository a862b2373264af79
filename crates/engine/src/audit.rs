//! Audit Workflow: ownership verification requests.

use ams_core::audit::{ensure_addressee, ensure_decidable, AuditAction};
use ams_core::error::CoreError;
use ams_core::types::DbId;
use ams_db::models::audit::AssetAudit;
use ams_db::EntityStore;
use chrono::Utc;

use crate::error::{conflict, EngineResult};

/// Ask `employee_id` to confirm they still have `asset_id`.
///
/// Always creates a new PENDING audit, even if one is already open for the pair.
pub async fn send_audit(
    store: &dyn EntityStore,
    employee_id: DbId,
    asset_id: DbId,
) -> EngineResult<AssetAudit> {
    if store.find_employee(employee_id).await?.is_none() {
        return Err(CoreError::not_found("Employee", employee_id).into());
    }
    if store.find_asset(asset_id).await?.is_none() {
        return Err(CoreError::not_found("Asset", asset_id).into());
    }
    let audit = store.insert_audit(employee_id, asset_id, Utc::now()).await?;
    tracing::info!(audit_id = audit.id, employee_id, asset_id, "Audit sent");
    Ok(audit)
}

/// Record the addressed employee's decision on an audit.
///
/// Checks run in a fixed order: the audit must exist, the caller must be its
/// addressee, it must still be PENDING, and only then is `action` required to
/// be `VERIFY` or `REJECT`.
pub async fn decide_audit(
    store: &dyn EntityStore,
    audit_id: DbId,
    caller_employee_id: DbId,
    action: &str,
) -> EngineResult<AssetAudit> {
    let parsed = action.parse::<AuditAction>();

    let audit = get_audit(store, audit_id).await?;
    if let Err(e) = ensure_addressee(audit.employee_id, caller_employee_id) {
        tracing::warn!(
            audit_id,
            caller_employee_id,
            addressee = audit.employee_id,
            "Audit decision refused: caller is not the addressee",
        );
        return Err(e.into());
    }
    ensure_decidable(audit.status()?)?;
    let action = parsed?;

    let to = action.target_status();
    match store.decide_audit(audit_id, to, Utc::now()).await? {
        Some(decided) => {
            tracing::info!(audit_id, caller_employee_id, status = %to, "Audit decided");
            Ok(decided)
        }
        None => {
            tracing::warn!(audit_id, "Audit decision lost a race");
            conflict(format!("Audit {audit_id} has already been decided"))
        }
    }
}

pub async fn get_audit(store: &dyn EntityStore, id: DbId) -> EngineResult<AssetAudit> {
    Ok(store
        .find_audit(id)
        .await?
        .ok_or(CoreError::not_found("AssetAudit", id))?)
}

pub async fn audits_by_employee(
    store: &dyn EntityStore,
    employee_id: DbId,
) -> EngineResult<Vec<AssetAudit>> {
    Ok(store.list_audits_by_employee(employee_id).await?)
}

pub async fn all_audits(store: &dyn EntityStore) -> EngineResult<Vec<AssetAudit>> {
    Ok(store.list_audits().await?)
}
