//! Service Request Workflow: repair tickets opened by an asset's current holder.

use ams_core::error::CoreError;
use ams_core::service_request::{validate_description, ServiceStatusPolicy};
use ams_core::status::ServiceRequestStatus;
use ams_core::types::DbId;
use ams_db::models::service_request::{CreateServiceRequest, NewServiceRequest, ServiceRequest};
use ams_db::store::ServiceStatusOutcome;
use ams_db::EntityStore;
use chrono::Utc;

use crate::error::{conflict, EngineResult};

/// Open a service request. The employee must hold the asset through an
/// ACTIVE borrowing at the moment of the call.
pub async fn create_service_request(
    store: &dyn EntityStore,
    employee_id: DbId,
    input: &CreateServiceRequest,
) -> EngineResult<ServiceRequest> {
    validate_description(&input.description)?;
    let asset_id = input.asset_id;
    if store.find_employee(employee_id).await?.is_none() {
        return Err(CoreError::not_found("Employee", employee_id).into());
    }
    if store.find_asset(asset_id).await?.is_none() {
        return Err(CoreError::not_found("Asset", asset_id).into());
    }

    let new = NewServiceRequest {
        employee_id,
        asset_id,
        issue_type: input.issue_type,
        description: input.description.trim().to_string(),
    };
    match store.create_service_request_for_holder(&new, Utc::now()).await? {
        Some(request) => {
            tracing::info!(
                service_request_id = request.id,
                employee_id,
                asset_id,
                issue_type = input.issue_type.as_str(),
                "Service request opened",
            );
            Ok(request)
        }
        None => {
            tracing::warn!(employee_id, asset_id, "Service request refused: not the holder");
            conflict(format!(
                "Employee {employee_id} does not currently hold asset {asset_id}"
            ))
        }
    }
}

/// Set a service request's status, subject to `policy`.
pub async fn update_service_request_status(
    store: &dyn EntityStore,
    policy: ServiceStatusPolicy,
    id: DbId,
    to: ServiceRequestStatus,
) -> EngineResult<ServiceRequest> {
    match store.update_service_request_status(id, to, policy).await? {
        ServiceStatusOutcome::Updated(request) => {
            tracing::info!(service_request_id = id, status = %to, "Service request status updated");
            Ok(request)
        }
        ServiceStatusOutcome::NotFound => Err(CoreError::not_found("ServiceRequest", id).into()),
        ServiceStatusOutcome::Refused { current } => {
            tracing::warn!(
                service_request_id = id,
                current = %current,
                requested = %to,
                policy = policy.as_str(),
                "Service request status update refused",
            );
            conflict(format!(
                "Service request {id} cannot move from {current} to {to} ({} policy)",
                policy.as_str()
            ))
        }
    }
}

pub async fn get_service_request(store: &dyn EntityStore, id: DbId) -> EngineResult<ServiceRequest> {
    Ok(store
        .find_service_request(id)
        .await?
        .ok_or(CoreError::not_found("ServiceRequest", id))?)
}

pub async fn service_requests_by_employee(
    store: &dyn EntityStore,
    employee_id: DbId,
) -> EngineResult<Vec<ServiceRequest>> {
    Ok(store.list_service_requests_by_employee(employee_id).await?)
}

pub async fn all_service_requests(store: &dyn EntityStore) -> EngineResult<Vec<ServiceRequest>> {
    Ok(store.list_service_requests().await?)
}

pub async fn service_requests_by_status(
    store: &dyn EntityStore,
    status: ServiceRequestStatus,
) -> EngineResult<Vec<ServiceRequest>> {
    Ok(store.list_service_requests_by_status(status).await?)
}
