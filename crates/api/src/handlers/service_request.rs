//! Handlers for the `/service-requests` resource.

use ams_core::status::ServiceRequestStatus;
use ams_core::types::DbId;
use ams_db::models::service_request::{
    CreateServiceRequest, ServiceRequestResponse, UpdateServiceRequestStatus,
};
use ams_engine::service_request;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{to_responses, DataResponse};
use crate::state::AppState;

/// POST /api/v1/service-requests
///
/// The caller must currently hold the asset.
pub async fn create_service_request(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateServiceRequest>,
) -> AppResult<impl IntoResponse> {
    let created =
        service_request::create_service_request(state.store(), user.employee_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ServiceRequestResponse::try_from(created)?,
        }),
    ))
}

/// GET /api/v1/service-requests
pub async fn list_service_requests(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = service_request::all_service_requests(state.store()).await?;
    let data: Vec<ServiceRequestResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/service-requests/{id}
pub async fn get_service_request(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = service_request::get_service_request(state.store(), id).await?;
    Ok(Json(DataResponse {
        data: ServiceRequestResponse::try_from(found)?,
    }))
}

/// GET /api/v1/service-requests/status/{status}
pub async fn service_requests_by_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<impl IntoResponse> {
    let status: ServiceRequestStatus = status.parse()?;
    let rows = service_request::service_requests_by_status(state.store(), status).await?;
    let data: Vec<ServiceRequestResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/service-requests/{id}/status
///
/// Allowed moves depend on the configured service status policy.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceRequestStatus>,
) -> AppResult<impl IntoResponse> {
    let policy = state.config.workflow.service_status_policy;
    let updated =
        service_request::update_service_request_status(state.store(), policy, id, input.status)
            .await?;
    Ok(Json(DataResponse {
        data: ServiceRequestResponse::try_from(updated)?,
    }))
}
