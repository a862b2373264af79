//! Handlers for the `/employees` resource.

use ams_core::types::DbId;
use ams_db::models::asset::AssetResponse;
use ams_db::models::audit::AuditResponse;
use ams_db::models::borrowing::BorrowingResponse;
use ams_db::models::employee::{EmployeeChanges, EmployeeProfile, EmployeeResponse};
use ams_db::models::service_request::ServiceRequestResponse;
use ams_engine::{audit, borrowing, catalog, employee, service_request};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_self_or_admin, RequireAdmin, RequireAuth};
use crate::response::{to_responses, DataResponse};
use crate::state::AppState;

/// Request body for `PUT /employees/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    /// Absent or empty keeps the current password.
    pub password: Option<String>,
}

/// GET /api/v1/employees
pub async fn list_employees(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let employees = employee::list_employees(state.store()).await?;
    let data: Vec<EmployeeResponse> = to_responses(employees)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/employees/{id}
pub async fn get_employee(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, id)?;
    let found = employee::get_employee(state.store(), id).await?;
    Ok(Json(DataResponse {
        data: EmployeeResponse::try_from(found)?,
    }))
}

/// PUT /api/v1/employees/{id}
pub async fn update_employee(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployeeRequest>,
) -> AppResult<impl IntoResponse> {
    let password_hash = match input.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password_strength(password).map_err(AppError::BadRequest)?;
            Some(hash_password(password).map_err(|e| {
                AppError::InternalError(format!("Password hashing error: {e}"))
            })?)
        }
        None => None,
    };

    let updated = employee::update_employee(
        state.store(),
        id,
        EmployeeChanges {
            profile: input.profile,
            password_hash,
        },
    )
    .await?;

    tracing::info!(employee_id = id, admin_id = admin.employee_id, "Employee updated via API");
    Ok(Json(DataResponse {
        data: EmployeeResponse::try_from(updated)?,
    }))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete_employee(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    employee::delete_employee(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/employees/{id}/assets
///
/// Assets the employee currently holds.
pub async fn held_assets(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, id)?;
    let assets = catalog::assets_held_by(state.store(), id).await?;
    let data: Vec<AssetResponse> = to_responses(assets)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/employees/{id}/borrowings
pub async fn employee_borrowings(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, id)?;
    let rows = borrowing::borrowings_by_employee(state.store(), id).await?;
    let data: Vec<BorrowingResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/employees/{id}/audits
pub async fn employee_audits(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, id)?;
    let rows = audit::audits_by_employee(state.store(), id).await?;
    let data: Vec<AuditResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/employees/{id}/service-requests
pub async fn employee_service_requests(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, id)?;
    let rows = service_request::service_requests_by_employee(state.store(), id).await?;
    let data: Vec<ServiceRequestResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}
