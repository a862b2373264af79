//! Handlers for the `/audits` resource.

use ams_core::types::DbId;
use ams_db::models::audit::{AuditResponse, SendAudit};
use ams_engine::audit;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{to_responses, DataResponse};
use crate::state::AppState;

/// Request body for `PUT /audits/{id}/decision`.
///
/// The action stays a raw string here: an unrecognized value must not be
/// reported before the caller is known to be the audit's addressee.
#[derive(Debug, Deserialize)]
pub struct AuditDecisionRequest {
    pub action: String,
}

/// POST /api/v1/audits
pub async fn send_audit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SendAudit>,
) -> AppResult<impl IntoResponse> {
    let created = audit::send_audit(state.store(), input.employee_id, input.asset_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuditResponse::try_from(created)?,
        }),
    ))
}

/// PUT /api/v1/audits/{id}/decision
///
/// The caller decides as themselves; only the addressed employee may.
pub async fn decide_audit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AuditDecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let decided = audit::decide_audit(state.store(), id, user.employee_id, &input.action).await?;
    Ok(Json(DataResponse {
        data: AuditResponse::try_from(decided)?,
    }))
}

/// GET /api/v1/audits
pub async fn list_audits(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = audit::all_audits(state.store()).await?;
    let data: Vec<AuditResponse> = to_responses(rows)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/audits/{id}
pub async fn get_audit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = audit::get_audit(state.store(), id).await?;
    Ok(Json(DataResponse {
        data: AuditResponse::try_from(found)?,
    }))
}
