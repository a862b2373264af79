//! Handlers for the `/borrowings` resource.
//!
//! Employees file and return; admins approve or reject and browse by status.

use ams_core::borrowing::BorrowingAction;
use ams_core::status::BorrowingStatus;
use ams_core::types::DbId;
use ams_db::models::borrowing::{BorrowingResponse, CreateBorrowRequest};
use ams_engine::borrowing;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{ensure_self_or_admin, RequireAdmin, RequireAuth};
use crate::response::{to_responses, DataResponse};
use crate::state::AppState;

/// Request body for `PUT /borrowings/{id}/action`.
#[derive(Debug, Deserialize)]
pub struct BorrowingActionRequest {
    /// `"APPROVE"` or `"REJECT"`, case-insensitive.
    pub action: String,
}

/// POST /api/v1/borrowings
///
/// File a borrow request on behalf of the caller.
pub async fn request_borrow(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateBorrowRequest>,
) -> AppResult<impl IntoResponse> {
    let created = borrowing::request_borrow(state.store(), user.employee_id, input.asset_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BorrowingResponse::try_from(created)?,
        }),
    ))
}

/// GET /api/v1/borrowings/{id}
pub async fn get_borrowing(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = borrowing::get_borrowing(state.store(), id).await?;
    ensure_self_or_admin(&user, found.employee_id)?;
    Ok(Json(DataResponse {
        data: BorrowingResponse::try_from(found)?,
    }))
}

/// PUT /api/v1/borrowings/{id}/action
pub async fn process_action(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BorrowingActionRequest>,
) -> AppResult<impl IntoResponse> {
    let action: BorrowingAction = input.action.parse()?;
    let updated = borrowing::process_borrowing_action(state.store(), id, action).await?;
    tracing::info!(
        borrowing_id = id,
        admin_id = admin.employee_id,
        action = action.as_str(),
        "Borrowing action applied via API",
    );
    Ok(Json(DataResponse {
        data: BorrowingResponse::try_from(updated)?,
    }))
}

/// PUT /api/v1/borrowings/{id}/return
///
/// Only the borrower or an admin may return.
pub async fn return_asset(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = borrowing::get_borrowing(state.store(), id).await?;
    ensure_self_or_admin(&user, current.employee_id)?;
    let returned = borrowing::return_asset(state.store(), id).await?;
    Ok(Json(DataResponse {
        data: BorrowingResponse::try_from(returned)?,
    }))
}

async fn list_with_status(
    state: &AppState,
    status: BorrowingStatus,
) -> AppResult<Json<DataResponse<Vec<BorrowingResponse>>>> {
    let rows = borrowing::borrowings_with_status(state.store(), status).await?;
    Ok(Json(DataResponse {
        data: to_responses(rows)?,
    }))
}

/// GET /api/v1/borrowings/active
pub async fn active(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, BorrowingStatus::Active).await
}

/// GET /api/v1/borrowings/pending
pub async fn pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, BorrowingStatus::Pending).await
}

/// GET /api/v1/borrowings/rejected
pub async fn rejected(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, BorrowingStatus::Rejected).await
}

/// GET /api/v1/borrowings/returned
pub async fn returned(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, BorrowingStatus::Returned).await
}
