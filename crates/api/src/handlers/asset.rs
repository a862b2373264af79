//! Handlers for the `/assets` resource.

use ams_core::types::DbId;
use ams_db::models::asset::{AssetResponse, AssetSpec};
use ams_engine::catalog;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{to_responses, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /assets`.
#[derive(Debug, Deserialize)]
pub struct AssetListParams {
    /// Exact asset name; when given, an empty match is a 404.
    pub name: Option<String>,
}

/// POST /api/v1/assets
///
/// Creates the named category if it does not exist yet.
pub async fn create_asset(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(spec): Json<AssetSpec>,
) -> AppResult<impl IntoResponse> {
    let asset = catalog::create_asset(state.store(), &spec).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AssetResponse::try_from(asset)?,
        }),
    ))
}

/// GET /api/v1/assets
pub async fn list_assets(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    let assets = match params.name.as_deref() {
        Some(name) => catalog::assets_by_name(state.store(), name).await?,
        None => catalog::list_assets(state.store()).await?,
    };
    let data: Vec<AssetResponse> = to_responses(assets)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = catalog::get_asset(state.store(), id).await?;
    Ok(Json(DataResponse {
        data: AssetResponse::try_from(asset)?,
    }))
}

/// GET /api/v1/assets/category/{name}
pub async fn assets_by_category(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let assets = catalog::assets_by_category(state.store(), &name).await?;
    let data: Vec<AssetResponse> = to_responses(assets)?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(spec): Json<AssetSpec>,
) -> AppResult<impl IntoResponse> {
    let asset = catalog::update_asset(state.store(), id, &spec).await?;
    Ok(Json(DataResponse {
        data: AssetResponse::try_from(asset)?,
    }))
}

/// DELETE /api/v1/assets/{id}
///
/// Refusal rules follow the configured asset delete policy.
pub async fn delete_asset(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let policy = state.config.workflow.asset_delete_policy;
    catalog::delete_asset(state.store(), id, policy).await?;
    Ok(StatusCode::NO_CONTENT)
}
