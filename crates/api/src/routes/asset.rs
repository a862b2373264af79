//! Route definitions for the `/assets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::asset;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                  -> list_assets (?name= filters by exact name)
/// POST   /                  -> create_asset (admin)
/// GET    /category/{name}   -> assets_by_category
/// GET    /{id}              -> get_asset
/// PUT    /{id}              -> update_asset (admin)
/// DELETE /{id}              -> delete_asset (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(asset::list_assets).post(asset::create_asset))
        .route("/category/{name}", get(asset::assets_by_category))
        .route(
            "/{id}",
            get(asset::get_asset)
                .put(asset::update_asset)
                .delete(asset::delete_asset),
        )
}
