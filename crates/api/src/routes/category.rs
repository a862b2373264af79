//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /                 -> list_categories
/// POST   /                 -> create_category (admin)
/// GET    /by-name/{name}   -> get_category_by_name
/// GET    /{id}             -> get_category
/// PUT    /{id}             -> update_category (admin)
/// DELETE /{id}             -> delete_category (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_categories).post(category::create_category),
        )
        .route("/by-name/{name}", get(category::get_category_by_name))
        .route(
            "/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
}
