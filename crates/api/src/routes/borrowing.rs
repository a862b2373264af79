//! Route definitions for the `/borrowings` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::borrowing;
use crate::state::AppState;

/// Routes mounted at `/borrowings`.
///
/// ```text
/// POST /              -> request_borrow
/// GET  /active        -> active (admin)
/// GET  /pending       -> pending (admin)
/// GET  /rejected      -> rejected (admin)
/// GET  /returned      -> returned (admin)
/// GET  /{id}          -> get_borrowing
/// PUT  /{id}/action   -> process_action (admin)
/// PUT  /{id}/return   -> return_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(borrowing::request_borrow))
        .route("/active", get(borrowing::active))
        .route("/pending", get(borrowing::pending))
        .route("/rejected", get(borrowing::rejected))
        .route("/returned", get(borrowing::returned))
        .route("/{id}", get(borrowing::get_borrowing))
        .route("/{id}/action", put(borrowing::process_action))
        .route("/{id}/return", put(borrowing::return_asset))
}
