//! Route definitions for the `/service-requests` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::service_request;
use crate::state::AppState;

/// Routes mounted at `/service-requests`.
///
/// ```text
/// GET  /                   -> list_service_requests (admin)
/// POST /                   -> create_service_request (holder)
/// GET  /status/{status}    -> service_requests_by_status (admin)
/// GET  /{id}               -> get_service_request (admin)
/// PUT  /{id}/status        -> update_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_request::list_service_requests)
                .post(service_request::create_service_request),
        )
        .route(
            "/status/{status}",
            get(service_request::service_requests_by_status),
        )
        .route("/{id}", get(service_request::get_service_request))
        .route("/{id}/status", put(service_request::update_status))
}
