//! Route definitions for the `/audits` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audits`.
///
/// ```text
/// GET  /                -> list_audits (admin)
/// POST /                -> send_audit (admin)
/// GET  /{id}            -> get_audit (admin)
/// PUT  /{id}/decision   -> decide_audit (addressee)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(audit::list_audits).post(audit::send_audit))
        .route("/{id}", get(audit::get_audit))
        .route("/{id}/decision", put(audit::decide_audit))
}
