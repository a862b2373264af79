//! Route definitions for the `/employees` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /                        -> list_employees (admin)
/// GET    /{id}                    -> get_employee
/// PUT    /{id}                    -> update_employee (admin)
/// DELETE /{id}                    -> delete_employee (admin)
/// GET    /{id}/assets             -> held_assets
/// GET    /{id}/borrowings         -> employee_borrowings
/// GET    /{id}/audits             -> employee_audits
/// GET    /{id}/service-requests   -> employee_service_requests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list_employees))
        .route(
            "/{id}",
            get(employee::get_employee)
                .put(employee::update_employee)
                .delete(employee::delete_employee),
        )
        .route("/{id}/assets", get(employee::held_assets))
        .route("/{id}/borrowings", get(employee::employee_borrowings))
        .route("/{id}/audits", get(employee::employee_audits))
        .route(
            "/{id}/service-requests",
            get(employee::employee_service_requests),
        )
}
