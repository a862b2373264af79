pub mod asset;
pub mod audit;
pub mod auth;
pub mod borrowing;
pub mod category;
pub mod employee;
pub mod health;
pub mod service_request;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
///
/// /employees                              list (admin)
/// /employees/{id}                         get (self/admin), update, delete (admin)
/// /employees/{id}/assets                  assets currently held
/// /employees/{id}/borrowings              borrowing history
/// /employees/{id}/audits                  audits addressed to the employee
/// /employees/{id}/service-requests        service requests opened
///
/// /categories                             list, create
/// /categories/by-name/{name}              get by name
/// /categories/{id}                        get, update, delete
///
/// /assets                                 list (?name=), create
/// /assets/category/{name}                 assets in a category
/// /assets/{id}                            get, update, delete
///
/// /borrowings                             request (caller borrows)
/// /borrowings/active|pending|rejected|returned   by status (admin)
/// /borrowings/{id}                        get
/// /borrowings/{id}/action                 approve / reject (admin)
/// /borrowings/{id}/return                 return
///
/// /audits                                 list, send (admin)
/// /audits/{id}                            get (admin)
/// /audits/{id}/decision                   verify / reject (addressee)
///
/// /service-requests                       list (admin), open (holder)
/// /service-requests/status/{status}       by status (admin)
/// /service-requests/{id}                  get (admin)
/// /service-requests/{id}/status           update status (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/employees", employee::router())
        .nest("/categories", category::router())
        .nest("/assets", asset::router())
        .nest("/borrowings", borrowing::router())
        .nest("/audits", audit::router())
        .nest("/service-requests", service_request::router())
}
