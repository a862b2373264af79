//! Shared response envelope for API handlers.
//!
//! All successful responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Convert storage rows into their response shape, failing on the first row
/// whose status id is unknown.
pub fn to_responses<T, R>(rows: Vec<T>) -> Result<Vec<R>, ams_core::error::CoreError>
where
    R: TryFrom<T, Error = ams_core::error::CoreError>,
{
    rows.into_iter().map(R::try_from).collect()
}
