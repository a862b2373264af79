//! Service request model and DTOs.

use ams_core::error::CoreError;
use ams_core::service_request::IssueType;
use ams_core::status::{decode, ServiceRequestStatus, StatusId};
use ams_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `service_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub asset_id: DbId,
    pub issue_type: String,
    pub description: String,
    pub status_id: StatusId,
    pub requested_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ServiceRequest {
    pub fn status(&self) -> Result<ServiceRequestStatus, CoreError> {
        decode(self.status_id, ServiceRequestStatus::from_id, "service request")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestResponse {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub status: ServiceRequestStatus,
}

impl TryFrom<ServiceRequest> for ServiceRequestResponse {
    type Error = CoreError;

    fn try_from(request: ServiceRequest) -> Result<Self, Self::Error> {
        let status = request.status()?;
        Ok(Self { request, status })
    }
}

/// DTO for opening a service request on a held asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub asset_id: DbId,
    pub issue_type: IssueType,
    pub description: String,
}

/// Insert payload, already validated.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub employee_id: DbId,
    pub asset_id: DbId,
    pub issue_type: IssueType,
    pub description: String,
}

/// DTO for an admin status update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceRequestStatus {
    pub status: ServiceRequestStatus,
}

