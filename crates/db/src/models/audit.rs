//! Ownership audit model.

use ams_core::error::CoreError;
use ams_core::status::{decode, AuditStatus, StatusId};
use ams_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `asset_audits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetAudit {
    pub id: DbId,
    pub employee_id: DbId,
    pub asset_id: DbId,
    pub status_id: StatusId,
    pub requested_at: Timestamp,
    pub created_at: Timestamp,
    /// Stamped when the decision is recorded.
    pub updated_at: Timestamp,
}

impl AssetAudit {
    pub fn status(&self) -> Result<AuditStatus, CoreError> {
        decode(self.status_id, AuditStatus::from_id, "audit")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditResponse {
    #[serde(flatten)]
    pub audit: AssetAudit,
    pub status: AuditStatus,
}

impl TryFrom<AssetAudit> for AuditResponse {
    type Error = CoreError;

    fn try_from(audit: AssetAudit) -> Result<Self, Self::Error> {
        let status = audit.status()?;
        Ok(Self { audit, status })
    }
}

/// DTO for sending an audit to an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct SendAudit {
    pub employee_id: DbId,
    pub asset_id: DbId,
}
