//! Ownership audit decisions.
//!
//! An audit starts `PENDING` and is closed exactly once by the addressed
//! employee, either `VERIFIED` or `REJECTED`. Several pending audits for the
//! same employee/asset pair may coexist.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::AuditStatus;
use crate::types::DbId;

/// Decision the addressed employee makes on an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Verify,
    Reject,
}

impl AuditAction {
    pub fn target_status(self) -> AuditStatus {
        match self {
            AuditAction::Verify => AuditStatus::Verified,
            AuditAction::Reject => AuditStatus::Rejected,
        }
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VERIFY" => Ok(AuditAction::Verify),
            "REJECT" => Ok(AuditAction::Reject),
            _ => Err(CoreError::BadInput(format!(
                "Invalid audit action '{s}'. Only VERIFY or REJECT are allowed"
            ))),
        }
    }
}

impl AuditStatus {
    pub fn is_terminal(self) -> bool {
        self != AuditStatus::Pending
    }
}

/// Only the employee the audit was sent to may decide it.
pub fn ensure_addressee(audit_employee_id: DbId, caller_employee_id: DbId) -> Result<(), CoreError> {
    if audit_employee_id != caller_employee_id {
        return Err(CoreError::Unauthorized(
            "You can only make decisions on your own audits".into(),
        ));
    }
    Ok(())
}

/// A decision is only possible while the audit is still pending.
pub fn ensure_decidable(current: AuditStatus) -> Result<(), CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Audit decision can only be made on PENDING audits (current status: {current})"
        )));
    }
    Ok(())
}
