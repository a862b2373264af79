//! Service request rules: issue types, status policy, description limits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::ServiceRequestStatus;

/// Maximum length of a service request description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2048;

/// Category of the reported problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Hardware,
    Software,
    Network,
    Performance,
    Other,
}

impl IssueType {
    pub const ALL: &'static [IssueType] = &[
        IssueType::Hardware,
        IssueType::Software,
        IssueType::Network,
        IssueType::Performance,
        IssueType::Other,
    ];

    /// Stored / wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Hardware => "HARDWARE",
            IssueType::Software => "SOFTWARE",
            IssueType::Network => "NETWORK",
            IssueType::Performance => "PERFORMANCE",
            IssueType::Other => "OTHER",
        }
    }
}

impl FromStr for IssueType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        IssueType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::BadInput(format!(
                    "Invalid issue type '{s}'. Must be one of: HARDWARE, SOFTWARE, NETWORK, \
                     PERFORMANCE, OTHER"
                ))
            })
    }
}

/// How status updates on a service request are checked.
///
/// - `Unrestricted`: any status may be written over any other.
/// - `ForwardOnly`: only strictly forward moves along
///   `Pending -> Transit -> Completed` (skipping allowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatusPolicy {
    #[default]
    Unrestricted,
    ForwardOnly,
}

impl ServiceStatusPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatusPolicy::Unrestricted => "unrestricted",
            ServiceStatusPolicy::ForwardOnly => "forward_only",
        }
    }

    /// Check a `from -> to` status write under this policy.
    pub fn check(self, from: ServiceRequestStatus, to: ServiceRequestStatus) -> Result<(), CoreError> {
        match self {
            ServiceStatusPolicy::Unrestricted => Ok(()),
            ServiceStatusPolicy::ForwardOnly if to.id() > from.id() => Ok(()),
            ServiceStatusPolicy::ForwardOnly => Err(CoreError::Conflict(format!(
                "Service request status can only move forward (current: {from}, requested: {to})"
            ))),
        }
    }
}

impl FromStr for ServiceStatusPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(ServiceStatusPolicy::Unrestricted),
            "forward_only" => Ok(ServiceStatusPolicy::ForwardOnly),
            other => Err(CoreError::BadInput(format!(
                "Invalid service status policy '{other}'. Must be one of: unrestricted, forward_only"
            ))),
        }
    }
}

/// Validate a free-text problem description.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::BadInput("Description must not be blank".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::BadInput(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_parses_known_labels() {
        assert_eq!("hardware".parse::<IssueType>().unwrap(), IssueType::Hardware);
        assert_eq!("OTHER".parse::<IssueType>().unwrap(), IssueType::Other);
        assert!(matches!(
            "COSMIC_RAYS".parse::<IssueType>(),
            Err(CoreError::BadInput(_))
        ));
    }

    #[test]
    fn unrestricted_allows_backward_moves() {
        let policy = ServiceStatusPolicy::Unrestricted;
        assert!(policy
            .check(ServiceRequestStatus::Completed, ServiceRequestStatus::Pending)
            .is_ok());
        assert!(policy
            .check(ServiceRequestStatus::Transit, ServiceRequestStatus::Transit)
            .is_ok());
    }

    #[test]
    fn forward_only_rejects_backward_and_same_state() {
        let policy = ServiceStatusPolicy::ForwardOnly;
        assert!(policy
            .check(ServiceRequestStatus::Pending, ServiceRequestStatus::Transit)
            .is_ok());
        assert!(policy
            .check(ServiceRequestStatus::Pending, ServiceRequestStatus::Completed)
            .is_ok());
        assert!(matches!(
            policy.check(ServiceRequestStatus::Completed, ServiceRequestStatus::Pending),
            Err(CoreError::Conflict(_))
        ));
        assert!(policy
            .check(ServiceRequestStatus::Transit, ServiceRequestStatus::Transit)
            .is_err());
    }

    #[test]
    fn policy_labels_parse() {
        assert_eq!(
            "forward_only".parse::<ServiceStatusPolicy>().unwrap(),
            ServiceStatusPolicy::ForwardOnly
        );
        assert!("sideways".parse::<ServiceStatusPolicy>().is_err());
    }

    #[test]
    fn description_limits() {
        assert!(validate_description("Screen flickers").is_ok());
        assert!(validate_description("   ").is_err());
        assert!(validate_description(&"a".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }
}
