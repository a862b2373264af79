use ams_core::asset::AssetDeletePolicy;
use ams_core::service_request::ServiceStatusPolicy;

/// Workflow policy switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowConfig {
    pub asset_delete_policy: AssetDeletePolicy,
    pub service_status_policy: ServiceStatusPolicy,
}

impl WorkflowConfig {
    /// Load policies from environment variables.
    ///
    /// | Env Var                 | Default               |
    /// |-------------------------|-----------------------|
    /// | `ASSET_DELETE_POLICY`   | `reject_with_history` |
    /// | `SERVICE_STATUS_POLICY` | `unrestricted`        |
    pub fn from_env() -> Self {
        let asset_delete_policy = std::env::var("ASSET_DELETE_POLICY")
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|e| panic!("ASSET_DELETE_POLICY is invalid: {e}"))
            })
            .unwrap_or_default();

        let service_status_policy = std::env::var("SERVICE_STATUS_POLICY")
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|e| panic!("SERVICE_STATUS_POLICY is invalid: {e}"))
            })
            .unwrap_or_default();

        Self {
            asset_delete_policy,
            service_status_policy,
        }
    }
}
