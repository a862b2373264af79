use std::sync::Arc;

use ams_db::EntityStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Entity store every workflow operation runs against.
    pub store: Arc<dyn EntityStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// The store as the engine expects it.
    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}
