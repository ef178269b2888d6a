use chrono::{DateTime, Utc};

use crate::config::ServerConfig;
use crate::models::{Assignment, Course};
use crate::store::Store;

/// Shared application state, built once at startup and handed to every
/// request handler.
pub struct AppState {
    pub courses: Store<Course>,
    pub assignments: Store<Assignment>,
    pub config: ServerConfig,
    /// When the server state was created
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates state with empty stores.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            courses: Store::new(),
            assignments: Store::new(),
            config,
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
