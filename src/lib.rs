pub mod config;
pub mod error;
pub mod rest;
pub mod status;
pub mod store;

use std::sync::Arc;

use config::ServerConfig;
use store::TaskStore;

/// Shared application state passed to every REST handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: TaskStore,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: ServerConfig, store: TaskStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            started_at: std::time::Instant::now(),
        }
    }
}
