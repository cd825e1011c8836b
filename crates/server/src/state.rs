use std::sync::Arc;

use cachescout_core::{CacheScout, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    scout: Arc<CacheScout>,
}

impl AppState {
    pub fn new(config: Config, scout: Arc<CacheScout>) -> Self {
        Self { config, scout }
    }

    /// Credentials never live in the configuration, so it is served as is.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scout(&self) -> &CacheScout {
        self.scout.as_ref()
    }
}
