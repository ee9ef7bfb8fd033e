//! Application state: the taxonomy configuration store behind its injected
//! persistence resource.
//!
//! Construction performs no disk I/O; `main` calls `store.load()` as an
//! explicit startup step so the first-use seeding happens at a well-defined
//! point (and tests can build a store around an in-memory resource instead).

use tracing::instrument;

use crate::config::{ConfigStore, FileResource};

pub struct AppState {
    pub store: ConfigStore,
}

impl AppState {
    /// Build state from env: resolve the taxonomy file location and wire up
    /// the store. Nothing is read yet.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let resource = FileResource::from_env();
        Self { store: ConfigStore::new(Box::new(resource)) }
    }
}
