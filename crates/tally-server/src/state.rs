//! Application state shared across handlers.

use std::sync::Arc;

use tally_analyze::Analyzer;

use crate::config::ServerConfig;

/// Immutable per-process state. Requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn new(config: ServerConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            config: Arc::new(config),
            analyzer,
        }
    }

    /// State running the tool named in `config`.
    pub fn from_config(config: ServerConfig) -> Self {
        let analyzer = Arc::new(config.tool.analyzer());
        Self::new(config, analyzer)
    }
}
