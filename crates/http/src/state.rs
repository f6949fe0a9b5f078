//! Shared handler state

use crate::config::HttpConfig;
use docsearch_engine::SearchEngine;
use std::sync::Arc;

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: SearchEngine,
    pub config: Arc<HttpConfig>,
}

impl AppState {
    pub fn new(engine: SearchEngine, config: HttpConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }
}
