//! Application state
//!
//! Read-only after startup: the registry and the configuration it was built from.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::{GeminiClient, LanguageModel};
use crate::registry::Registry;

/// Shared application state
pub struct AppState {
    /// Agents and workflows served by the API
    pub registry: Registry,
    /// Configuration the state was built from
    pub config: Config,
}

/// State handle passed to handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state around an existing registry
    pub fn new(registry: Registry, config: Config) -> Self {
        Self { registry, config }
    }

    /// Build the production state: Gemini-backed weather agent and workflow
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http_client = config.http_client()?;
        let model: Arc<dyn LanguageModel> =
            Arc::new(GeminiClient::new(http_client.clone(), &config.llm));
        let registry = Registry::weather(&config, http_client, model)?;
        Ok(Self::new(registry, config))
    }
}
