//! Builds the configured search provider

use super::duckduckgo::DuckDuckGo;
use super::provider::EngineSearch;
use super::traits::Engine;
use crate::config::Settings;
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Loader for turning settings into a search provider
pub struct EngineLoader;

impl EngineLoader {
    /// Create the provider named by `search.engine`
    pub fn load(settings: &Settings, client: HttpClient) -> Result<EngineSearch> {
        let engine = Self::create_engine(&settings.search.engine)?;
        info!("Loaded search engine: {}", engine.name());

        Ok(EngineSearch::new(client, engine)
            .with_region(settings.search.region.clone())
            .with_timeout(Duration::from_secs_f64(settings.outgoing.search_timeout)))
    }

    /// Create an engine instance by name
    pub fn create_engine(engine_type: &str) -> Result<Arc<dyn Engine>> {
        let engine: Arc<dyn Engine> = match engine_type {
            "duckduckgo" | "ddg" => Arc::new(DuckDuckGo::new()),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown engine type: {} (available: {})",
                    engine_type,
                    Self::available_engines().join(", ")
                ));
            }
        };
        Ok(engine)
    }

    /// Get list of available engine types
    pub fn available_engines() -> Vec<&'static str> {
        vec!["duckduckgo"]
    }
}
