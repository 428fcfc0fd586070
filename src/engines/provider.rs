//! Runs an [`Engine`] over HTTP as a [`SearchProvider`]

use super::traits::*;
use crate::network::HttpClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Search provider backed by a single engine
pub struct EngineSearch {
    client: HttpClient,
    engine: Arc<dyn Engine>,
    region: String,
    timeout: Duration,
}

impl std::fmt::Debug for EngineSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSearch")
            .field("engine", &self.engine.name())
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl EngineSearch {
    pub fn new(client: HttpClient, engine: Arc<dyn Engine>) -> Self {
        Self {
            client,
            engine,
            region: "wt-wt".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Set the whole-search timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}

#[async_trait]
impl SearchProvider for EngineSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let start = Instant::now();
        let params = RequestParams::new(query).with_region(self.region.clone());
        let request = self.engine.request(&params)?;

        // The outer timeout also covers body streaming.
        let response = match timeout(self.timeout, self.client.execute(request, self.timeout)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(SearchError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(SearchError::Network(e)),
            Err(_) => return Err(SearchError::Timeout(self.timeout)),
        };

        let mut results = self.engine.response(response).map_err(|e| {
            warn!("Engine {} failed for '{}': {}", self.engine.name(), query, e);
            e
        })?;
        results.truncate(limit);

        debug!(
            "Engine {} returned {} results in {:?}",
            self.engine.name(),
            results.len(),
            start.elapsed()
        );

        Ok(results)
    }
}
