use std::collections::HashMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::{ElasticClient, EngineResult, SearchEngine};
use crate::error::Result;
use crate::index::lifecycle::IndexLifecycleManager;

/// Establishes the engine connection at startup.
pub struct ConnectionManager {
    config: EngineConfig,
}

impl ConnectionManager {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Connect to the configured node, retrying until it answers a ping.
    ///
    /// Never returns an error: every failure is logged and retried after
    /// `retry_interval`, so startup blocks until the engine is reachable.
    pub async fn connect(&self) -> ElasticClient {
        self.connect_with(|| ElasticClient::new(&self.config)).await
    }

    /// Retry loop shared by [`connect`](Self::connect); `open` builds a fresh
    /// client for every attempt.
    pub async fn connect_with<E, F>(&self, mut open: F) -> E
    where
        E: SearchEngine,
        F: FnMut() -> EngineResult<E>,
    {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let result = match open() {
                Ok(engine) => match engine.ping().await {
                    Ok(()) => Ok(engine),
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };

            match result {
                Ok(engine) => {
                    tracing::info!(node = %self.config.node, attempt, "Connection with search engine established");
                    return engine;
                }
                Err(e) => {
                    tracing::warn!(
                        node = %self.config.node,
                        attempt,
                        error = %e,
                        "Connection with search engine failed, retrying in {}s",
                        self.config.retry_interval.as_secs_f64()
                    );
                    tokio::time::sleep(self.config.retry_interval).await;
                }
            }
        }
    }

    /// List the engine's indexes as a name → present catalog.
    pub async fn load_catalog(engine: &dyn SearchEngine) -> Result<HashMap<String, bool>> {
        let names = engine.list_indices().await?;
        tracing::info!(indexes = names.len(), "Loaded index catalog");
        Ok(names.into_iter().map(|name| (name, true)).collect())
    }

    /// Connect, load the catalog, and hand both to a new lifecycle manager.
    pub async fn bootstrap(&self) -> Result<Arc<IndexLifecycleManager>> {
        self.config.validate()?;
        let engine: Arc<dyn SearchEngine> = Arc::new(self.connect().await);
        let catalog = Self::load_catalog(engine.as_ref()).await?;
        Ok(IndexLifecycleManager::new(engine, catalog))
    }
}
