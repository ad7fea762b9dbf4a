use serde_json::Value;
use std::sync::Arc;

use crate::engine::EngineError;
use crate::error::{Result, SifterError};
use crate::index::lifecycle::IndexLifecycleManager;
use crate::query::builder::QueryBuilder;
use crate::query::sort::SortResolver;
use crate::types::SearchRequest;

/// Runs search requests: resolves sorting, composes the query, and hands
/// back the engine's raw hit list.
#[derive(Clone)]
pub struct SearchExecutor {
    lifecycle: Arc<IndexLifecycleManager>,
    sort_resolver: SortResolver,
}

impl SearchExecutor {
    pub fn new(lifecycle: Arc<IndexLifecycleManager>) -> Self {
        Self {
            sort_resolver: SortResolver::new(Arc::clone(&lifecycle)),
            lifecycle,
        }
    }

    /// Compose the engine body for `request` without sending it.
    pub async fn build_body(&self, request: &SearchRequest) -> Value {
        let sort = match request.sort.as_deref() {
            Some(param) => self.sort_resolver.resolve(&request.index, param).await,
            None => Vec::new(),
        };

        QueryBuilder::new(request.pagination)
            .filters(&request.filters)
            .sort(sort)
            .build()
    }

    /// Search `request.index`, returning each hit unmodified (stored fields
    /// plus highlight fragments).
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>> {
        if !self.lifecycle.index_exists(&request.index) {
            return Err(SifterError::IndexNotFound(request.index.clone()));
        }

        let body = self.build_body(request).await;
        let mut response = match self.lifecycle.engine().search(&request.index, &body).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                return Err(SifterError::IndexNotFound(request.index.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        match response.pointer_mut("/hits/hits").map(Value::take) {
            Some(Value::Array(hits)) => Ok(hits),
            _ => Err(EngineError::Decode("search response has no hits.hits array".to_string()).into()),
        }
    }
}
