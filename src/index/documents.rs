use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::error::{Result, SifterError};
use crate::index::lifecycle::IndexLifecycleManager;
use crate::types::{with_synonym_mirror, Document};

/// Single-document writes, auto-creating the target index on first save.
#[derive(Clone)]
pub struct DocumentStore {
    lifecycle: Arc<IndexLifecycleManager>,
}

impl DocumentStore {
    pub fn new(lifecycle: Arc<IndexLifecycleManager>) -> Self {
        Self { lifecycle }
    }

    /// Write or overwrite `document` in `index`, returning the engine's
    /// acknowledgement.
    pub async fn save(&self, index: &str, document: &Document) -> Result<Value> {
        self.lifecycle
            .ensure_index_with_synonym_support(index)
            .await?;

        let response = self
            .lifecycle
            .engine()
            .index_document(index, &document.id, &document.to_body())
            .await?;

        tracing::debug!(index, id = %document.id, "Saved document");
        Ok(response)
    }

    /// Merge `fields` onto the stored document `id`.
    pub async fn update(&self, index: &str, id: &str, fields: &Map<String, Value>) -> Result<Value> {
        let body = json!({ "doc": with_synonym_mirror(fields) });

        match self
            .lifecycle
            .engine()
            .update_document(index, id, &body)
            .await
        {
            Ok(response) => Ok(response),
            Err(e) if e.is_not_found() => Err(SifterError::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every document matching `id`.
    ///
    /// Goes through delete-by-query so deployments that treat the id as an
    /// ordinary filterable field behave the same as ones keyed by it.
    pub async fn delete(&self, index: &str, id: &str) -> Result<Value> {
        let query = json!({
            "query": {
                "bool": {
                    "must": [
                        { "match": { "_id": id } }
                    ]
                }
            }
        });

        match self.lifecycle.engine().delete_by_query(index, &query).await {
            Ok(response) => {
                let deleted = response
                    .get("deleted")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                tracing::debug!(index, id, deleted, "Deleted documents by id");
                Ok(response)
            }
            Err(e) if e.is_not_found() => Err(SifterError::IndexNotFound(index.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
