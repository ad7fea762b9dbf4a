use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::engine::{EngineError, SearchEngine};
use crate::error::{Result, SifterError};
use crate::index::analysis::{create_index_body, synonym_mapping_body, synonym_settings_body};
use crate::index::catalog::IndexCatalog;
use crate::index::mapping::IndexMapping;
use crate::types::{DeleteIndexResult, SynonymUpdate};

/// Where an index stands in the close → reconfigure → reopen sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPhase {
    Open,
    /// Closed (or closing) while analysis settings are replaced.
    Closing,
    Reopening,
    /// A step after the close failed; the index stays closed until a retry
    /// or manual reopen.
    StuckClosed,
}

impl fmt::Display for IndexPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexPhase::Open => "open",
            IndexPhase::Closing => "closing",
            IndexPhase::Reopening => "reopening",
            IndexPhase::StuckClosed => "stuck_closed",
        };
        f.write_str(s)
    }
}

/// Owns the index-existence catalog, the mapping cache and per-index synonym
/// state, and sequences administrative operations against the engine.
///
/// Shared as `Arc<IndexLifecycleManager>` by the document store, sort
/// resolver and search executor. No lock is held across engine calls: two
/// concurrent callers can both see an index as absent and both try to
/// create it, in which case the engine's duplicate-creation error is
/// treated as success.
pub struct IndexLifecycleManager {
    engine: Arc<dyn SearchEngine>,
    catalog: IndexCatalog,
    mappings: DashMap<String, Arc<IndexMapping>>,
    synonyms: DashMap<String, Vec<String>>,
    phases: DashMap<String, IndexPhase>,
}

impl fmt::Debug for IndexLifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexLifecycleManager")
            .field("indexes", &self.catalog.len())
            .field("cached_mappings", &self.mappings.len())
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}

impl IndexLifecycleManager {
    pub fn new(engine: Arc<dyn SearchEngine>, catalog: HashMap<String, bool>) -> Arc<Self> {
        Arc::new(IndexLifecycleManager {
            engine,
            catalog: IndexCatalog::from(catalog),
            mappings: DashMap::new(),
            synonyms: DashMap::new(),
            phases: DashMap::new(),
        })
    }

    pub fn engine(&self) -> &Arc<dyn SearchEngine> {
        &self.engine
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    pub fn index_exists(&self, index: &str) -> bool {
        self.catalog.contains(index)
    }

    /// Make sure `index` exists with synonym-capable analysis.
    ///
    /// Returns immediately when the catalog already knows the index. Otherwise
    /// the engine is asked first so an index created elsewhere is adopted
    /// rather than recreated.
    pub async fn ensure_index_with_synonym_support(&self, index: &str) -> Result<()> {
        if self.catalog.contains(index) {
            return Ok(());
        }

        if self.engine.index_exists(index).await? {
            tracing::debug!(index, "Adopting existing index into catalog");
            self.catalog.mark_present(index);
            return Ok(());
        }

        match self.engine.create_index(index, &create_index_body()).await {
            Ok(_) => {
                tracing::info!(index, "Created index with synonym support");
            }
            Err(e) if e.is_already_exists() => {
                tracing::debug!(index, "Index created concurrently, treating as present");
            }
            Err(e) => {
                return Err(SifterError::IndexCreation {
                    index: index.to_string(),
                    source: e,
                });
            }
        }

        self.invalidate_mapping(index);
        self.catalog.mark_present(index);
        Ok(())
    }

    /// Replace the synonym list of `index`, creating the index if needed.
    ///
    /// The index is closed, its analysis settings replaced, reopened, and its
    /// mapping updated to bind `text` and `text_synonyms`. A failure after
    /// the close leaves the index closed and is reported as
    /// [`SifterError::IndexLifecycle`] with [`IndexPhase::StuckClosed`];
    /// nothing is rolled back.
    pub async fn update_synonyms(&self, index: &str, synonyms: Vec<String>) -> Result<SynonymUpdate> {
        self.ensure_index_with_synonym_support(index).await?;

        tracing::info!(index, count = synonyms.len(), "Updating synonyms");

        self.set_phase(index, IndexPhase::Closing);
        if let Err(e) = self.engine.close_index(index).await {
            return Err(self.fail(index, "closing the index", IndexPhase::Open, e));
        }

        if let Err(e) = self
            .engine
            .put_settings(index, &synonym_settings_body(&synonyms))
            .await
        {
            return Err(self.fail(index, "applying settings", IndexPhase::StuckClosed, e));
        }

        self.set_phase(index, IndexPhase::Reopening);
        if let Err(e) = self.engine.open_index(index).await {
            return Err(self.fail(index, "reopening the index", IndexPhase::StuckClosed, e));
        }
        self.set_phase(index, IndexPhase::Open);

        if let Err(e) = self.engine.put_mapping(index, &synonym_mapping_body()).await {
            return Err(self.fail(index, "updating mappings", IndexPhase::Open, e));
        }
        self.invalidate_mapping(index);

        self.synonyms.insert(index.to_string(), synonyms.clone());

        Ok(SynonymUpdate {
            ok: true,
            index: index.to_string(),
            synonyms,
            updated_at: Utc::now(),
        })
    }

    fn set_phase(&self, index: &str, phase: IndexPhase) {
        self.phases.insert(index.to_string(), phase);
    }

    fn fail(
        &self,
        index: &str,
        step: &'static str,
        phase: IndexPhase,
        source: EngineError,
    ) -> SifterError {
        self.set_phase(index, phase);
        tracing::error!(index, step, %phase, error = %source, "Synonym update failed");
        SifterError::IndexLifecycle {
            index: index.to_string(),
            step,
            phase,
            source,
        }
    }

    /// Lifecycle phase last recorded for `index`; `Open` if never reconfigured.
    pub fn phase(&self, index: &str) -> IndexPhase {
        self.phases
            .get(index)
            .map(|p| *p)
            .unwrap_or(IndexPhase::Open)
    }

    /// Last synonym list successfully applied to `index`.
    pub fn synonyms(&self, index: &str) -> Vec<String> {
        self.synonyms
            .get(index)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Delete `index` from the engine.
    ///
    /// Indexes the catalog does not know are rejected without contacting the
    /// engine. The catalog entry is dropped only when the engine acknowledges
    /// the deletion.
    pub async fn delete_index(&self, index: &str) -> Result<DeleteIndexResult> {
        if !self.catalog.contains(index) {
            return Err(SifterError::IndexNotFound(index.to_string()));
        }

        let response = match self.engine.delete_index(index).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                tracing::warn!(index, "Index already gone from engine, dropping from catalog");
                self.forget(index);
                return Err(SifterError::IndexNotFound(index.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let acknowledged = response
            .get("acknowledged")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !acknowledged {
            tracing::warn!(index, "Engine did not acknowledge index deletion");
            return Ok(DeleteIndexResult {
                acknowledged: false,
                message: format!("Engine did not acknowledge deletion of index '{}'", index),
            });
        }

        self.forget(index);
        tracing::info!(index, "Deleted index");
        Ok(DeleteIndexResult {
            acknowledged: true,
            message: format!("Index '{}' deleted", index),
        })
    }

    fn forget(&self, index: &str) {
        self.catalog.remove(index);
        self.invalidate_mapping(index);
        self.synonyms.remove(index);
        self.phases.remove(index);
    }

    /// Field mappings of `index`, fetched once and cached.
    ///
    /// Returns `None` when the engine cannot provide them; callers degrade
    /// rather than fail.
    pub async fn get_mapping(&self, index: &str) -> Option<Arc<IndexMapping>> {
        if let Some(cached) = self.mappings.get(index) {
            return Some(Arc::clone(&cached));
        }

        let response = match self.engine.get_mapping(index).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(index, error = %e, "Mapping unavailable");
                return None;
            }
        };

        match IndexMapping::from_response(index, &response) {
            Ok(mapping) => {
                let arc = Arc::new(mapping);
                self.mappings.insert(index.to_string(), Arc::clone(&arc));
                Some(arc)
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Unreadable mapping response");
                None
            }
        }
    }

    pub fn invalidate_mapping(&self, index: &str) {
        self.mappings.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display_matches_serialized_form() {
        for phase in [
            IndexPhase::Open,
            IndexPhase::Closing,
            IndexPhase::Reopening,
            IndexPhase::StuckClosed,
        ] {
            let serialized = serde_json::to_value(phase).unwrap();
            assert_eq!(serialized, serde_json::Value::String(phase.to_string()));
        }
    }

    #[test]
    fn test_debug_summarizes_state() {
        let engine: Arc<dyn SearchEngine> = Arc::new(
            crate::engine::ElasticClient::new(&crate::config::EngineConfig::default()).unwrap(),
        );
        let catalog = [("docs".to_string(), true)].into_iter().collect();
        let lifecycle = IndexLifecycleManager::new(engine, catalog);

        let debug = format!("{:?}", lifecycle);
        assert!(debug.starts_with("IndexLifecycleManager"));
        assert!(debug.contains("indexes: 1"));
    }
}
