//! # Sifter
//!
//! Search-index orchestration over an Elasticsearch-compatible engine.
//!
//! Sifter turns flat document and search requests into engine calls. Writes
//! auto-create their index with synonym-capable analysis; searches partition
//! request fields into exact and fuzzy clauses; synonym updates run the
//! close → reconfigure → reopen sequence the engine requires.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sifter::query::parse_query_pairs;
//! use sifter::{ConnectionManager, Document, DocumentStore, EngineConfig, SearchExecutor};
//! use serde_json::json;
//!
//! # async fn run() -> sifter::Result<()> {
//! let lifecycle = ConnectionManager::new(EngineConfig::from_env()).bootstrap().await?;
//! let documents = DocumentStore::new(lifecycle.clone());
//! let search = SearchExecutor::new(lifecycle.clone());
//!
//! let doc = Document::from_json(&json!({"id": "1", "title": "fast search"}))?;
//! documents.save("docs", &doc).await?;
//!
//! lifecycle.update_synonyms("docs", vec!["fast, quick".into()]).await?;
//!
//! let request = parse_query_pairs("docs", &[("_title".into(), "search".into())])?;
//! let hits = search.search(&request).await?;
//! println!("{} hits", hits.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Dependencies | Use case |
//! |---------|-------------|----------|
//! | `axum-support` | axum | [`SifterError`] implements `IntoResponse` |

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod types;

pub use config::{EngineAuth, EngineConfig};
pub use connection::ConnectionManager;
pub use engine::{ElasticClient, EngineError, SearchEngine};
pub use error::{Result, SifterError};
pub use index::{DocumentStore, IndexLifecycleManager, IndexPhase};
pub use query::{QueryBuilder, SearchExecutor, SortResolver};
pub use types::*;
