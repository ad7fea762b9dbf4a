//! The wire seam between sifter and the search engine.
//!
//! Everything above this module talks to a [`SearchEngine`]; the production
//! implementation is [`ElasticClient`], which speaks the Elasticsearch REST
//! API over `reqwest`. Tests substitute in-memory doubles.

pub mod elastic;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use elastic::ElasticClient;

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("engine returned {status}: {reason}")]
    Status {
        status: u16,
        error_type: Option<String>,
        reason: String,
        body: Value,
    },

    #[error("failed to decode engine response: {0}")]
    Decode(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The engine's error type, e.g. `index_not_found_exception`.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            EngineError::Status { error_type, .. } => error_type.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_already_exists(&self) -> bool {
        self.error_type() == Some("resource_already_exists_exception")
    }

    /// Build a status error from an engine error body.
    ///
    /// Elasticsearch reports errors as `{"error": {"type", "reason"}, "status"}`
    /// and occasionally as a bare string under `error`.
    pub fn from_response(status: u16, body: Value) -> Self {
        let (error_type, reason) = match body.get("error") {
            Some(Value::Object(err)) => (
                err.get("type").and_then(Value::as_str).map(String::from),
                err.get("reason")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| format!("status {}", status)),
            ),
            Some(Value::String(reason)) => (None, reason.clone()),
            _ => (None, format!("status {}", status)),
        };
        EngineError::Status {
            status,
            error_type,
            reason,
            body,
        }
    }
}

/// Operations sifter needs from a search engine.
///
/// Bodies are passed through as JSON in the engine's own query and settings
/// DSL; responses are returned undecoded unless the operation has an obvious
/// typed result.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> EngineResult<()>;

    /// Names of all indexes the engine currently holds.
    async fn list_indices(&self) -> EngineResult<Vec<String>>;

    async fn index_exists(&self, index: &str) -> EngineResult<bool>;

    async fn create_index(&self, index: &str, body: &Value) -> EngineResult<Value>;

    async fn close_index(&self, index: &str) -> EngineResult<Value>;

    async fn open_index(&self, index: &str) -> EngineResult<Value>;

    async fn put_settings(&self, index: &str, settings: &Value) -> EngineResult<Value>;

    async fn put_mapping(&self, index: &str, mapping: &Value) -> EngineResult<Value>;

    async fn delete_index(&self, index: &str) -> EngineResult<Value>;

    async fn get_mapping(&self, index: &str) -> EngineResult<Value>;

    /// Write or overwrite the document stored under `id`.
    async fn index_document(&self, index: &str, id: &str, body: &Value) -> EngineResult<Value>;

    /// Partial update; `body` is the engine's update envelope (`{"doc": ...}`).
    async fn update_document(&self, index: &str, id: &str, body: &Value)
        -> EngineResult<Value>;

    async fn delete_by_query(&self, index: &str, query: &Value) -> EngineResult<Value>;

    async fn search(&self, index: &str, body: &Value) -> EngineResult<Value>;
}
