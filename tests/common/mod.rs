#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use sifter::engine::{EngineError, EngineResult, SearchEngine};
use sifter::IndexLifecycleManager;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One engine call as seen by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ping,
    ListIndices,
    IndexExists(String),
    CreateIndex(String, Value),
    CloseIndex(String),
    OpenIndex(String),
    PutSettings(String, Value),
    PutMapping(String, Value),
    DeleteIndex(String),
    GetMapping(String),
    IndexDocument(String, String, Value),
    UpdateDocument(String, String, Value),
    DeleteByQuery(String, Value),
    Search(String, Value),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Ping => "ping",
            Call::ListIndices => "list_indices",
            Call::IndexExists(_) => "index_exists",
            Call::CreateIndex(..) => "create_index",
            Call::CloseIndex(_) => "close_index",
            Call::OpenIndex(_) => "open_index",
            Call::PutSettings(..) => "put_settings",
            Call::PutMapping(..) => "put_mapping",
            Call::DeleteIndex(_) => "delete_index",
            Call::GetMapping(_) => "get_mapping",
            Call::IndexDocument(..) => "index_document",
            Call::UpdateDocument(..) => "update_document",
            Call::DeleteByQuery(..) => "delete_by_query",
            Call::Search(..) => "search",
        }
    }
}

/// In-memory engine that records every call and holds a set of index names.
///
/// Failures are injected per operation name (see [`Call::name`]).
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<Call>>,
    indices: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<&'static str, EngineError>>,
    mappings: Mutex<HashMap<String, Value>>,
    search_response: Mutex<Option<Value>>,
    refuse_delete: AtomicBool,
    create_delay: Mutex<Option<Duration>>,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_indices(names: &[&str]) -> Arc<Self> {
        let engine = Self::default();
        {
            let mut indices = engine.indices.lock().unwrap();
            for name in names {
                indices.insert(name.to_string());
            }
        }
        Arc::new(engine)
    }

    pub fn fail(&self, op: &'static str, error: EngineError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    pub fn set_mapping(&self, index: &str, response: Value) {
        self.mappings.lock().unwrap().insert(index.to_string(), response);
    }

    pub fn set_search_response(&self, response: Value) {
        *self.search_response.lock().unwrap() = Some(response);
    }

    pub fn refuse_delete(&self) {
        self.refuse_delete.store(true, Ordering::SeqCst);
    }

    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indices.lock().unwrap().contains(index)
    }

    fn record(&self, call: Call) -> EngineResult<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn require_index(&self, index: &str) -> EngineResult<()> {
        if self.has_index(index) {
            Ok(())
        } else {
            Err(status_error(404, "index_not_found_exception"))
        }
    }
}

pub fn status_error(status: u16, error_type: &str) -> EngineError {
    EngineError::from_response(
        status,
        json!({"error": {"type": error_type, "reason": format!("{} raised", error_type)}, "status": status}),
    )
}

fn acknowledged() -> Value {
    json!({"acknowledged": true})
}

#[async_trait]
impl SearchEngine for RecordingEngine {
    async fn ping(&self) -> EngineResult<()> {
        self.record(Call::Ping)
    }

    async fn list_indices(&self) -> EngineResult<Vec<String>> {
        self.record(Call::ListIndices)?;
        let mut names: Vec<String> = self.indices.lock().unwrap().iter().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn index_exists(&self, index: &str) -> EngineResult<bool> {
        self.record(Call::IndexExists(index.to_string()))?;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str, body: &Value) -> EngineResult<Value> {
        self.record(Call::CreateIndex(index.to_string(), body.clone()))?;
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if !self.indices.lock().unwrap().insert(index.to_string()) {
            return Err(status_error(400, "resource_already_exists_exception"));
        }
        Ok(json!({"acknowledged": true, "index": index}))
    }

    async fn close_index(&self, index: &str) -> EngineResult<Value> {
        self.record(Call::CloseIndex(index.to_string()))?;
        self.require_index(index)?;
        Ok(acknowledged())
    }

    async fn open_index(&self, index: &str) -> EngineResult<Value> {
        self.record(Call::OpenIndex(index.to_string()))?;
        self.require_index(index)?;
        Ok(acknowledged())
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> EngineResult<Value> {
        self.record(Call::PutSettings(index.to_string(), settings.clone()))?;
        Ok(acknowledged())
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> EngineResult<Value> {
        self.record(Call::PutMapping(index.to_string(), mapping.clone()))?;
        Ok(acknowledged())
    }

    async fn delete_index(&self, index: &str) -> EngineResult<Value> {
        self.record(Call::DeleteIndex(index.to_string()))?;
        self.require_index(index)?;
        if self.refuse_delete.load(Ordering::SeqCst) {
            return Ok(json!({"acknowledged": false}));
        }
        self.indices.lock().unwrap().remove(index);
        Ok(acknowledged())
    }

    async fn get_mapping(&self, index: &str) -> EngineResult<Value> {
        self.record(Call::GetMapping(index.to_string()))?;
        self.require_index(index)?;
        Ok(self
            .mappings
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or_else(|| json!({ index: {"mappings": {}} })))
    }

    async fn index_document(&self, index: &str, id: &str, body: &Value) -> EngineResult<Value> {
        self.record(Call::IndexDocument(index.to_string(), id.to_string(), body.clone()))?;
        Ok(json!({"_index": index, "_id": id, "result": "created"}))
    }

    async fn update_document(&self, index: &str, id: &str, body: &Value) -> EngineResult<Value> {
        self.record(Call::UpdateDocument(index.to_string(), id.to_string(), body.clone()))?;
        Ok(json!({"_index": index, "_id": id, "result": "updated"}))
    }

    async fn delete_by_query(&self, index: &str, query: &Value) -> EngineResult<Value> {
        self.record(Call::DeleteByQuery(index.to_string(), query.clone()))?;
        self.require_index(index)?;
        Ok(json!({"deleted": 1, "failures": []}))
    }

    async fn search(&self, index: &str, body: &Value) -> EngineResult<Value> {
        self.record(Call::Search(index.to_string(), body.clone()))?;
        self.require_index(index)?;
        Ok(self
            .search_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| json!({"hits": {"total": {"value": 0}, "hits": []}})))
    }
}

/// Lifecycle manager over `engine`, with the catalog seeded from the
/// engine's current index set.
pub async fn lifecycle_for(engine: &Arc<RecordingEngine>) -> Arc<IndexLifecycleManager> {
    let catalog = sifter::ConnectionManager::load_catalog(engine.as_ref())
        .await
        .unwrap();
    engine.clear_calls();
    IndexLifecycleManager::new(engine.clone(), catalog)
}

/// Serve the full router over `engine` on an ephemeral port.
pub async fn spawn_server(engine: &Arc<RecordingEngine>, token: Option<&str>) -> String {
    let lifecycle = lifecycle_for(engine).await;
    let state = Arc::new(sifter_http::handlers::AppState::new(lifecycle));
    let app = sifter_http::router(state, token.map(String::from));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    addr
}
