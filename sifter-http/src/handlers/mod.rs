use sifter::{DocumentStore, IndexLifecycleManager, SearchExecutor};
use std::sync::Arc;

pub mod documents;
pub mod health;
pub mod indices;
pub mod search;
pub mod synonyms;

pub struct AppState {
    pub lifecycle: Arc<IndexLifecycleManager>,
    pub documents: DocumentStore,
    pub search: SearchExecutor,
}

impl AppState {
    pub fn new(lifecycle: Arc<IndexLifecycleManager>) -> Self {
        AppState {
            documents: DocumentStore::new(Arc::clone(&lifecycle)),
            search: SearchExecutor::new(Arc::clone(&lifecycle)),
            lifecycle,
        }
    }
}

pub use documents::{
    delete_document, delete_synonyms_document, save_document, update_document,
    update_synonyms_document,
};
pub use health::health;
pub use indices::delete_index;
pub use search::search;
pub use synonyms::{get_synonyms, update_synonyms};
