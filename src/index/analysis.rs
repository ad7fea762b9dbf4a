//! Analysis settings and mappings installed on synonym-capable indexes.

use serde_json::{json, Value};

/// Conventional free-text field analyzed with the default analyzer.
pub const TEXT_FIELD: &str = "text";
/// Companion of [`TEXT_FIELD`] searched through the synonym analyzer.
pub const TEXT_SYNONYMS_FIELD: &str = "text_synonyms";

pub const SYNONYM_FILTER: &str = "synonym_filter";
pub const SYNONYM_ANALYZER: &str = "synonym_analyzer";
pub const DEFAULT_ANALYZER: &str = "default_analyzer";

fn synonym_analyzer() -> Value {
    json!({
        "type": "custom",
        "tokenizer": "standard",
        "filter": ["lowercase", SYNONYM_FILTER]
    })
}

/// Body for creating an index with an empty synonym filter wired into the
/// search-time analyzer of [`TEXT_FIELD`].
pub fn create_index_body() -> Value {
    json!({
        "settings": {
            "analysis": {
                "filter": {
                    SYNONYM_FILTER: {
                        "type": "synonym",
                        "synonyms": []
                    }
                },
                "analyzer": {
                    SYNONYM_ANALYZER: synonym_analyzer(),
                    DEFAULT_ANALYZER: { "type": "standard" }
                }
            }
        },
        "mappings": {
            "properties": {
                TEXT_FIELD: {
                    "type": "text",
                    "analyzer": DEFAULT_ANALYZER,
                    "search_analyzer": SYNONYM_ANALYZER
                }
            }
        }
    })
}

/// Settings applied while the index is closed. The filter is marked
/// updateable so the engine can reload it on later changes.
pub fn synonym_settings_body(synonyms: &[String]) -> Value {
    json!({
        "analysis": {
            "filter": {
                SYNONYM_FILTER: {
                    "type": "synonym",
                    "updateable": true,
                    "synonyms": synonyms
                }
            },
            "analyzer": {
                SYNONYM_ANALYZER: synonym_analyzer(),
                DEFAULT_ANALYZER: { "type": "standard" }
            }
        }
    })
}

/// Mapping applied once the index is open again.
///
/// Updateable synonym filters may only run at search time, so
/// [`TEXT_SYNONYMS_FIELD`] indexes with the default analyzer and searches
/// with the synonym analyzer.
pub fn synonym_mapping_body() -> Value {
    json!({
        "properties": {
            TEXT_FIELD: {
                "type": "text",
                "analyzer": DEFAULT_ANALYZER,
                "search_analyzer": SYNONYM_ANALYZER
            },
            TEXT_SYNONYMS_FIELD: {
                "type": "text",
                "analyzer": DEFAULT_ANALYZER,
                "search_analyzer": SYNONYM_ANALYZER
            }
        }
    })
}
