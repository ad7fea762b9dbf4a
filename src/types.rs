use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::index::analysis::{TEXT_FIELD, TEXT_SYNONYMS_FIELD};

/// Index identifier, a plain string like `"docs"`.
pub type IndexName = String;
/// Caller-supplied document identifier.
pub type DocumentId = String;

/// Field names starting with this character request fuzzy matching.
pub const FUZZY_PREFIX: char = '_';

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A document with a caller-supplied id and arbitrary fields.
///
/// No schema is enforced here; the engine maps fields on first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Parse a [`Document`] from a JSON object carrying an `id` key.
    ///
    /// Numeric ids are accepted and stringified. Every other key becomes a
    /// field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SifterError::InvalidRequest`] if the value is not an
    /// object, or [`crate::SifterError::MissingField`] if `id` is absent.
    pub fn from_json(json: &Value) -> crate::error::Result<Self> {
        use crate::error::SifterError;

        let obj = json
            .as_object()
            .ok_or_else(|| SifterError::InvalidRequest("Expected JSON object".to_string()))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(SifterError::MissingField("id".to_string())),
        };

        let fields = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "id")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Document { id, fields })
    }

    /// Body stored in the engine: the fields plus `id`, with `text` mirrored
    /// into `text_synonyms`.
    pub fn to_body(&self) -> Value {
        let mut body = with_synonym_mirror(&self.fields);
        body.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(body)
    }
}

/// Copy `text` into `text_synonyms` so the synonym-analyzed field is populated.
pub fn with_synonym_mirror(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut out = fields.clone();
    if let Some(text) = fields.get(TEXT_FIELD) {
        out.insert(TEXT_SYNONYMS_FIELD.to_string(), text.clone());
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A sort directive after field resolution, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Offset of the first hit: `(page - 1) * size`. Page 0 is treated as page 1.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(Value),
    List(Vec<Value>),
}

/// One request field after partitioning by the fuzzy-prefix convention.
///
/// `field` never carries the prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub mode: MatchMode,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: IndexName,
    pub pagination: Pagination,
    /// Raw sort parameter: comma-separated `field` / `-field` tokens.
    pub sort: Option<String>,
    pub filters: Vec<FieldFilter>,
}

impl SearchRequest {
    pub fn new(index: impl Into<IndexName>) -> Self {
        Self {
            index: index.into(),
            pagination: Pagination::default(),
            sort: None,
            filters: Vec::new(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_filters(mut self, filters: Vec<FieldFilter>) -> Self {
        self.filters = filters;
        self
    }
}

/// Acknowledgement returned by a successful synonym update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymUpdate {
    pub ok: bool,
    pub index: IndexName,
    pub synonyms: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an index deletion that reached the engine.
///
/// A non-acknowledged deletion is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteIndexResult {
    pub acknowledged: bool,
    pub message: String,
}
