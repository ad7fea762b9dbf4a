//! Partitioning of raw request fields into exact and fuzzy filters.

use serde_json::{Map, Value};

use crate::error::{Result, SifterError};
use crate::index::analysis::TEXT_FIELD;
use crate::types::{
    FieldFilter, FilterValue, MatchMode, Pagination, SearchRequest, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE, FUZZY_PREFIX,
};

/// Classify one request field.
///
/// `_name` becomes a fuzzy filter on `name`; anything else is exact. Null
/// and empty-string values carry no constraint and yield `None`.
pub fn parse_field(name: &str, value: &Value) -> Result<Option<FieldFilter>> {
    let (field, mode) = match name.strip_prefix(FUZZY_PREFIX) {
        Some(stripped) => (stripped, MatchMode::Fuzzy),
        None => (name, MatchMode::Exact),
    };
    if field.is_empty() {
        return Err(SifterError::InvalidRequest(format!(
            "Invalid filter field name '{}'",
            name
        )));
    }

    let value = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::Object(_) => {
            return Err(SifterError::InvalidRequest(format!(
                "Filter '{}' must be a scalar or a list",
                name
            )))
        }
        Value::Array(items) => {
            let items: Vec<Value> = items.iter().filter(|v| !v.is_null()).cloned().collect();
            if items.is_empty() {
                return Ok(None);
            }
            if items.iter().any(|v| v.is_object() || v.is_array()) {
                return Err(SifterError::InvalidRequest(format!(
                    "Filter '{}' list must contain only scalars",
                    name
                )));
            }
            FilterValue::List(items)
        }
        scalar => FilterValue::Scalar(scalar.clone()),
    };

    Ok(Some(FieldFilter {
        field: field.to_string(),
        mode,
        value,
    }))
}

/// Parse a flat request map into tagged filters, preserving field order.
pub fn parse_filters(fields: &Map<String, Value>) -> Result<Vec<FieldFilter>> {
    let mut filters = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if let Some(filter) = parse_field(name, value)? {
            filters.push(filter);
        }
    }
    Ok(filters)
}

/// Build a [`SearchRequest`] from URL query pairs.
///
/// `page`, `size` and `sort` are request parameters; `search` is shorthand
/// for a fuzzy filter on the `text` field. Repeated keys form a list value.
pub fn parse_query_pairs(index: &str, pairs: &[(String, String)]) -> Result<SearchRequest> {
    let mut page = DEFAULT_PAGE;
    let mut size = DEFAULT_PAGE_SIZE;
    let mut sort = None;
    let mut fields: Map<String, Value> = Map::new();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => page = parse_number("page", value)?,
            "size" => size = parse_number("size", value)?,
            "sort" => sort = Some(value.clone()).filter(|s| !s.is_empty()),
            "search" => push_value(&mut fields, &format!("{}{}", FUZZY_PREFIX, TEXT_FIELD), value),
            _ => push_value(&mut fields, key, value),
        }
    }

    Ok(SearchRequest {
        index: index.to_string(),
        pagination: Pagination::new(page, size),
        sort,
        filters: parse_filters(&fields)?,
    })
}

fn parse_number(name: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        SifterError::InvalidRequest(format!("'{}' must be a non-negative integer, got '{}'", name, value))
    })
}

fn push_value(fields: &mut Map<String, Value>, key: &str, value: &str) {
    let value = Value::String(value.to_string());
    match fields.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key.to_string(), value);
        }
    }
}
