use std::sync::Arc;

use crate::index::lifecycle::IndexLifecycleManager;
use crate::index::mapping::{IndexMapping, KEYWORD_SUFFIX};
use crate::types::{SortField, SortOrder};

/// Split a `field,-field` sort parameter into names and directions.
///
/// Blank tokens are ignored.
pub fn parse_sort(param: &str) -> Vec<(String, SortOrder)> {
    param.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != "-")
        .map(|token| match token.strip_prefix('-') {
            Some(field) => (field.to_string(), SortOrder::Desc),
            None => (token.to_string(), SortOrder::Asc),
        })
        .collect()
}

/// Map a requested field to a name the engine can sort on.
///
/// Free-text fields are not sortable, so a `text` field with an exact
/// sub-field sorts on that sub-field instead. Names already addressing the
/// keyword sub-field, unknown fields, and a missing mapping all pass through
/// unchanged.
pub fn resolve_field(field: &str, mapping: Option<&IndexMapping>) -> String {
    if field.ends_with(KEYWORD_SUFFIX) {
        return field.to_string();
    }
    let Some(definition) = mapping.and_then(|m| m.field(field)) else {
        return field.to_string();
    };
    match definition.keyword_subfield() {
        Some(sub) if definition.is_text() => format!("{}.{}", field, sub),
        _ => field.to_string(),
    }
}

/// Resolves sort parameters against the cached mapping of an index.
#[derive(Clone)]
pub struct SortResolver {
    lifecycle: Arc<IndexLifecycleManager>,
}

impl SortResolver {
    pub fn new(lifecycle: Arc<IndexLifecycleManager>) -> Self {
        Self { lifecycle }
    }

    pub async fn resolve(&self, index: &str, param: &str) -> Vec<SortField> {
        let requested = parse_sort(param);
        if requested.is_empty() {
            return Vec::new();
        }

        let needs_mapping = requested.iter().any(|(f, _)| !f.ends_with(KEYWORD_SUFFIX));
        let mapping = if needs_mapping {
            self.lifecycle.get_mapping(index).await
        } else {
            None
        };

        requested
            .into_iter()
            .map(|(field, order)| SortField {
                field: resolve_field(&field, mapping.as_deref()),
                order,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping() -> IndexMapping {
        IndexMapping::from_response(
            "docs",
            &json!({
                "docs": {"mappings": {"properties": {
                    "title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}},
                    "body": {"type": "text"},
                    "price": {"type": "long"},
                    "status": {"type": "keyword"}
                }}}
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("-title, price,,-"),
            vec![
                ("title".to_string(), SortOrder::Desc),
                ("price".to_string(), SortOrder::Asc)
            ]
        );
        assert!(parse_sort("").is_empty());
    }

    #[test]
    fn test_text_field_resolves_to_keyword() {
        let m = mapping();
        assert_eq!(resolve_field("title", Some(&m)), "title.keyword");
    }

    #[test]
    fn test_non_text_and_unknown_fields_unchanged() {
        let m = mapping();
        assert_eq!(resolve_field("price", Some(&m)), "price");
        assert_eq!(resolve_field("status", Some(&m)), "status");
        assert_eq!(resolve_field("body", Some(&m)), "body");
        assert_eq!(resolve_field("missing", Some(&m)), "missing");
    }

    #[test]
    fn test_keyword_suffix_used_verbatim() {
        assert_eq!(resolve_field("title.keyword", None), "title.keyword");
    }

    #[test]
    fn test_missing_mapping_falls_back() {
        assert_eq!(resolve_field("title", None), "title");
    }
}
