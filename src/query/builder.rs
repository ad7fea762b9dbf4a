use serde_json::{json, Map, Value};

use crate::index::analysis::TEXT_SYNONYMS_FIELD;
use crate::types::{FieldFilter, FilterValue, MatchMode, Pagination, SortField, SortOrder};

pub const HIGHLIGHT_PRE_TAG: &str = "**";
pub const HIGHLIGHT_POST_TAG: &str = "**";

/// Composes an engine search body from tagged field filters.
///
/// Exact filters become required `term`/`terms` clauses. Each fuzzy filter
/// contributes three alternatives to the `should` set: a fuzzy `match` on the
/// field, a `match` on `text_synonyms`, and a case-insensitive `*value*`
/// wildcard on the field with the value's own `*` and `?` taken literally.
/// At least one alternative must match whenever a fuzzy filter is present.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pagination: Pagination,
    must: Vec<Value>,
    should: Vec<Value>,
    highlight_fields: Vec<String>,
    sort: Vec<SortField>,
}

impl QueryBuilder {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Default::default()
        }
    }

    pub fn filters(mut self, filters: &[FieldFilter]) -> Self {
        for filter in filters {
            self.add_filter(filter);
        }
        self
    }

    pub fn sort(mut self, sort: Vec<SortField>) -> Self {
        self.sort = sort;
        self
    }

    pub fn add_filter(&mut self, filter: &FieldFilter) {
        match filter.mode {
            MatchMode::Exact => self.add_exact(&filter.field, &filter.value),
            MatchMode::Fuzzy => self.add_fuzzy(&filter.field, &filter.value),
        }
    }

    fn add_exact(&mut self, field: &str, value: &FilterValue) {
        let clause = match value {
            FilterValue::List(values) => json!({ "terms": { field: values } }),
            FilterValue::Scalar(value) => json!({ "term": { field: value } }),
        };
        self.must.push(clause);
    }

    fn add_fuzzy(&mut self, field: &str, value: &FilterValue) {
        let values: &[Value] = match value {
            FilterValue::Scalar(v) => std::slice::from_ref(v),
            FilterValue::List(vs) => vs,
        };

        for value in values {
            self.should.push(json!({
                "match": { field: { "query": value, "fuzziness": "AUTO" } }
            }));
            self.should.push(json!({
                "match": { TEXT_SYNONYMS_FIELD: { "query": value } }
            }));
            self.should.push(json!({
                "wildcard": {
                    field: {
                        "value": format!("*{}*", escape_wildcard(&scalar_text(value))),
                        "case_insensitive": true
                    }
                }
            }));
        }

        if !self.highlight_fields.iter().any(|f| f == field) {
            self.highlight_fields.push(field.to_string());
        }
    }

    /// The boolean query alone.
    pub fn query(&self) -> Value {
        let minimum_should_match = if self.should.is_empty() { 0 } else { 1 };
        json!({
            "bool": {
                "must": self.must,
                "should": self.should,
                "minimum_should_match": minimum_should_match
            }
        })
    }

    pub fn highlight(&self) -> Value {
        let mut fields = Map::new();
        fields.insert(TEXT_SYNONYMS_FIELD.to_string(), json!({}));
        for field in &self.highlight_fields {
            fields.insert(field.clone(), json!({}));
        }
        json!({
            "fields": fields,
            "pre_tags": [HIGHLIGHT_PRE_TAG],
            "post_tags": [HIGHLIGHT_POST_TAG]
        })
    }

    pub fn build(&self) -> Value {
        let mut body = json!({
            "from": self.pagination.offset(),
            "size": self.pagination.size,
            "query": self.query(),
            "highlight": self.highlight()
        });

        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|s| {
                    let order = match s.order {
                        SortOrder::Asc => "asc",
                        SortOrder::Desc => "desc",
                    };
                    json!({ s.field.as_str(): { "order": order } })
                })
                .collect();
            body["sort"] = Value::Array(sort);
        }
        body
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_wildcard(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(field: &str, value: Value) -> FieldFilter {
        FieldFilter {
            field: field.into(),
            mode: MatchMode::Exact,
            value: FilterValue::Scalar(value),
        }
    }

    fn fuzzy(field: &str, value: &str) -> FieldFilter {
        FieldFilter {
            field: field.into(),
            mode: MatchMode::Fuzzy,
            value: FilterValue::Scalar(json!(value)),
        }
    }

    #[test]
    fn test_exact_and_fuzzy_partition() {
        let body = QueryBuilder::new(Pagination::default())
            .filters(&[exact("category", json!("book")), fuzzy("title", "quick")])
            .build();

        let bool_query = &body["query"]["bool"];
        assert_eq!(bool_query["must"], json!([{"term": {"category": "book"}}]));
        assert_eq!(bool_query["minimum_should_match"], 1);
        assert_eq!(
            bool_query["should"],
            json!([
                {"match": {"title": {"query": "quick", "fuzziness": "AUTO"}}},
                {"match": {"text_synonyms": {"query": "quick"}}},
                {"wildcard": {"title": {"value": "*quick*", "case_insensitive": true}}}
            ])
        );
    }

    #[test]
    fn test_no_fuzzy_fields_relaxes_should() {
        let body = QueryBuilder::new(Pagination::default())
            .filters(&[exact("category", json!("book"))])
            .build();
        assert_eq!(body["query"]["bool"]["minimum_should_match"], 0);
        assert_eq!(body["query"]["bool"]["should"], json!([]));
    }

    #[test]
    fn test_list_value_becomes_terms() {
        let filter = FieldFilter {
            field: "tag".into(),
            mode: MatchMode::Exact,
            value: FilterValue::List(vec![json!("a"), json!("b")]),
        };
        let body = QueryBuilder::new(Pagination::default())
            .filters(&[filter])
            .build();
        assert_eq!(
            body["query"]["bool"]["must"],
            json!([{"terms": {"tag": ["a", "b"]}}])
        );
    }

    #[test]
    fn test_fuzzy_list_expands_each_value() {
        let filter = FieldFilter {
            field: "title".into(),
            mode: MatchMode::Fuzzy,
            value: FilterValue::List(vec![json!("fast"), json!(42)]),
        };
        let builder = QueryBuilder::new(Pagination::default()).filters(&[filter]);
        let should = builder.query()["bool"]["should"].as_array().unwrap().clone();
        assert_eq!(should.len(), 6);
        assert_eq!(
            should[5],
            json!({"wildcard": {"title": {"value": "*42*", "case_insensitive": true}}})
        );
        assert_eq!(builder.highlight()["fields"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_wildcard_escapes_pattern_characters() {
        let body = QueryBuilder::new(Pagination::default())
            .filters(&[fuzzy("title", r"C*Sharp?\x")])
            .build();
        let wildcard = &body["query"]["bool"]["should"][2]["wildcard"]["title"];
        assert_eq!(wildcard["value"], r"*C\*Sharp\?\\x*");
        assert_eq!(wildcard["case_insensitive"], true);
    }

    #[test]
    fn test_highlight_fields_and_tags() {
        let highlight = QueryBuilder::new(Pagination::default())
            .filters(&[fuzzy("title", "a"), fuzzy("body", "b"), fuzzy("title", "c")])
            .highlight();
        let fields: Vec<&String> = highlight["fields"].as_object().unwrap().keys().collect();
        assert_eq!(fields, vec!["text_synonyms", "title", "body"]);
        assert_eq!(highlight["pre_tags"], json!(["**"]));
        assert_eq!(highlight["post_tags"], json!(["**"]));
    }

    #[test]
    fn test_pagination_and_sort() {
        let body = QueryBuilder::new(Pagination::new(2, 25))
            .sort(vec![
                SortField {
                    field: "title.keyword".into(),
                    order: SortOrder::Desc,
                },
                SortField {
                    field: "price".into(),
                    order: SortOrder::Asc,
                },
            ])
            .build();
        assert_eq!(body["from"], 25);
        assert_eq!(body["size"], 25);
        assert_eq!(
            body["sort"],
            json!([{"title.keyword": {"order": "desc"}}, {"price": {"order": "asc"}}])
        );
    }

    #[test]
    fn test_no_sort_key_without_sort() {
        let body = QueryBuilder::new(Pagination::default()).build();
        assert!(body.get("sort").is_none());
    }
}
