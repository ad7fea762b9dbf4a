use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use sifter::query::parse_query_pairs;
use sifter::SifterError;
use std::sync::Arc;

use super::AppState;

/// Search an index
///
/// `page`, `size` and `sort` control paging and ordering. Every other
/// parameter filters on the field it names: exactly, or fuzzily when the
/// name starts with `_`. Repeating a parameter matches any of its values.
#[utoipa::path(
    get,
    path = "/{index}",
    tag = "search",
    params(
        ("index" = String, Path, description = "Index name"),
        ("page" = Option<usize>, Query, description = "1-based page number (default 1)"),
        ("size" = Option<usize>, Query, description = "Hits per page (default 10)"),
        ("sort" = Option<String>, Query, description = "Comma-separated fields, `-` prefix for descending"),
        ("search" = Option<String>, Query, description = "Fuzzy match on `text`")
    ),
    responses(
        (status = 200, description = "Raw engine hits with highlights", body = serde_json::Value),
        (status = 400, description = "Malformed parameters"),
        (status = 404, description = "Index not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, SifterError> {
    let request = parse_query_pairs(&index, &params)?;
    let hits = state.search.search(&request).await?;
    Ok(Json(hits))
}
