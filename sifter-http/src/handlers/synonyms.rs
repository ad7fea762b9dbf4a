use axum::{
    extract::{Path, State},
    Json,
};
use sifter::{SifterError, SynonymUpdate};
use std::sync::Arc;

use super::AppState;
use crate::dto::{SynonymsResponse, UpdateSynonymsRequest};

/// Get the synonym rules last applied to an index
#[utoipa::path(
    get,
    path = "/{index}/synonyms",
    tag = "synonyms",
    params(
        ("index" = String, Path, description = "Index name")
    ),
    responses(
        (status = 200, description = "Current synonym rules", body = SynonymsResponse)
    ),
    security(
        ("token" = [])
    )
)]
pub async fn get_synonyms(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Json<SynonymsResponse> {
    let synonyms = state.lifecycle.synonyms(&index);
    Json(SynonymsResponse { index, synonyms })
}

/// Replace the synonym rules of an index
///
/// Creates the index if needed, then closes it, installs the new rules and
/// reopens it.
#[utoipa::path(
    post,
    path = "/{index}/synonyms",
    tag = "synonyms",
    params(
        ("index" = String, Path, description = "Index name")
    ),
    request_body(content = UpdateSynonymsRequest, description = "Synonym rules, bare or wrapped in {synonyms}"),
    responses(
        (status = 200, description = "Synonyms applied", body = serde_json::Value),
        (status = 500, description = "Update failed; the index may be left closed")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn update_synonyms(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    Json(req): Json<UpdateSynonymsRequest>,
) -> Result<Json<SynonymUpdate>, SifterError> {
    let update = state
        .lifecycle
        .update_synonyms(&index, req.into_synonyms())
        .await?;
    Ok(Json(update))
}
