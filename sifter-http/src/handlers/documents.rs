use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use sifter::{Document, SifterError};
use std::sync::Arc;

use super::AppState;

/// Save a document
#[utoipa::path(
    post,
    path = "/{index}",
    tag = "documents",
    params(
        ("index" = String, Path, description = "Index name, created on first write")
    ),
    request_body(content = serde_json::Value, description = "Document with an `id` and arbitrary fields"),
    responses(
        (status = 200, description = "Engine acknowledgement", body = serde_json::Value),
        (status = 400, description = "Missing id or malformed body")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn save_document(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, SifterError> {
    let document = Document::from_json(&body)?;
    let response = state.documents.save(&index, &document).await?;
    Ok(Json(response))
}

/// Partially update a document
#[utoipa::path(
    put,
    path = "/{index}/{id}",
    tag = "documents",
    params(
        ("index" = String, Path, description = "Index name"),
        ("id" = String, Path, description = "Document id")
    ),
    request_body(content = serde_json::Value, description = "Fields to merge onto the stored document"),
    responses(
        (status = 200, description = "Engine acknowledgement", body = serde_json::Value),
        (status = 404, description = "Document not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path((index, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, SifterError> {
    apply_update(&state, &index, &id, body).await
}

async fn apply_update(
    state: &AppState,
    index: &str,
    id: &str,
    body: Value,
) -> Result<Json<Value>, SifterError> {
    let mut fields = match body {
        Value::Object(map) => map,
        _ => return Err(SifterError::InvalidRequest("Expected JSON object".to_string())),
    };
    // The path names the document; an id in the body is not a field.
    fields.remove("id");

    let response = state.documents.update(index, id, &fields).await?;
    Ok(Json(response))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/{index}/{id}",
    tag = "documents",
    params(
        ("index" = String, Path, description = "Index name"),
        ("id" = String, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "Delete-by-query result", body = serde_json::Value),
        (status = 404, description = "Index not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path((index, id)): Path<(String, String)>,
) -> Result<Json<Value>, SifterError> {
    let response = state.documents.delete(&index, &id).await?;
    Ok(Json(response))
}

/// `PUT /{index}/synonyms` addressed at a document whose id is `synonyms`.
///
/// The synonym route shadows `/{index}/{id}` for that id, so the write
/// methods it does not use are forwarded here.
pub async fn update_synonyms_document(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, SifterError> {
    apply_update(&state, &index, SYNONYMS_SEGMENT, body).await
}

pub async fn delete_synonyms_document(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<Value>, SifterError> {
    let response = state.documents.delete(&index, SYNONYMS_SEGMENT).await?;
    Ok(Json(response))
}

const SYNONYMS_SEGMENT: &str = "synonyms";
