use axum::{
    extract::{Path, State},
    Json,
};
use sifter::{DeleteIndexResult, SifterError};
use std::sync::Arc;

use super::AppState;

/// Delete an index
#[utoipa::path(
    delete,
    path = "/{index}",
    tag = "indices",
    params(
        ("index" = String, Path, description = "Index name to delete")
    ),
    responses(
        (status = 200, description = "Deletion result; `acknowledged` is false if the engine declined", body = serde_json::Value),
        (status = 404, description = "Index not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn delete_index(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<DeleteIndexResult>, SifterError> {
    Ok(Json(state.lifecycle.delete_index(&index).await?))
}
