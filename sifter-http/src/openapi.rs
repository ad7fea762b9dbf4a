use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sifter API",
        version = "0.1.0",
        description = "Document storage and fuzzy search over Elasticsearch, with per-index synonym management.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::synonyms::get_synonyms,
        crate::handlers::synonyms::update_synonyms,
        crate::handlers::documents::save_document,
        crate::handlers::documents::update_document,
        crate::handlers::documents::delete_document,
        crate::handlers::indices::delete_index,
        crate::handlers::search::search,
    ),
    components(
        schemas(
            crate::dto::UpdateSynonymsRequest,
            crate::dto::SynonymsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "synonyms", description = "Per-index synonym rules"),
        (name = "documents", description = "Single-document writes"),
        (name = "indices", description = "Index administration"),
        (name = "search", description = "Exact and fuzzy field search")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
