use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use sifter::{ConnectionManager, EngineConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::require_token;
use crate::handlers::{
    delete_document, delete_index, delete_synonyms_document, get_synonyms, health, save_document,
    search, update_document, update_synonyms, update_synonyms_document, AppState,
};
use crate::openapi::openapi_json;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Expected `Authorization` header value; `None` leaves every route open.
    pub token: Option<String>,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            token: None,
            engine: EngineConfig::default(),
        }
    }
}

/// Assemble the HTTP routes over `state`, guarded by `token` when set.
pub fn router(state: Arc<AppState>, token: Option<String>) -> Router {
    let protected = Router::new()
        .route(
            "/:index/synonyms",
            get(get_synonyms)
                .post(update_synonyms)
                .put(update_synonyms_document)
                .delete(delete_synonyms_document),
        )
        .route("/:index/:id", put(update_document).delete(delete_document))
        .route(
            "/:index",
            get(search).post(save_document).delete(delete_index),
        )
        .with_state(state.clone());

    let health_route = Router::new()
        .route("/health", get(health))
        .with_state(state);

    let app = Router::new()
        .merge(health_route)
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(protected);

    let app = match token.filter(|t| !t.is_empty()) {
        Some(token) => {
            let token: Arc<str> = Arc::from(token);
            app.layer(middleware::from_fn(
                move |request: axum::extract::Request, next: middleware::Next| {
                    let token = Arc::clone(&token);
                    async move { require_token(request, next, &token).await }
                },
            ))
        }
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

pub async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.token.as_deref().map_or(true, str::is_empty) {
        tracing::warn!("No TOKEN set, all routes unprotected");
    }

    let lifecycle = ConnectionManager::new(config.engine.clone())
        .bootstrap()
        .await?;
    let state = Arc::new(AppState::new(lifecycle));
    let app = router(state, config.token.clone());

    tracing::info!("Starting Sifter server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
