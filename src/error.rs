use http::StatusCode;
use thiserror::Error;

use crate::engine::EngineError;
use crate::index::lifecycle::IndexPhase;

#[derive(Error, Debug, Clone)]
pub enum SifterError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Document {id} not found in index {index}")]
    DocumentNotFound { index: String, id: String },

    #[error("Failed to create index {index}: {source}")]
    IndexCreation {
        index: String,
        #[source]
        source: EngineError,
    },

    #[error("Synonym update on index {index} failed while {step} (index left {phase}): {source}")]
    IndexLifecycle {
        index: String,
        step: &'static str,
        phase: IndexPhase,
        #[source]
        source: EngineError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, SifterError>;

impl From<serde_json::Error> for SifterError {
    fn from(e: serde_json::Error) -> Self {
        SifterError::InvalidRequest(e.to_string())
    }
}

impl SifterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SifterError::IndexNotFound(_) => StatusCode::NOT_FOUND,
            SifterError::DocumentNotFound { .. } => StatusCode::NOT_FOUND,
            SifterError::IndexCreation { source, .. } => match source.status() {
                Some(s) if (400..500).contains(&s) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            SifterError::IndexLifecycle { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            SifterError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SifterError::MissingField(_) => StatusCode::BAD_REQUEST,
            SifterError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SifterError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SifterError::IndexNotFound(_) => "index_not_found",
            SifterError::DocumentNotFound { .. } => "document_not_found",
            SifterError::IndexCreation { .. } => "index_creation_failed",
            SifterError::IndexLifecycle { .. } => "index_lifecycle_failed",
            SifterError::InvalidRequest(_) => "invalid_request",
            SifterError::MissingField(_) => "missing_field",
            SifterError::Config(_) => "config_error",
            SifterError::Engine(_) => "internal_error",
        }
    }
}

// Axum IntoResponse implementation (feature-gated)
#[cfg(feature = "axum-support")]
use axum::response::{IntoResponse, Json, Response};
#[cfg(feature = "axum-support")]
use serde::Serialize;

#[cfg(feature = "axum-support")]
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(feature = "axum-support")]
impl IntoResponse for SifterError {
    fn into_response(self) -> Response {
        let suggestion = match &self {
            SifterError::IndexLifecycle {
                index,
                phase: IndexPhase::StuckClosed,
                ..
            } => Some(format!(
                "Index '{}' is closed; retry the synonym update or open it manually",
                index
            )),
            SifterError::IndexNotFound(_) => {
                Some("Save a document or update synonyms to create the index".to_string())
            }
            _ => None,
        };

        if matches!(&self, SifterError::Engine(_) | SifterError::IndexLifecycle { .. }) {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            request_id: format!("req_sf_{}", uuid::Uuid::new_v4()),
            suggestion,
        };

        (self.status_code(), Json(body)).into_response()
    }
}
