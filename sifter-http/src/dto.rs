use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /:index/synonyms`: either a bare list of synonym rules or
/// an object wrapping one.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UpdateSynonymsRequest {
    List(Vec<String>),
    Wrapped { synonyms: Vec<String> },
}

impl UpdateSynonymsRequest {
    pub fn into_synonyms(self) -> Vec<String> {
        match self {
            UpdateSynonymsRequest::List(synonyms) => synonyms,
            UpdateSynonymsRequest::Wrapped { synonyms } => synonyms,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SynonymsResponse {
    pub index: String,
    pub synonyms: Vec<String>,
}
