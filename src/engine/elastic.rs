use async_trait::async_trait;
use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use std::io::Write;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use super::{EngineError, EngineResult, SearchEngine};
use crate::config::{EngineAuth, EngineConfig};

/// HTTP client for a single Elasticsearch-compatible node.
///
/// With compression on, request bodies are sent gzip-encoded and gzip
/// responses are accepted.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    base_url: String,
    http_client: reqwest::Client,
    compression: bool,
}

impl ElasticClient {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = config.auth() {
            headers.insert(AUTHORIZATION, auth_header(&auth)?);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.reject_unauthorized)
            .gzip(config.compression)
            .build()
            .map_err(|e| EngineError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.node.trim_end_matches('/').to_string(),
            http_client,
            compression: config.compression,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "engine request");
        self.http_client.request(method, url)
    }

    fn with_json(&self, request: RequestBuilder, body: &Value) -> EngineResult<RequestBuilder> {
        if !self.compression {
            return Ok(request.json(body));
        }
        let raw = serde_json::to_vec(body).map_err(|e| EngineError::Decode(e.to_string()))?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&raw)
            .map_err(|e| EngineError::Transport(format!("Failed to compress request body: {}", e)))?;
        let compressed = encoder
            .finish()
            .map_err(|e| EngineError::Transport(format!("Failed to compress request body: {}", e)))?;
        Ok(request
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_ENCODING, "gzip")
            .body(compressed))
    }

    async fn send(&self, request: RequestBuilder) -> EngineResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("Request to {} failed: {}", self.base_url, e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Transport(format!("Failed to read response: {}", e)))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(v) => v,
                Err(e) if status.is_success() => {
                    return Err(EngineError::Decode(format!("{} (status {})", e, status)))
                }
                Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            }
        };

        if !status.is_success() {
            return Err(EngineError::from_response(status.as_u16(), body));
        }
        Ok(body)
    }
}

fn auth_header(auth: &EngineAuth) -> EngineResult<HeaderValue> {
    let raw = match auth {
        EngineAuth::Basic { username, password } => format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password))
        ),
        EngineAuth::ApiKey(key) => format!("ApiKey {}", key),
        EngineAuth::Bearer(token) => format!("Bearer {}", token),
    };
    let mut value = HeaderValue::from_str(&raw)
        .map_err(|_| EngineError::Transport("Credentials contain invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl SearchEngine for ElasticClient {
    async fn ping(&self) -> EngineResult<()> {
        self.send(self.request(Method::GET, &[])).await.map(|_| ())
    }

    async fn list_indices(&self) -> EngineResult<Vec<String>> {
        let body = self
            .send(
                self.request(Method::GET, &["_cat", "indices"])
                    .query(&[("format", "json")]),
            )
            .await?;

        let rows = body
            .as_array()
            .ok_or_else(|| EngineError::Decode("expected an array from _cat/indices".to_string()))?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("index").and_then(Value::as_str))
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect())
    }

    async fn index_exists(&self, index: &str) -> EngineResult<bool> {
        let response = self
            .request(Method::HEAD, &[index])
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("Request to {} failed: {}", self.base_url, e)))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(EngineError::from_response(other.as_u16(), Value::Null)),
        }
    }

    async fn create_index(&self, index: &str, body: &Value) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::PUT, &[index]), body)?).await
    }

    async fn close_index(&self, index: &str) -> EngineResult<Value> {
        self.send(self.request(Method::POST, &[index, "_close"])).await
    }

    async fn open_index(&self, index: &str) -> EngineResult<Value> {
        self.send(self.request(Method::POST, &[index, "_open"])).await
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::PUT, &[index, "_settings"]), settings)?)
            .await
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::PUT, &[index, "_mapping"]), mapping)?)
            .await
    }

    async fn delete_index(&self, index: &str) -> EngineResult<Value> {
        self.send(self.request(Method::DELETE, &[index])).await
    }

    async fn get_mapping(&self, index: &str) -> EngineResult<Value> {
        self.send(self.request(Method::GET, &[index, "_mapping"])).await
    }

    async fn index_document(&self, index: &str, id: &str, body: &Value) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::PUT, &[index, "_doc", id]), body)?)
            .await
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::POST, &[index, "_update", id]), body)?)
            .await
    }

    async fn delete_by_query(&self, index: &str, query: &Value) -> EngineResult<Value> {
        let request = self.request(Method::POST, &[index, "_delete_by_query"]);
        self.send(self.with_json(request, query)?).await
    }

    async fn search(&self, index: &str, body: &Value) -> EngineResult<Value> {
        self.send(self.with_json(self.request(Method::POST, &[index, "_search"]), body)?)
            .await
    }
}
