use std::time::Duration;

pub const DEFAULT_NODE: &str = "http://localhost:9200";
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Credentials sent with every engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAuth {
    Basic { username: String, password: String },
    ApiKey(String),
    Bearer(String),
}

/// Connection settings for the search engine, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine node, e.g. `http://localhost:9200`.
    pub node: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub bearer: Option<String>,
    /// When false, invalid TLS certificates are accepted.
    pub reject_unauthorized: bool,
    /// Gzip request bodies and accept gzip-compressed responses.
    pub compression: bool,
    /// Wait between connection attempts at startup.
    pub retry_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NODE)
    }
}

impl EngineConfig {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            username: None,
            password: None,
            api_key: None,
            bearer: None,
            reject_unauthorized: true,
            compression: false,
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            node: non_empty("ELASTIC_NODE").unwrap_or_else(|| DEFAULT_NODE.to_string()),
            username: non_empty("ELASTIC_USER"),
            password: non_empty("ELASTIC_PASSWORD"),
            api_key: non_empty("ELASTIC_API_KEY"),
            bearer: non_empty("ELASTIC_BEARER"),
            reject_unauthorized: non_empty("ELASTIC_REJECT_UNAUTHORIZED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            compression: non_empty("ELASTIC_COMPRESSION")
                .map(|v| v == "true")
                .unwrap_or(false),
            retry_interval: Duration::from_secs(
                non_empty("SIFTER_RETRY_INTERVAL_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS),
            ),
            request_timeout: Duration::from_secs(
                non_empty("SIFTER_REQUEST_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    /// Reject settings that no number of connection retries would fix.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SifterError;

        if !(self.node.starts_with("http://") || self.node.starts_with("https://")) {
            return Err(SifterError::Config(format!(
                "ELASTIC_NODE must be an http(s) URL, got '{}'",
                self.node
            )));
        }
        if self.retry_interval.is_zero() {
            return Err(SifterError::Config(
                "SIFTER_RETRY_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve which credentials to use.
    ///
    /// Basic auth wins over an API key, which wins over a bearer token. A
    /// password without a username authenticates as `elastic`.
    pub fn auth(&self) -> Option<EngineAuth> {
        let username = self
            .username
            .clone()
            .or_else(|| self.password.as_ref().map(|_| "elastic".to_string()));

        if let Some(username) = username {
            return Some(EngineAuth::Basic {
                username,
                password: self.password.clone().unwrap_or_default(),
            });
        }
        if let Some(key) = &self.api_key {
            return Some(EngineAuth::ApiKey(key.clone()));
        }
        self.bearer.clone().map(EngineAuth::Bearer)
    }
}
