use async_trait::async_trait;
use cinefeed_config::TmdbConfig;
use cinefeed_models::{MovieId, PageQuery, RawPage};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::tmdb::api;
use crate::traits::MovieSource;

/// HTTP adapter for the TMDB v3 API.
///
/// Every request carries the `api_key` and `language` defaults, so callers
/// only pass what is specific to the endpoint. Cloning is cheap: the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    timeout: Duration,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(RequestError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            language: config.language.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` (relative to the base URL) and return the JSON body.
    ///
    /// `extra_params` are merged over the defaults; a key given by the caller
    /// replaces the default of the same name.
    pub async fn get(&self, path: &str, extra_params: &[(&str, String)]) -> Result<Value, RequestError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            warn!(path, "TMDB API key missing, request not sent");
            RequestError::MissingApiKey
        })?;

        let url = format!("{}{}", self.base_url, path);
        let params = merge_params(
            &[("api_key", api_key.to_string()), ("language", self.language.clone())],
            extra_params,
        );

        debug!(path, "TMDB GET");
        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "TMDB request failed");
            return Err(RequestError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        serde_json::from_slice(&bytes).map_err(|source| RequestError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn transport_error(&self, path: &str, source: reqwest::Error) -> RequestError {
        if source.is_timeout() {
            warn!(path, timeout_secs = self.timeout.as_secs(), "TMDB request timed out");
            RequestError::Timeout {
                path: path.to_string(),
                timeout: self.timeout,
                source,
            }
        } else {
            warn!(path, error = %source, "TMDB request failed");
            RequestError::Transport {
                path: path.to_string(),
                source,
            }
        }
    }
}

fn merge_params(defaults: &[(&str, String)], extra: &[(&str, String)]) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = defaults
        .iter()
        .filter(|(key, _)| !extra.iter().any(|(k, _)| k == key))
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));
    params
}

#[async_trait]
impl MovieSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn movie_details(&self, id: MovieId) -> Result<Value, RequestError> {
        api::get_movie_details(self, id).await
    }

    async fn movie_page(&self, query: &PageQuery) -> Result<RawPage, RequestError> {
        api::get_movie_page(self, query).await
    }
}
