use std::time::Duration;
use thiserror::Error;

/// Failure of a single request to the metadata service.
///
/// Transport failures, timeouts, non-2xx statuses and unreadable bodies all
/// end up here. Nothing is retried.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("TMDB API key is not configured (set TMDB_API_KEY or tmdb.api_key)")]
    MissingApiKey,

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {path} timed out after {}s", .timeout.as_secs())]
    Timeout {
        path: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {path} failed")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned HTTP {status}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("response from {path} is not valid JSON")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RequestError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
