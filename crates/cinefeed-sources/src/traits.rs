use async_trait::async_trait;
use cinefeed_models::{MovieId, PageQuery, RawPage};
use serde_json::Value;

use crate::error::RequestError;

/// Upstream movie-metadata service.
///
/// The detail cache and list queries only talk to this trait, so tests can
/// substitute an in-memory source.
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Full detail payload for one movie, with credits, release dates and
    /// videos appended. Returned as raw JSON for the normalizer.
    async fn movie_details(&self, id: MovieId) -> Result<Value, RequestError>;

    /// One page of popular movies or search results.
    async fn movie_page(&self, query: &PageQuery) -> Result<RawPage, RequestError>;
}
