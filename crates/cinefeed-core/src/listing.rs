use std::sync::Arc;

use cinefeed_models::{PageQuery, RawPage};
use cinefeed_sources::{MovieSource, RequestError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::feed::{FeedUpdate, MovieFeed};

/// A popular or search page that could not be loaded.
#[derive(Debug, Error)]
#[error("{} page {page} could not be loaded", describe(.term))]
pub struct SearchFailure {
    pub term: Option<String>,
    pub page: u32,
    #[source]
    pub source: RequestError,
}

fn describe(term: &Option<String>) -> String {
    match term {
        Some(term) => format!("search {:?}", term),
        None => "popular movies".to_string(),
    }
}

impl SearchFailure {
    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}

/// Popular and search listings. Pages are returned as the upstream service
/// sends them; callers concatenate.
#[derive(Clone)]
pub struct MovieLister {
    source: Arc<dyn MovieSource>,
}

impl MovieLister {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self { source }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<RawPage, SearchFailure> {
        debug!(term = query.term(), page = query.page(), "Listing movies");
        self.source.movie_page(query).await.map_err(|source| {
            warn!(term = query.term(), page = query.page(), error = %source, "Movie list request failed");
            SearchFailure {
                term: query.term().map(str::to_string),
                page: query.page(),
                source,
            }
        })
    }

    /// Fetch the feed's next page and apply it.
    ///
    /// The feed lock is not held during the request, so a new query begun
    /// meanwhile makes this response stale. Returns `Ok(None)` when the feed
    /// has no more pages. A failure that clears the feed is returned as the
    /// error; a failure for a superseded query is only `Stale`.
    pub async fn load_next(&self, feed: &Mutex<MovieFeed>) -> Result<Option<FeedUpdate>, SearchFailure> {
        let Some(ticket) = feed.lock().await.next_ticket() else {
            return Ok(None);
        };

        match self.list(ticket.query()).await {
            Ok(page) => Ok(Some(feed.lock().await.apply_page(&ticket, page))),
            Err(failure) => match feed.lock().await.apply_failure(&ticket, &failure) {
                FeedUpdate::Cleared => Err(failure),
                update => Ok(Some(update)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeSource, FAKE_TOTAL_PAGES};

    #[tokio::test]
    async fn test_blank_term_lists_popular() {
        let source = Arc::new(FakeSource::new());
        let lister = MovieLister::new(source.clone());

        let page = lister.list(&PageQuery::new(Some("   "), 1)).await.unwrap();
        assert_eq!(page.results[0].title.as_deref(), Some("popular 0"));
        assert_eq!(page.total_pages, Some(FAKE_TOTAL_PAGES));
        assert_eq!(source.page_calls(), 1);
    }

    #[tokio::test]
    async fn test_search_forwards_term_and_page() {
        let lister = MovieLister::new(Arc::new(FakeSource::new()));

        let page = lister.list(&PageQuery::new(Some("alien"), 2)).await.unwrap();
        assert_eq!(page.page, Some(2));
        assert_eq!(page.results[1].id, 21);
        assert_eq!(page.results[1].title.as_deref(), Some("alien 1"));
    }

    #[tokio::test]
    async fn test_failure_carries_query() {
        let source = Arc::new(FakeSource::new());
        source.fail_pages(Some(503));
        let lister = MovieLister::new(source);

        let err = lister.list(&PageQuery::new(Some("alien"), 4)).await.unwrap_err();
        assert_eq!(err.term.as_deref(), Some("alien"));
        assert_eq!(err.page, 4);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "search \"alien\" page 4 could not be loaded");
    }

    #[tokio::test]
    async fn test_load_next_walks_all_pages() {
        let source = Arc::new(FakeSource::new());
        let lister = MovieLister::new(source.clone());
        let feed = Mutex::new(MovieFeed::new());

        let mut updates = Vec::new();
        while let Some(update) = lister.load_next(&feed).await.unwrap() {
            updates.push(update);
        }

        assert_eq!(updates, vec![FeedUpdate::Appended(2); FAKE_TOTAL_PAGES as usize]);
        let feed = feed.lock().await;
        assert_eq!(feed.results().len(), 6);
        assert_eq!(feed.pages_loaded(), FAKE_TOTAL_PAGES);
        assert!(!feed.has_more());
        assert_eq!(source.page_calls(), FAKE_TOTAL_PAGES as usize);
    }

    #[tokio::test]
    async fn test_load_next_returns_failure_and_clears_feed() {
        let source = Arc::new(FakeSource::new());
        let lister = MovieLister::new(source.clone());
        let feed = Mutex::new(MovieFeed::new());
        feed.lock().await.begin(Some("alien"));

        assert_eq!(lister.load_next(&feed).await.unwrap(), Some(FeedUpdate::Appended(2)));
        source.fail_pages(Some(500));

        let err = lister.load_next(&feed).await.unwrap_err();
        assert_eq!(err.term.as_deref(), Some("alien"));
        assert_eq!(err.page, 2);
        assert_eq!(err.status(), Some(500));
        assert!(feed.lock().await.results().is_empty());
    }
}
