use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cinefeed_models::{MovieId, PageQuery, RawMovie, RawPage};
use cinefeed_sources::{MovieSource, RequestError};
use serde_json::{json, Value};

pub const FAKE_TOTAL_PAGES: u32 = 3;

/// In-memory source that counts calls and fails on demand.
#[derive(Default)]
pub struct FakeSource {
    detail_calls: AtomicUsize,
    page_calls: AtomicUsize,
    detail_failures: Mutex<HashMap<MovieId, u16>>,
    page_failure: Mutex<Option<u16>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    /// Make detail requests for `id` fail with `status`, or succeed again
    /// when `None`.
    pub fn fail_details(&self, id: MovieId, status: Option<u16>) {
        let mut failures = self.detail_failures.lock().unwrap();
        match status {
            Some(status) => failures.insert(id, status),
            None => failures.remove(&id),
        };
    }

    pub fn fail_pages(&self, status: Option<u16>) {
        *self.page_failure.lock().unwrap() = status;
    }

    fn status_error(path: String, status: u16) -> RequestError {
        RequestError::Status {
            path,
            status,
            body: String::new(),
        }
    }
}

/// Page `page` of the fake listing: two entries whose titles carry the term.
pub fn fake_page(query: &PageQuery) -> RawPage {
    let label = query.term().unwrap_or("popular");
    let results = (0..2)
        .map(|i| RawMovie {
            id: u64::from(query.page()) * 10 + i,
            title: Some(format!("{} {}", label, i)),
            vote_average: Some(7.0),
            poster_path: None,
            release_date: Some("2001-01-01".to_string()),
        })
        .collect();

    RawPage {
        page: Some(query.page()),
        results,
        total_pages: Some(FAKE_TOTAL_PAGES),
        total_results: Some(u64::from(FAKE_TOTAL_PAGES) * 2),
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn movie_details(&self, id: MovieId) -> Result<Value, RequestError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.detail_failures.lock().unwrap().get(&id).copied();
        if let Some(status) = failure {
            return Err(Self::status_error(format!("/movie/{}", id), status));
        }
        Ok(json!({
            "id": id,
            "title": format!("Movie {}", id),
            "vote_average": 7.0,
            "runtime": 95
        }))
    }

    async fn movie_page(&self, query: &PageQuery) -> Result<RawPage, RequestError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let failure = *self.page_failure.lock().unwrap();
        if let Some(status) = failure {
            return Err(Self::status_error("/movie/popular".to_string(), status));
        }
        Ok(fake_page(query))
    }
}
