use cinefeed_models::{PageQuery, RawMovie, RawPage};
use tracing::{debug, info, warn};

use crate::listing::SearchFailure;

/// Identifies one query issued to a [`MovieFeed`]. Tokens increase with
/// every [`MovieFeed::begin`]; only the latest one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

/// A page request handed out by the feed, to be returned with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTicket {
    token: QueryToken,
    query: PageQuery,
}

impl FeedTicket {
    pub fn token(&self) -> QueryToken {
        self.token
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// `n` results were added
    Appended(usize),
    /// The response belongs to a superseded query or page and was dropped
    Stale,
    /// The query failed and the result set was emptied
    Cleared,
}

/// Raw list results accumulated page by page for the current query.
///
/// Responses may arrive out of order; each carries the ticket it was issued
/// under and is applied only while that ticket is still current.
#[derive(Debug)]
pub struct MovieFeed {
    sequence: u64,
    term: Option<String>,
    results: Vec<RawMovie>,
    next_page: u32,
    total_pages: Option<u32>,
}

impl Default for MovieFeed {
    fn default() -> Self {
        Self {
            sequence: 0,
            term: None,
            results: Vec::new(),
            next_page: 1,
            total_pages: None,
        }
    }
}

impl MovieFeed {
    /// A feed of popular movies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, discarding the current results. A blank term
    /// switches back to popular movies.
    pub fn begin(&mut self, term: Option<&str>) -> QueryToken {
        self.sequence += 1;
        self.term = PageQuery::new(term, 1).term().map(str::to_string);
        self.reset();
        info!(term = self.term.as_deref(), token = self.sequence, "Starting movie query");
        self.current_token()
    }

    pub fn current_token(&self) -> QueryToken {
        QueryToken(self.sequence)
    }

    /// The next page to request, or `None` once the last page is loaded.
    pub fn next_ticket(&self) -> Option<FeedTicket> {
        if !self.has_more() {
            return None;
        }
        Some(FeedTicket {
            token: self.current_token(),
            query: PageQuery::new(self.term.as_deref(), self.next_page),
        })
    }

    pub fn apply(&mut self, ticket: &FeedTicket, result: Result<RawPage, SearchFailure>) -> FeedUpdate {
        match result {
            Ok(page) => self.apply_page(ticket, page),
            Err(e) => self.apply_failure(ticket, &e),
        }
    }

    /// Record a failed request: a current ticket clears the results.
    pub fn apply_failure(&mut self, ticket: &FeedTicket, failure: &SearchFailure) -> FeedUpdate {
        if self.is_superseded(ticket) {
            return FeedUpdate::Stale;
        }
        warn!(error = %failure, "Movie query failed, clearing results");
        self.reset();
        FeedUpdate::Cleared
    }

    pub fn apply_page(&mut self, ticket: &FeedTicket, page: RawPage) -> FeedUpdate {
        if self.is_superseded(ticket) {
            return FeedUpdate::Stale;
        }

        if ticket.query.page() != self.next_page {
            debug!(page = ticket.query.page(), expected = self.next_page, "Dropping out-of-order page");
            return FeedUpdate::Stale;
        }

        let appended = page.results.len();
        self.results.extend(page.results);
        // An empty page ends the feed even when the upstream total says otherwise
        self.total_pages = if appended == 0 {
            Some(self.next_page)
        } else {
            page.total_pages
        };
        self.next_page += 1;

        debug!(
            page = ticket.query.page(),
            appended,
            total = self.results.len(),
            total_pages = self.total_pages,
            "Applied movie page"
        );
        FeedUpdate::Appended(appended)
    }

    fn is_superseded(&self, ticket: &FeedTicket) -> bool {
        if ticket.token == self.current_token() {
            return false;
        }
        debug!(
            token = ticket.token.0,
            current = self.sequence,
            page = ticket.query.page(),
            "Dropping response for superseded query"
        );
        true
    }

    pub fn results(&self) -> &[RawMovie] {
        &self.results
    }

    /// Current search term; `None` for popular movies.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn has_more(&self) -> bool {
        match self.total_pages {
            Some(total) => self.next_page <= total,
            None => true,
        }
    }

    pub fn pages_loaded(&self) -> u32 {
        self.next_page - 1
    }

    fn reset(&mut self) {
        self.results.clear();
        self.next_page = 1;
        self.total_pages = None;
    }
}
