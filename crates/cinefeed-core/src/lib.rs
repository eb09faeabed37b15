pub mod detail_cache;
pub mod feed;
pub mod listing;

#[cfg(test)]
mod test_support;

pub use detail_cache::{DetailCache, FailurePolicy};
pub use feed::{FeedTicket, FeedUpdate, MovieFeed, QueryToken};
pub use listing::{MovieLister, SearchFailure};
