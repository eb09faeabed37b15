use serde::{Deserialize, Serialize};

use crate::movie::MovieDetail;

/// Outcome of a detail lookup.
///
/// Both variants carry a complete [`MovieDetail`], so callers can render
/// either one the same way and only branch when they care about the
/// difference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", content = "movie", rename_all = "snake_case")]
pub enum Detail {
    /// Normalized from a successful upstream response
    Loaded(MovieDetail),
    /// Synthesized after the upstream request failed
    Fallback(MovieDetail),
}

impl Detail {
    pub fn movie(&self) -> &MovieDetail {
        match self {
            Detail::Loaded(movie) | Detail::Fallback(movie) => movie,
        }
    }

    pub fn into_movie(self) -> MovieDetail {
        match self {
            Detail::Loaded(movie) | Detail::Fallback(movie) => movie,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Detail::Fallback(_))
    }
}
