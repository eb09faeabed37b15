use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::movie::MovieId;
use crate::stars::StarRating;

/// Image shown on a list card when the movie has no poster.
pub const CARD_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Request for one page of movies: popular when there is no search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    term: Option<String>,
    page: u32,
}

impl PageQuery {
    pub fn popular(page: u32) -> Self {
        Self { term: None, page: page.max(1) }
    }

    /// A blank term is treated as no term at all.
    pub fn new(term: Option<&str>, page: u32) -> Self {
        let term = term.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
        Self { term, page: page.max(1) }
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_search(&self) -> bool {
        self.term.is_some()
    }
}

/// One page of a list or search response, passed through without
/// normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPage {
    #[serde(default, deserialize_with = "lenient::option")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub results: Vec<RawMovie>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub total_pages: Option<u32>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub total_results: Option<u64>,
}

/// A list entry as the upstream service returns it.
///
/// Entries without an integer `id` are dropped while decoding the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMovie {
    pub id: MovieId,
    #[serde(default, deserialize_with = "lenient::option")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub release_date: Option<String>,
}

/// Card-level view of a [`RawMovie`], with the display defaults a list view
/// applies on its own.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    /// Raw 0-10 vote average
    pub rating: f64,
    pub stars: StarRating,
    pub year: Option<i32>,
    pub image: String,
}

impl MovieSummary {
    pub fn from_raw(raw: &RawMovie, image_base: &str, size: &str) -> Self {
        let rating = raw.vote_average.filter(|v| v.is_finite()).unwrap_or(0.0);
        let image = match raw.poster_path.as_deref() {
            Some(path) if !path.is_empty() => {
                format!("{}/{}{}", image_base.trim_end_matches('/'), size, path)
            }
            _ => CARD_PLACEHOLDER.to_string(),
        };

        Self {
            id: raw.id,
            title: raw.title.clone().filter(|t| !t.is_empty()).unwrap_or_default(),
            rating,
            stars: StarRating::from_vote_average(rating),
            year: raw.release_date.as_deref().and_then(parse_release_year),
            image,
        }
    }
}

/// Year of a `YYYY-MM-DD` date string; empty or malformed dates yield `None`.
pub fn parse_release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
