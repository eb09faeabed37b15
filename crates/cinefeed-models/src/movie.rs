use serde::{Deserialize, Serialize};

/// TMDB movie identifier.
pub type MovieId = u64;

/// Normalized movie detail record handed to the presentation layer.
///
/// Every field holds either upstream data or a defined fallback, so a record
/// is always fully displayable. Records are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    /// 0-5 scale, one decimal place
    pub rating: f64,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    /// "Xh Ym" or "N/A"
    pub runtime: String,
    pub revenue: String,
    pub budget: String,
    pub poster_path: String,
    pub backdrop_path: String,
    pub trailer: Option<String>,
    pub director: String,
    pub cast: Vec<CastEntry>,
    pub genres: Vec<String>,
    pub certification: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastEntry {
    pub id: u64, // TMDB person id, lookup only
    pub name: String,
    pub character: String,
    pub profile_path: String,
}

impl MovieDetail {
    /// Release year taken from the leading `YYYY` of `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(crate::page::parse_release_year)
    }
}
