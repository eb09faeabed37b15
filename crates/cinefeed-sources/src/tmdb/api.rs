use cinefeed_models::{lenient, MovieId, PageQuery, RawPage};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::RequestError;
use crate::tmdb::client::TmdbClient;

pub const POPULAR_PATH: &str = "/movie/popular";
pub const SEARCH_PATH: &str = "/search/movie";

/// Sub-resources appended to a detail request.
pub const DETAIL_APPENDS: &str = "credits,release_dates,videos";

pub fn movie_path(id: MovieId) -> String {
    format!("/movie/{}", id)
}

/// Fetch the full detail payload for one movie.
pub async fn get_movie_details(client: &TmdbClient, id: MovieId) -> Result<Value, RequestError> {
    debug!(movie_id = id, "Fetching movie details");
    client
        .get(&movie_path(id), &[("append_to_response", DETAIL_APPENDS.to_string())])
        .await
}

/// Fetch one page of popular movies, or of search results when the query
/// carries a term.
pub async fn get_movie_page(client: &TmdbClient, query: &PageQuery) -> Result<RawPage, RequestError> {
    let page = query.page().to_string();
    let (path, value) = match query.term() {
        Some(term) => {
            debug!(term, page = query.page(), "Searching movies");
            let value = client
                .get(SEARCH_PATH, &[("query", term.to_string()), ("page", page)])
                .await?;
            (SEARCH_PATH, value)
        }
        None => {
            debug!(page = query.page(), "Fetching popular movies");
            (POPULAR_PATH, client.get(POPULAR_PATH, &[("page", page)]).await?)
        }
    };

    serde_json::from_value(value).map_err(|source| RequestError::Decode {
        path: path.to_string(),
        source,
    })
}

// Upstream detail payload. Every field is optional and tolerant of nulls or
// wrong types; see `cinefeed_models::lenient`.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieResponse {
    #[serde(default, deserialize_with = "lenient::option")]
    pub id: Option<MovieId>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub revenue: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub budget: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub credits: Option<Credits>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub videos: Option<Videos>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub release_dates: Option<ReleaseDates>,
}

impl TmdbMovieResponse {
    /// Decode a detail payload; anything that is not a JSON object decodes
    /// as an empty response.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn crew(&self) -> &[CrewMember] {
        self.credits.as_ref().map(|c| c.crew.as_slice()).unwrap_or_default()
    }

    pub fn cast(&self) -> &[CastMember] {
        self.credits.as_ref().map(|c| c.cast.as_slice()).unwrap_or_default()
    }

    pub fn videos(&self) -> &[VideoResult] {
        self.videos.as_ref().map(|v| v.results.as_slice()).unwrap_or_default()
    }

    pub fn release_dates(&self) -> &[CountryRelease] {
        self.release_dates
            .as_ref()
            .map(|r| r.results.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Genre {
    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub crew: Vec<CrewMember>,
}

/// Cast entries without a person id are dropped during decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub character: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewMember {
    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub job: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub results: Vec<VideoResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoResult {
    #[serde(default, deserialize_with = "lenient::option")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub site: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::option")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDates {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub results: Vec<CountryRelease>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryRelease {
    #[serde(default, deserialize_with = "lenient::option")]
    pub iso_3166_1: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDate {
    #[serde(default, deserialize_with = "lenient::option")]
    pub certification: Option<String>,
}
