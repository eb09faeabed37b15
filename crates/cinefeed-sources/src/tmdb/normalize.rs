//! Normalization of TMDB detail payloads into [`MovieDetail`] records.
//!
//! Each field is mapped independently and every mapper has a fallback, so a
//! partial or malformed payload still yields a complete record. When the
//! request itself fails, [`Normalizer::fallback`] builds an error record of
//! the same shape.

use cinefeed_config::Config;
use cinefeed_models::{CastEntry, MovieDetail, MovieId};
use serde_json::Value;

use crate::error::RequestError;
use crate::tmdb::api::{CastMember, CountryRelease, CrewMember, Genre, TmdbMovieResponse, VideoResult};

pub const UNTITLED: &str = "Untitled Movie";
pub const NO_SYNOPSIS: &str = "No synopsis available.";
pub const UNKNOWN: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NOT_RATED: &str = "NR";

pub const ERROR_TITLE: &str = "Error Loading Movie";
pub const ERROR_NOT_FOUND: &str = "Movie not found in our database.";
pub const ERROR_RETRY_LATER: &str = "Failed to load movie details. Please try again later.";
pub const ERROR_LABEL: &str = "Error";

const TRAILER_BASE: &str = "https://youtube.com/watch?v=";
const CERTIFICATION_REGION: &str = "US";

/// Image and cast settings applied while normalizing.
#[derive(Debug, Clone)]
pub struct Normalizer {
    image_base: String,
    poster_size: String,
    backdrop_size: String,
    profile_size: String,
    placeholder: String,
    cast_limit: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Normalizer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base: config.tmdb.image_base_url.trim_end_matches('/').to_string(),
            poster_size: config.images.poster_size.clone(),
            backdrop_size: config.images.backdrop_size.clone(),
            profile_size: config.images.profile_size.clone(),
            placeholder: config.images.placeholder.clone(),
            cast_limit: config.detail.cast_limit,
        }
    }

    pub fn with_cast_limit(mut self, limit: usize) -> Self {
        self.cast_limit = limit;
        self
    }

    /// Normalize a raw JSON detail payload. `requested_id` is used when the
    /// payload carries no usable id of its own.
    pub fn normalize_value(&self, requested_id: MovieId, value: Value) -> MovieDetail {
        self.normalize(requested_id, &TmdbMovieResponse::from_value(value))
    }

    pub fn normalize(&self, requested_id: MovieId, raw: &TmdbMovieResponse) -> MovieDetail {
        MovieDetail {
            id: raw.id.unwrap_or(requested_id),
            title: non_empty(raw.title.as_deref()).unwrap_or(UNTITLED).to_string(),
            overview: non_empty(raw.overview.as_deref()).unwrap_or(NO_SYNOPSIS).to_string(),
            rating: normalize_rating(raw.vote_average.unwrap_or(0.0)),
            release_date: non_empty(raw.release_date.as_deref()).map(str::to_string),
            runtime: format_runtime(raw.runtime.unwrap_or(0)),
            revenue: format_money(raw.revenue.unwrap_or(0)),
            budget: format_money(raw.budget.unwrap_or(0)),
            poster_path: self.image_url(raw.poster_path.as_deref(), &self.poster_size),
            backdrop_path: self.image_url(raw.backdrop_path.as_deref(), &self.backdrop_size),
            trailer: find_trailer(raw.videos()),
            director: find_director(raw.crew()),
            cast: self.top_cast(raw.cast()),
            genres: genre_names(&raw.genres),
            certification: find_certification(raw.release_dates()),
            status: non_empty(raw.status.as_deref()).unwrap_or(UNKNOWN).to_string(),
        }
    }

    /// Error record substituted when the detail request fails.
    pub fn fallback(&self, id: MovieId, error: &RequestError) -> MovieDetail {
        let overview = if error.is_not_found() {
            ERROR_NOT_FOUND
        } else {
            ERROR_RETRY_LATER
        };

        MovieDetail {
            id,
            title: ERROR_TITLE.to_string(),
            overview: overview.to_string(),
            rating: 0.0,
            release_date: None,
            runtime: NOT_AVAILABLE.to_string(),
            revenue: NOT_AVAILABLE.to_string(),
            budget: NOT_AVAILABLE.to_string(),
            poster_path: self.placeholder.clone(),
            backdrop_path: self.placeholder.clone(),
            trailer: None,
            director: UNKNOWN.to_string(),
            cast: Vec::new(),
            genres: vec![ERROR_LABEL.to_string()],
            certification: NOT_RATED.to_string(),
            status: ERROR_LABEL.to_string(),
        }
    }

    /// Absolute image URL for `path` at `size`, or the placeholder.
    pub fn image_url(&self, path: Option<&str>, size: &str) -> String {
        match non_empty(path) {
            Some(path) => format!("{}/{}{}", self.image_base, size, path),
            None => self.placeholder.clone(),
        }
    }

    /// First `cast_limit` cast members in billing order.
    pub fn top_cast(&self, cast: &[CastMember]) -> Vec<CastEntry> {
        cast.iter()
            .take(self.cast_limit)
            .map(|actor| CastEntry {
                id: actor.id,
                name: non_empty(actor.name.as_deref()).unwrap_or(UNKNOWN).to_string(),
                character: non_empty(actor.character.as_deref()).unwrap_or(UNKNOWN).to_string(),
                profile_path: self.image_url(actor.profile_path.as_deref(), &self.profile_size),
            })
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Convert a 0-10 vote average to the 0-5 scale, rounded to one decimal.
pub fn normalize_rating(vote_average: f64) -> f64 {
    if !vote_average.is_finite() || vote_average == 0.0 {
        return 0.0;
    }
    let halved = (vote_average / 2.0 * 10.0).round() / 10.0;
    halved.clamp(0.0, 5.0)
}

/// `"{h}h {m}m"`, or `"N/A"` for zero.
pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Dollar amount with a B/M suffix above a million, digit-grouped below.
/// Suffixed amounts keep one decimal, with ties rounded up.
pub fn format_money(amount: u64) -> String {
    const BILLION: u64 = 1_000_000_000;
    const MILLION: u64 = 1_000_000;

    if amount == 0 {
        NOT_AVAILABLE.to_string()
    } else if amount >= BILLION {
        format!("${}B", one_decimal(amount, BILLION))
    } else if amount >= MILLION {
        format!("${}M", one_decimal(amount, MILLION))
    } else {
        format!("${}", group_digits(amount))
    }
}

/// `amount / unit` to one decimal place, computed on integers.
fn one_decimal(amount: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let tenths = (u128::from(amount) * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Name of the first crew member credited as director. The first match
/// wins, even when it has no name.
pub fn find_director(crew: &[CrewMember]) -> String {
    let is_directing = |dept: &Option<String>| dept.as_deref() == Some("Directing");

    crew.iter()
        .find(|person| {
            person.job.as_deref() == Some("Director")
                || is_directing(&person.department)
                || is_directing(&person.known_for_department)
        })
        .and_then(|person| non_empty(person.name.as_deref()))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Watch URL of the first YouTube trailer.
pub fn find_trailer(videos: &[VideoResult]) -> Option<String> {
    videos
        .iter()
        .find(|v| {
            v.kind.as_deref() == Some("Trailer")
                && v.site.as_deref() == Some("YouTube")
                && non_empty(v.key.as_deref()).is_some()
        })
        .and_then(|v| v.key.as_deref())
        .map(|key| format!("{}{}", TRAILER_BASE, key))
}

/// Certification of the first US release, or `"NR"`.
pub fn find_certification(releases: &[CountryRelease]) -> String {
    releases
        .iter()
        .find(|r| r.iso_3166_1.as_deref() == Some(CERTIFICATION_REGION))
        .and_then(|r| r.release_dates.first())
        .and_then(|d| non_empty(d.certification.as_deref()))
        .unwrap_or(NOT_RATED)
        .to_string()
}

pub fn genre_names(genres: &[Genre]) -> Vec<String> {
    let names: Vec<String> = genres
        .iter()
        .filter_map(|g| non_empty(g.name.as_deref()))
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        vec![UNKNOWN.to_string()]
    } else {
        names
    }
}
