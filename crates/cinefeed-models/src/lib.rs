pub mod detail;
pub mod lenient;
pub mod movie;
pub mod page;
pub mod stars;

pub use detail::Detail;
pub use movie::{CastEntry, MovieDetail, MovieId};
pub use page::{MovieSummary, PageQuery, RawMovie, RawPage, CARD_PLACEHOLDER};
pub use stars::{Star, StarRating};
