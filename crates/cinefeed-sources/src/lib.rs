pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::RequestError;
pub use tmdb::{Normalizer, TmdbClient};
pub use traits::MovieSource;
