pub mod api;
pub mod client;
pub mod normalize;

pub use client::TmdbClient;
pub use normalize::Normalizer;
