pub mod config;
pub mod paths;

pub use config::{
    CacheConfig, Config, ConfigError, DetailConfig, FailureCaching, ImageConfig, TmdbConfig,
    API_KEY_ENV,
};
pub use paths::{base_path_override, PathManager};
