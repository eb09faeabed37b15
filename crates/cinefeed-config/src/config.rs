use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::paths::PathManager;

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tmdb.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("detail.cast_limit must be greater than zero")]
    ZeroCastLimit,
    #[error("{field} must be an http(s) URL, got {value:?}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("cache.failure_ttl_secs must be greater than zero when cache.failures = \"expire\"")]
    ZeroFailureTtl,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,
    #[serde(default = "default_profile_size")]
    pub profile_size: String,
    /// Local path used when a movie has no image
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default = "default_cast_limit")]
    pub cast_limit: usize,
}

/// What the detail cache does with fallback records produced by failed
/// fetches. Successful records are always kept for the process lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureCaching {
    /// Never cache fallbacks; the next request refetches
    Skip,
    /// Keep fallbacks as long as successes
    Forever,
    /// Keep fallbacks for `failure_ttl_secs`
    Expire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_failure_caching")]
    pub failures: FailureCaching,
    #[serde(default = "default_failure_ttl_secs")]
    pub failure_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_backdrop_size() -> String {
    "original".to_string()
}

fn default_profile_size() -> String {
    "w185".to_string()
}

fn default_placeholder() -> String {
    "/placeholder-movie.jpg".to_string()
}

fn default_cast_limit() -> usize {
    10
}

fn default_failure_caching() -> FailureCaching {
    FailureCaching::Expire
}

fn default_failure_ttl_secs() -> u64 {
    30
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured API key, ignoring empty values and the template
    /// placeholder written by `config init`.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            poster_size: default_poster_size(),
            backdrop_size: default_backdrop_size(),
            profile_size: default_profile_size(),
            placeholder: default_placeholder(),
        }
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            cast_limit: default_cast_limit(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            failures: default_failure_caching(),
            failure_ttl_secs: default_failure_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn failure_ttl(&self) -> Duration {
        Duration::from_secs(self.failure_ttl_secs)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the config file if it exists (defaults otherwise), apply the
    /// environment override for the API key, and validate.
    pub fn load(path_manager: &PathManager) -> anyhow::Result<Self> {
        let path = path_manager.config_file();
        let config = if path.exists() {
            debug!(path = %path.display(), "Loading config file");
            Self::load_from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        let config = config.with_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the API key with `key` when it is non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.tmdb.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tmdb.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.detail.cast_limit == 0 {
            return Err(ConfigError::ZeroCastLimit);
        }
        for (field, value) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.cache.failures == FailureCaching::Expire && self.cache.failure_ttl_secs == 0 {
            return Err(ConfigError::ZeroFailureTtl);
        }
        Ok(())
    }

    /// Config written by `cinefeed config init`.
    pub fn template() -> Self {
        let mut config = Self::default();
        config.tmdb.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tmdb.api_key = Some("abc123".to_string());
        config.tmdb.language = "fr-FR".to_string();
        config.cache.failures = FailureCaching::Skip;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tmdb.api_key(), Some("abc123"));
        assert_eq!(loaded.tmdb.language, "fr-FR");
        assert_eq!(loaded.cache.failures, FailureCaching::Skip);
        assert_eq!(loaded.detail.cast_limit, 10);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tmdb]
            timeout_secs = 3

            [cache]
            failures = "forever"
            "#,
        )
        .unwrap();

        assert_eq!(config.tmdb.timeout(), Duration::from_secs(3));
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.images.poster_size, "w500");
        assert_eq!(config.cache.failures, FailureCaching::Forever);
        assert_eq!(config.cache.failure_ttl_secs, 30);
        assert!(config.tmdb.api_key().is_none());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.tmdb.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
        config.tmdb.timeout_secs = 8;

        config.tmdb.base_url = "api.themoviedb.org".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { field: "tmdb.base_url", .. })));
        config.tmdb.base_url = default_base_url();

        config.cache.failure_ttl_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFailureTtl));
        config.cache.failures = FailureCaching::Skip;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_override_and_placeholder() {
        let config = Config::template();
        assert!(config.tmdb.api_key().is_none());

        let config = config.with_api_key_override(Some("from-env".to_string()));
        assert_eq!(config.tmdb.api_key(), Some("from-env"));

        let config = config.with_api_key_override(Some("  ".to_string()));
        assert_eq!(config.tmdb.api_key(), Some("from-env"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let config = Config::load(&paths).unwrap();
        assert_eq!(config.tmdb.timeout_secs, 8);
    }
}
