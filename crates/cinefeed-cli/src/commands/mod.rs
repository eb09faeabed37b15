pub mod config;
pub mod list;
pub mod movie;
mod spinner;

use std::sync::Arc;

use cinefeed_config::{Config, PathManager, API_KEY_ENV};
use cinefeed_core::{DetailCache, FailurePolicy, MovieLister};
use cinefeed_sources::{MovieSource, Normalizer, TmdbClient};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::debug;

use crate::output::Output;

/// Services shared by the commands of one invocation.
pub struct AppContext {
    pub config: Config,
    pub lister: MovieLister,
    pub cache: Arc<DetailCache>,
}

impl AppContext {
    pub fn load(output: &Output) -> Result<Self> {
        let path_manager = PathManager::default();
        let config = Config::load(&path_manager).map_err(|e| {
            eyre!(
                "Failed to load config from {}: {:#}",
                path_manager.config_file().display(),
                e
            )
        })?;

        if config.tmdb.api_key().is_none() {
            output.warn(format!(
                "No TMDB API key configured. Set {} or run 'cinefeed config init' and edit {}",
                API_KEY_ENV,
                path_manager.config_file().display()
            ));
        }

        let client = TmdbClient::new(&config.tmdb)?;
        debug!(?client, "Created TMDB client");
        let source: Arc<dyn MovieSource> = Arc::new(client);

        let cache = DetailCache::new(
            source.clone(),
            Normalizer::from_config(&config),
            FailurePolicy::from_config(&config.cache),
        );

        Ok(Self {
            lister: MovieLister::new(source),
            cache: Arc::new(cache),
            config,
        })
    }
}
