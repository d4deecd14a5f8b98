//! Builds the long-lived components from configuration.

use std::sync::Arc;

use nearbite_core::AppConfig;
use nearbite_db::{PoolConfig, SqliteFavoriteRepository};
use nearbite_search::{AppleMapsSource, SearchOrchestrator, YelpSource};
use nearbite_session::FavoritesStore;
use sqlx::SqlitePool;

/// Yelp as the primary source, Apple Maps as fallback when a token is set.
///
/// # Errors
///
/// Returns an error if a source's base URL or HTTP client is invalid.
pub(crate) fn build_orchestrator(config: &AppConfig) -> anyhow::Result<SearchOrchestrator> {
    let yelp = YelpSource::with_base_url(
        &config.yelp_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.yelp_base_url,
    )?;
    let orchestrator =
        SearchOrchestrator::new(Arc::new(yelp), config.search.clone(), config.cache);

    let Some(token) = config.apple_maps_token.as_deref() else {
        tracing::debug!("APPLE_MAPS_TOKEN not set; searching without a fallback source");
        return Ok(orchestrator);
    };
    let apple_maps = AppleMapsSource::with_base_url(
        token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.apple_maps_base_url,
    )?;
    Ok(orchestrator.with_fallback(Arc::new(apple_maps)))
}

/// Open the favorites database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub(crate) async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = nearbite_db::connect_pool(database_url, PoolConfig::default()).await?;
    Ok(pool)
}

/// Open and migrate the favorites database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub(crate) async fn open_favorites(database_url: &str) -> anyhow::Result<FavoritesStore> {
    let pool = connect(database_url).await?;
    let applied = nearbite_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }
    Ok(FavoritesStore::new(Arc::new(SqliteFavoriteRepository::new(pool))))
}
