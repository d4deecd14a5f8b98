//! Search orchestration.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use nearbite_core::{Candidate, CacheSettings, Coordinate, SearchQuery, SearchSettings};

use crate::cache::ResultCache;
use crate::error::{SearchError, SourceError};
use crate::rank::prepare_results;
use crate::source::CandidateSource;

/// Coordinates the primary and fallback sources, post-processing, and the
/// result cache.
///
/// Shared behind an `Arc` by a session; the cache is the only mutable state
/// and sits behind a mutex that is never held across an `await`.
pub struct SearchOrchestrator {
    primary: Arc<dyn CandidateSource>,
    fallback: Option<Arc<dyn CandidateSource>>,
    settings: SearchSettings,
    cache: Mutex<ResultCache>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(
        primary: Arc<dyn CandidateSource>,
        settings: SearchSettings,
        cache_settings: CacheSettings,
    ) -> Self {
        Self {
            primary,
            fallback: None,
            settings,
            cache: Mutex::new(ResultCache::new(cache_settings)),
        }
    }

    /// Use `fallback` when the primary fails or finds nothing.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn CandidateSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Drop any cached result. Searches already in flight will not repopulate
    /// the cache.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        tracing::debug!("result cache cleared");
    }

    /// Cached results for `origin` at `now`, without touching any source.
    #[must_use]
    pub fn cached(&self, origin: Coordinate, now: DateTime<Utc>) -> Option<Vec<Candidate>> {
        self.lock_cache().valid(origin, now)
    }

    /// Find nearby candidates for `origin` as of the current time.
    ///
    /// # Errors
    ///
    /// See [`find_nearby_at`](Self::find_nearby_at).
    pub async fn find_nearby(&self, origin: Coordinate) -> Result<Vec<Candidate>, SearchError> {
        self.find_nearby_at(origin, Utc::now()).await
    }

    /// Find nearby candidates for `origin`, treating `now` as the current time.
    ///
    /// 1. A valid cache entry is returned as-is (no source calls).
    /// 2. Otherwise the primary is queried at the default radius.
    /// 3. Too few primary results trigger one expanded-radius re-query whose
    ///    response replaces the narrow one.
    /// 4. A primary failure, or an empty primary result, triggers one call to
    ///    the fallback.
    /// 5. Results are deduplicated, ranked by distance, bounded, cached, and
    ///    returned.
    ///
    /// # Errors
    ///
    /// - [`SearchError::SearchFailed`] if no source produced a usable response.
    /// - [`SearchError::NoResults`] if nothing survived post-processing.
    pub async fn find_nearby_at(
        &self,
        origin: Coordinate,
        now: DateTime<Utc>,
    ) -> Result<Vec<Candidate>, SearchError> {
        let generation = {
            let cache = self.lock_cache();
            if let Some(hit) = cache.valid(origin, now) {
                tracing::debug!(%origin, count = hit.len(), "serving cached search results");
                return Ok(hit);
            }
            cache.generation()
        };

        let raw = self.fetch_raw(origin).await.map_err(|e| {
            tracing::warn!(%origin, error = %e, "search failed on every source");
            SearchError::SearchFailed(e)
        })?;

        let ranked = prepare_results(origin, raw, self.settings.distance_bound_m());
        if ranked.is_empty() {
            tracing::info!(%origin, "search produced no usable results");
            return Err(SearchError::NoResults);
        }

        let stored = self
            .lock_cache()
            .store_if_current(generation, origin, now, ranked.clone());
        if !stored {
            tracing::debug!(%origin, "cache was cleared during search; result not cached");
        }

        tracing::info!(%origin, count = ranked.len(), "search complete");
        Ok(ranked)
    }

    /// Query sources until one yields a usable response.
    ///
    /// Escalation and fallback are each one-shot; nothing here loops.
    async fn fetch_raw(&self, origin: Coordinate) -> Result<Vec<Candidate>, SourceError> {
        let query = SearchQuery::new(
            origin,
            self.settings.term.clone(),
            self.settings.default_radius_m,
            self.settings.result_limit,
        );

        let narrow = match self.primary.search(&query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    source = self.primary.name(),
                    %origin,
                    error = %e,
                    "primary search failed"
                );
                return self.fall_back(&query, Err(e)).await;
            }
        };

        if narrow.len() >= self.settings.min_results {
            return Ok(narrow);
        }

        let expanded_query = query.with_radius(self.settings.expanded_radius_m);
        tracing::debug!(
            source = self.primary.name(),
            %origin,
            count = narrow.len(),
            radius_m = expanded_query.radius_m,
            "too few results; expanding search radius"
        );

        match self.primary.search(&expanded_query).await {
            Ok(expanded) if expanded.is_empty() => self.fall_back(&query, Ok(expanded)).await,
            Ok(expanded) => Ok(expanded),
            Err(e) if narrow.is_empty() => {
                tracing::warn!(
                    source = self.primary.name(),
                    %origin,
                    error = %e,
                    "expanded-radius search failed with nothing to keep"
                );
                self.fall_back(&query, Err(e)).await
            }
            Err(e) => {
                // Keep the narrow response rather than discarding real results.
                tracing::warn!(
                    source = self.primary.name(),
                    %origin,
                    error = %e,
                    "expanded-radius search failed; keeping narrow results"
                );
                Ok(narrow)
            }
        }
    }

    /// One call to the fallback source, or `primary_outcome` unchanged when
    /// no fallback is configured.
    async fn fall_back(
        &self,
        query: &SearchQuery,
        primary_outcome: Result<Vec<Candidate>, SourceError>,
    ) -> Result<Vec<Candidate>, SourceError> {
        let Some(fallback) = &self.fallback else {
            return primary_outcome;
        };

        match fallback.search(query).await {
            Ok(results) => {
                tracing::info!(
                    source = fallback.name(),
                    origin = %query.origin,
                    count = results.len(),
                    "using fallback search results"
                );
                Ok(results)
            }
            Err(e) => {
                tracing::warn!(
                    source = fallback.name(),
                    origin = %query.origin,
                    error = %e,
                    "fallback search failed"
                );
                Err(e)
            }
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResultCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
