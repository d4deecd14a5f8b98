//! Single-slot cache of the last successful search.
//!
//! Validity is recomputed on every lookup from the entry's age and the
//! distance moved since it was created; there is no background expiry.

use chrono::{DateTime, TimeDelta, Utc};
use nearbite_core::{distance_meters, Candidate, CacheSettings, Coordinate};

/// The cached result of one fresh search.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub origin: Coordinate,
    pub created_at: DateTime<Utc>,
    pub results: Vec<Candidate>,
}

/// Holds at most one [`CacheEntry`].
///
/// Every [`clear`](ResultCache::clear) bumps a generation counter. A search
/// captures the generation before it starts and stores through
/// [`store_if_current`](ResultCache::store_if_current), so a response that
/// was in flight across a clear can never repopulate the cache.
#[derive(Debug)]
pub struct ResultCache {
    settings: CacheSettings,
    entry: Option<CacheEntry>,
    generation: u64,
}

impl ResultCache {
    #[must_use]
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            entry: None,
            generation: 0,
        }
    }

    /// Cached results for `origin` at `now`, if the entry is fresh enough and
    /// close enough.
    ///
    /// Returns `Some` only if an entry exists, `now - created_at` is strictly
    /// below the validity window, and the distance between `origin` and the
    /// entry's origin is strictly below the movement threshold.
    #[must_use]
    pub fn valid(&self, origin: Coordinate, now: DateTime<Utc>) -> Option<Vec<Candidate>> {
        let entry = self.entry.as_ref()?;

        let window = TimeDelta::from_std(self.settings.validity_window).unwrap_or(TimeDelta::MAX);
        let age = now.signed_duration_since(entry.created_at);
        if age >= window {
            return None;
        }

        if distance_meters(origin, entry.origin) >= self.settings.movement_threshold_m {
            return None;
        }

        Some(entry.results.clone())
    }

    /// Replace the entry unconditionally.
    pub fn store(&mut self, origin: Coordinate, now: DateTime<Utc>, results: Vec<Candidate>) {
        self.entry = Some(CacheEntry {
            origin,
            created_at: now,
            results,
        });
    }

    /// Replace the entry only if no [`clear`](Self::clear) happened since
    /// `generation` was read. Returns whether the entry was written.
    pub fn store_if_current(
        &mut self,
        generation: u64,
        origin: Coordinate,
        now: DateTime<Utc>,
        results: Vec<Candidate>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.store(origin, now, results);
        true
    }

    pub fn clear(&mut self) {
        self.entry = None;
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> CacheSettings {
        self.settings
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheSettings::default())
    }
}
