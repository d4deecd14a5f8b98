use std::time::Duration;

/// Tuning for the search orchestrator.
///
/// Every threshold is a parameter rather than a constant: app variants have
/// historically disagreed on them, so callers may override any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub term: String,
    pub default_radius_m: u32,
    pub expanded_radius_m: u32,
    /// Primary results below this count trigger one expanded-radius re-query.
    pub min_results: usize,
    pub result_limit: u32,
    /// Candidates farther than `factor * expanded_radius_m` are discarded.
    pub distance_bound_factor: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            term: "restaurants".to_string(),
            default_radius_m: 5_000,
            expanded_radius_m: 10_000,
            min_results: 3,
            result_limit: 50,
            distance_bound_factor: 1.5,
        }
    }
}

impl SearchSettings {
    /// Maximum distance from the origin a ranked candidate may have.
    #[must_use]
    pub fn distance_bound_m(&self) -> f64 {
        f64::from(self.expanded_radius_m) * self.distance_bound_factor
    }
}

/// Validity rules for the single-slot result cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSettings {
    pub validity_window: Duration,
    pub movement_threshold_m: f64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            validity_window: Duration::from_secs(300),
            movement_threshold_m: 500.0,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub yelp_api_key: String,
    pub yelp_base_url: String,
    pub apple_maps_token: Option<String>,
    pub apple_maps_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search: SearchSettings,
    pub cache: CacheSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("log_level", &self.log_level)
            .field("yelp_api_key", &"[redacted]")
            .field("yelp_base_url", &self.yelp_base_url)
            .field(
                "apple_maps_token",
                &self.apple_maps_token.as_ref().map(|_| "[redacted]"),
            )
            .field("apple_maps_base_url", &self.apple_maps_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search", &self.search)
            .field("cache", &self.cache)
            .finish()
    }
}
