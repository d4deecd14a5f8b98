use std::time::Duration;

use crate::app_config::{AppConfig, CacheSettings, SearchSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the process environment
/// so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive number, got {value}"),
            })
        }
    };

    let yelp_api_key = require("YELP_API_KEY")?;
    let apple_maps_token = lookup("APPLE_MAPS_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let database_url = or_default("NEARBITE_DATABASE_URL", "sqlite://nearbite.db");
    let log_level = or_default("NEARBITE_LOG_LEVEL", "info");
    let yelp_base_url = or_default("NEARBITE_YELP_BASE_URL", "https://api.yelp.com");
    let apple_maps_base_url = or_default(
        "NEARBITE_APPLE_MAPS_BASE_URL",
        "https://maps-api.apple.com",
    );
    let request_timeout_secs = parse_u64("NEARBITE_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("NEARBITE_USER_AGENT", "nearbite/0.1 (restaurant-discovery)");

    let term = or_default("NEARBITE_SEARCH_TERM", "restaurants");
    let default_radius_m = parse_u32("NEARBITE_DEFAULT_RADIUS_M", "5000")?;
    let expanded_radius_m = parse_u32("NEARBITE_EXPANDED_RADIUS_M", "10000")?;
    if expanded_radius_m < default_radius_m {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEARBITE_EXPANDED_RADIUS_M".to_string(),
            reason: format!(
                "expanded radius ({expanded_radius_m}) must be >= default radius ({default_radius_m})"
            ),
        });
    }
    let min_results = parse_usize("NEARBITE_MIN_RESULTS", "3")?;
    let result_limit = parse_u32("NEARBITE_RESULT_LIMIT", "50")?;
    let distance_bound_factor = parse_positive_f64("NEARBITE_DISTANCE_BOUND_FACTOR", "1.5")?;

    let cache_ttl_secs = parse_u64("NEARBITE_CACHE_TTL_SECS", "300")?;
    let movement_threshold_m = parse_positive_f64("NEARBITE_CACHE_MOVEMENT_M", "500")?;

    Ok(AppConfig {
        database_url,
        log_level,
        yelp_api_key,
        yelp_base_url,
        apple_maps_token,
        apple_maps_base_url,
        request_timeout_secs,
        user_agent,
        search: SearchSettings {
            term,
            default_radius_m,
            expanded_radius_m,
            min_results,
            result_limit,
            distance_bound_factor,
        },
        cache: CacheSettings {
            validity_window: Duration::from_secs(cache_ttl_secs),
            movement_threshold_m,
        },
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
