//! Candidate places and search queries.

use serde::{Deserialize, Serialize};

use crate::geo::{rounded_key, DEDUP_KEY_PRECISION};

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite and inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Price tier ordinal: `0` = unknown, `1` = `$` through `4` = `$$$$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTier(u8);

impl PriceTier {
    pub const UNKNOWN: Self = Self(0);
    pub const CHEAP: Self = Self(1);
    pub const MODERATE: Self = Self(2);
    pub const PRICEY: Self = Self(3);
    pub const LUXURY: Self = Self(4);

    /// Clamps `value` into `0..=4`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(4))
    }

    /// Parses a provider price string such as `"$$"`.
    ///
    /// Only runs of `$` (or the local-currency sign `€`/`£`) count; anything
    /// else maps to [`PriceTier::UNKNOWN`].
    #[must_use]
    pub fn from_symbols(symbols: &str) -> Self {
        let trimmed = symbols.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| matches!(c, '$' | '€' | '£')) {
            return Self::UNKNOWN;
        }
        let count = u8::try_from(trimmed.chars().count()).unwrap_or(u8::MAX);
        Self::new(count)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn symbols(self) -> &'static str {
        match self.0 {
            1 => "$",
            2 => "$$",
            3 => "$$$",
            4 => "$$$$",
            _ => "?",
        }
    }
}

/// A discovered place, as returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Provider id when available, otherwise [`derive_candidate_id`].
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub price_tier: PriceTier,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    /// Average rating in `[0.0, 5.0]`.
    pub rating: f64,
    pub review_count: u32,
    pub is_open_now: bool,
    pub categories: Vec<String>,
    /// Which candidate source produced this record (`"yelp"`, `"apple_maps"`, ...).
    pub source: String,
}

impl Candidate {
    /// Minimal candidate with every optional field empty. Adapters fill the
    /// rest in with struct-update syntax.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            price_tier: PriceTier::UNKNOWN,
            address: None,
            phone: None,
            website: None,
            image_url: None,
            rating: 0.0,
            review_count: 0,
            is_open_now: false,
            categories: Vec::new(),
            source: String::new(),
        }
    }

    /// Key used to collapse near-duplicate provider results:
    /// `lowercase(name) | rounded coordinate`.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}",
            self.name.trim().to_lowercase(),
            rounded_key(self.coordinate, DEDUP_KEY_PRECISION)
        )
    }
}

/// Input to a single candidate-source call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Coordinate,
    pub term: String,
    pub radius_m: u32,
    pub limit: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(origin: Coordinate, term: impl Into<String>, radius_m: u32, limit: u32) -> Self {
        Self {
            origin,
            term: term.into(),
            radius_m,
            limit,
        }
    }

    /// Same query at a different radius.
    #[must_use]
    pub fn with_radius(&self, radius_m: u32) -> Self {
        Self {
            radius_m,
            ..self.clone()
        }
    }
}

/// Stable id for providers that do not supply one.
///
/// SHA-256 over the dedup key, hex-encoded, so the same place yields the same
/// id across repeated queries.
#[must_use]
pub fn derive_candidate_id(name: &str, coordinate: Coordinate) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}",
        name.trim().to_lowercase(),
        rounded_key(coordinate, DEDUP_KEY_PRECISION)
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tier_parses_dollar_runs() {
        assert_eq!(PriceTier::from_symbols("$"), PriceTier::CHEAP);
        assert_eq!(PriceTier::from_symbols("$$"), PriceTier::MODERATE);
        assert_eq!(PriceTier::from_symbols(" $$$ "), PriceTier::PRICEY);
        assert_eq!(PriceTier::from_symbols("$$$$"), PriceTier::LUXURY);
        assert_eq!(PriceTier::from_symbols("€€"), PriceTier::MODERATE);
    }

    #[test]
    fn price_tier_rejects_garbage_and_clamps() {
        assert_eq!(PriceTier::from_symbols(""), PriceTier::UNKNOWN);
        assert_eq!(PriceTier::from_symbols("cheap"), PriceTier::UNKNOWN);
        assert_eq!(PriceTier::from_symbols("$$$$$$"), PriceTier::LUXURY);
        assert_eq!(PriceTier::new(9).value(), 4);
    }

    #[test]
    fn derived_id_is_deterministic_and_case_insensitive() {
        let at = Coordinate::new(37.7749, -122.4194);
        let a = derive_candidate_id("Joe's Diner", at);
        let b = derive_candidate_id("  joe's diner", at);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64, "SHA-256 hex is 64 chars");
    }

    #[test]
    fn derived_id_differs_across_grid_cells() {
        let a = derive_candidate_id("Joe's", Coordinate::new(37.7749, -122.4194));
        let b = derive_candidate_id("Joe's", Coordinate::new(37.7849, -122.4194));
        assert_ne!(a, b);
    }

    #[test]
    fn dedup_key_uses_lowercase_name_and_rounded_coordinate() {
        let c = Candidate::new("x", "Joe's", Coordinate::new(37.77491, -122.41939));
        assert_eq!(c.dedup_key(), "joe's|37.775,-122.419");
    }

    #[test]
    fn coordinate_validity() {
        assert!(Coordinate::new(37.0, -122.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn candidate_serializes_price_tier_as_number() {
        let mut c = Candidate::new("id-1", "Cafe", Coordinate::new(1.0, 2.0));
        c.price_tier = PriceTier::MODERATE;
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["price_tier"], 2);
    }
}
