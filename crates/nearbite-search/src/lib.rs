//! Nearby restaurant search for nearbite.
//!
//! Queries a primary [`CandidateSource`] (Yelp), escalates the radius when it
//! returns too few places, falls back to a secondary source (Apple Maps) when
//! it fails or still finds nothing, then deduplicates, ranks by distance, and
//! caches the result in a single-slot [`ResultCache`].

pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod rank;
pub mod source;
pub mod sources;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{CacheEntry, ResultCache};
pub use error::{SearchError, SourceError};
pub use orchestrator::SearchOrchestrator;
pub use rank::{dedup_candidates, rank_by_distance, within_distance};
pub use source::CandidateSource;
pub use sources::{infer_price_tier, AppleMapsSource, YelpSource};
