//! The candidate source abstraction.

use async_trait::async_trait;
use nearbite_core::{Candidate, SearchQuery};

use crate::error::SourceError;

/// One external place-search provider.
///
/// Implementations return `Ok(vec![])` when the provider legitimately finds
/// nothing and reserve `Err` for transport/provider failures (timeout, bad
/// status, decode failure, rejected credentials).
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short stable name used in logs and on [`Candidate::source`].
    fn name(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError>;
}
