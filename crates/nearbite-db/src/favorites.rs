//! Favorite record types and the storage contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nearbite_core::Candidate;

use crate::RepositoryError;

/// A candidate about to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub candidate: Candidate,
    pub saved_at: DateTime<Utc>,
}

/// A saved candidate as stored.
///
/// `record_id` is the storage row id. The candidate's own `id` is the logical
/// key; the store does not guarantee it is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteRecord {
    pub record_id: i64,
    pub candidate: Candidate,
    pub saved_at: DateTime<Utc>,
}

impl FavoriteRecord {
    #[must_use]
    pub fn candidate_id(&self) -> &str {
        &self.candidate.id
    }
}

/// Ordering by `saved_at`, ties broken by `record_id` in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Insert unconditionally and return the stored record.
    async fn insert(&self, favorite: NewFavorite) -> Result<FavoriteRecord, RepositoryError>;

    /// Delete one record by row id. Returns whether a row was removed.
    async fn delete(&self, record_id: i64) -> Result<bool, RepositoryError>;

    /// Delete every record for `candidate_id`. Returns the number removed.
    async fn delete_by_candidate(&self, candidate_id: &str) -> Result<u64, RepositoryError>;

    async fn fetch_all(&self, order: SortOrder) -> Result<Vec<FavoriteRecord>, RepositoryError>;

    /// Records for `candidate_id`, oldest first.
    async fn fetch_by_candidate(
        &self,
        candidate_id: &str,
    ) -> Result<Vec<FavoriteRecord>, RepositoryError>;
}
