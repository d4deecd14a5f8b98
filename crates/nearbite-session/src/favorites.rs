//! Saved places, deduplicated by candidate id.
//!
//! The repository does not enforce uniqueness, so every write goes through a
//! single async lock that makes the check-then-insert in [`FavoritesStore::add`]
//! atomic with respect to other writers in this process.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nearbite_core::Candidate;
use nearbite_db::{FavoriteRecord, FavoriteRepository, NewFavorite, RepositoryError, SortOrder};
use tokio::sync::Mutex;

use crate::error::FavoritesError;

/// Result of [`FavoritesStore::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Inserted(FavoriteRecord),
    /// A record with this candidate id already exists; nothing was written.
    AlreadyExists,
}

impl AddOutcome {
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

pub struct FavoritesStore {
    repo: Arc<dyn FavoriteRepository>,
    write_lock: Mutex<()>,
}

fn persistence_failed(operation: &'static str) -> impl Fn(RepositoryError) -> FavoritesError {
    move |e| {
        tracing::warn!(operation, error = %e, "favorites persistence failed");
        FavoritesError::PersistenceFailed(e)
    }
}

impl FavoritesStore {
    #[must_use]
    pub fn new(repo: Arc<dyn FavoriteRepository>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn exists(&self, candidate_id: &str) -> Result<bool, FavoritesError> {
        let records = self
            .repo
            .fetch_by_candidate(candidate_id)
            .await
            .map_err(persistence_failed("exists"))?;
        Ok(!records.is_empty())
    }

    /// Save `candidate` unless a record with its id already exists.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn add(&self, candidate: &Candidate) -> Result<AddOutcome, FavoritesError> {
        self.add_at(candidate, Utc::now()).await
    }

    /// [`add`](Self::add) with an explicit save timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn add_at(
        &self,
        candidate: &Candidate,
        saved_at: DateTime<Utc>,
    ) -> Result<AddOutcome, FavoritesError> {
        let _guard = self.write_lock.lock().await;

        if self.exists(&candidate.id).await? {
            tracing::debug!(candidate_id = %candidate.id, "favorite already saved");
            return Ok(AddOutcome::AlreadyExists);
        }

        let record = self
            .repo
            .insert(NewFavorite {
                candidate: candidate.clone(),
                saved_at,
            })
            .await
            .map_err(persistence_failed("add"))?;

        tracing::info!(
            candidate_id = %candidate.id,
            record_id = record.record_id,
            name = %candidate.name,
            "favorite saved"
        );
        Ok(AddOutcome::Inserted(record))
    }

    /// Delete every record for `candidate_id`. Returns how many were removed;
    /// zero when none existed.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn remove(&self, candidate_id: &str) -> Result<u64, FavoritesError> {
        let _guard = self.write_lock.lock().await;
        let removed = self
            .repo
            .delete_by_candidate(candidate_id)
            .await
            .map_err(persistence_failed("remove"))?;
        tracing::info!(candidate_id, removed, "favorite removed");
        Ok(removed)
    }

    /// Delete a single stored record.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn remove_record(&self, record_id: i64) -> Result<bool, FavoritesError> {
        let _guard = self.write_lock.lock().await;
        self.repo
            .delete(record_id)
            .await
            .map_err(persistence_failed("remove_record"))
    }

    /// Every saved record, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    pub async fn all(&self) -> Result<Vec<FavoriteRecord>, FavoritesError> {
        self.repo
            .fetch_all(SortOrder::Descending)
            .await
            .map_err(persistence_failed("all"))
    }

    /// Keep the earliest record for each candidate id and delete the rest.
    /// Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::PersistenceFailed`] if the repository fails.
    /// Deletions made before the failure are not rolled back.
    pub async fn remove_duplicates(&self) -> Result<usize, FavoritesError> {
        let _guard = self.write_lock.lock().await;

        let records = self
            .repo
            .fetch_all(SortOrder::Ascending)
            .await
            .map_err(persistence_failed("remove_duplicates"))?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        let mut removed = 0;
        for record in &records {
            if seen.insert(record.candidate_id()) {
                continue;
            }
            if self
                .repo
                .delete(record.record_id)
                .await
                .map_err(persistence_failed("remove_duplicates"))?
            {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, "duplicate favorites removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "favorites_test.rs"]
mod tests;
