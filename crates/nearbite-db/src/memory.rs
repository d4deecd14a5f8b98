//! In-process [`FavoriteRepository`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::favorites::{FavoriteRecord, FavoriteRepository, NewFavorite, SortOrder};
use crate::RepositoryError;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    records: Vec<FavoriteRecord>,
}

/// Keeps favorites in a `Vec`, assigning increasing row ids like SQLite does.
///
/// [`set_unavailable`](Self::set_unavailable) makes every call fail as a
/// closed pool would, for exercising persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryFavoriteRepository {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl MemoryFavoriteRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Sqlx(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn sort(records: &mut [FavoriteRecord], order: SortOrder) {
    records.sort_by(|a, b| {
        let ascending = a
            .saved_at
            .cmp(&b.saved_at)
            .then(a.record_id.cmp(&b.record_id));
        match order {
            SortOrder::Ascending => ascending,
            SortOrder::Descending => ascending.reverse(),
        }
    });
}

#[async_trait]
impl FavoriteRepository for MemoryFavoriteRepository {
    async fn insert(&self, favorite: NewFavorite) -> Result<FavoriteRecord, RepositoryError> {
        self.check_available()?;
        let mut state = self.lock();
        state.next_id += 1;
        let record = FavoriteRecord {
            record_id: state.next_id,
            candidate: favorite.candidate,
            saved_at: favorite.saved_at,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, record_id: i64) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut state = self.lock();
        let before = state.records.len();
        state.records.retain(|r| r.record_id != record_id);
        Ok(state.records.len() < before)
    }

    async fn delete_by_candidate(&self, candidate_id: &str) -> Result<u64, RepositoryError> {
        self.check_available()?;
        let mut state = self.lock();
        let before = state.records.len();
        state.records.retain(|r| r.candidate.id != candidate_id);
        Ok(u64::try_from(before - state.records.len()).unwrap_or(u64::MAX))
    }

    async fn fetch_all(&self, order: SortOrder) -> Result<Vec<FavoriteRecord>, RepositoryError> {
        self.check_available()?;
        let mut records = self.lock().records.clone();
        sort(&mut records, order);
        Ok(records)
    }

    async fn fetch_by_candidate(
        &self,
        candidate_id: &str,
    ) -> Result<Vec<FavoriteRecord>, RepositoryError> {
        self.check_available()?;
        let mut records: Vec<FavoriteRecord> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.candidate.id == candidate_id)
            .cloned()
            .collect();
        sort(&mut records, SortOrder::Ascending);
        Ok(records)
    }
}
