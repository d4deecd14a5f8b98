//! Repository contract tests, run against both the SQLite and the in-memory
//! implementations.

use chrono::{DateTime, TimeDelta, Utc};
use nearbite_core::{Candidate, Coordinate, PriceTier};
use nearbite_db::{
    connect_in_memory, run_migrations, FavoriteRepository, MemoryFavoriteRepository,
    NewFavorite, RepositoryError, SortOrder, SqliteFavoriteRepository,
};

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T19:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn candidate(id: &str) -> Candidate {
    Candidate {
        price_tier: PriceTier::MODERATE,
        address: Some("1 Market St, San Francisco".to_string()),
        rating: 4.5,
        review_count: 312,
        is_open_now: true,
        categories: vec!["Pizza".to_string(), "Italian".to_string()],
        source: "yelp".to_string(),
        ..Candidate::new(id, format!("Place {id}"), Coordinate::new(37.7749, -122.4194))
    }
}

fn saved(id: &str, minutes: i64) -> NewFavorite {
    NewFavorite {
        candidate: candidate(id),
        saved_at: t0() + TimeDelta::minutes(minutes),
    }
}

async fn sqlite_repo() -> SqliteFavoriteRepository {
    let pool = connect_in_memory().await.unwrap();
    run_migrations(&pool).await.unwrap();
    SqliteFavoriteRepository::new(pool)
}

async fn insert_preserves_every_field(repo: &dyn FavoriteRepository) {
    let inserted = repo.insert(saved("a", 0)).await.unwrap();

    let fetched = repo.fetch_by_candidate("a").await.unwrap();

    assert_eq!(fetched, vec![inserted.clone()]);
    assert_eq!(inserted.candidate, candidate("a"));
    assert_eq!(inserted.saved_at, t0());
}

async fn row_ids_increase(repo: &dyn FavoriteRepository) {
    let first = repo.insert(saved("a", 0)).await.unwrap();
    let second = repo.insert(saved("b", 1)).await.unwrap();

    assert!(second.record_id > first.record_id);
}

async fn fetch_all_orders_by_saved_at(repo: &dyn FavoriteRepository) {
    repo.insert(saved("middle", 5)).await.unwrap();
    repo.insert(saved("oldest", 0)).await.unwrap();
    repo.insert(saved("newest", 10)).await.unwrap();

    let desc = repo.fetch_all(SortOrder::Descending).await.unwrap();
    let asc = repo.fetch_all(SortOrder::Ascending).await.unwrap();

    let ids = |records: &[nearbite_db::FavoriteRecord]| -> Vec<String> {
        records.iter().map(|r| r.candidate.id.clone()).collect()
    };
    assert_eq!(ids(&desc), vec!["newest", "middle", "oldest"]);
    assert_eq!(ids(&asc), vec!["oldest", "middle", "newest"]);
}

async fn duplicates_are_stored_and_deleted_together(repo: &dyn FavoriteRepository) {
    repo.insert(saved("dup", 0)).await.unwrap();
    repo.insert(saved("dup", 1)).await.unwrap();
    repo.insert(saved("other", 2)).await.unwrap();

    assert_eq!(repo.fetch_by_candidate("dup").await.unwrap().len(), 2);

    let removed = repo.delete_by_candidate("dup").await.unwrap();

    assert_eq!(removed, 2);
    assert!(repo.fetch_by_candidate("dup").await.unwrap().is_empty());
    assert_eq!(repo.fetch_all(SortOrder::Ascending).await.unwrap().len(), 1);
}

async fn delete_by_row_id(repo: &dyn FavoriteRepository) {
    let keep = repo.insert(saved("dup", 0)).await.unwrap();
    let drop = repo.insert(saved("dup", 1)).await.unwrap();

    assert!(repo.delete(drop.record_id).await.unwrap());
    assert!(!repo.delete(drop.record_id).await.unwrap(), "second delete is a no-op");

    let left = repo.fetch_by_candidate("dup").await.unwrap();
    assert_eq!(left, vec![keep]);
}

async fn deleting_unknown_candidate_removes_nothing(repo: &dyn FavoriteRepository) {
    assert_eq!(repo.delete_by_candidate("missing").await.unwrap(), 0);
}

macro_rules! contract_tests {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[tokio::test]
            async fn insert_preserves_every_field() {
                super::insert_preserves_every_field(&$make).await;
            }

            #[tokio::test]
            async fn row_ids_increase() {
                super::row_ids_increase(&$make).await;
            }

            #[tokio::test]
            async fn fetch_all_orders_by_saved_at() {
                super::fetch_all_orders_by_saved_at(&$make).await;
            }

            #[tokio::test]
            async fn duplicates_are_stored_and_deleted_together() {
                super::duplicates_are_stored_and_deleted_together(&$make).await;
            }

            #[tokio::test]
            async fn delete_by_row_id() {
                super::delete_by_row_id(&$make).await;
            }

            #[tokio::test]
            async fn deleting_unknown_candidate_removes_nothing() {
                super::deleting_unknown_candidate_removes_nothing(&$make).await;
            }
        }
    };
}

contract_tests!(sqlite, sqlite_repo().await);
contract_tests!(memory, MemoryFavoriteRepository::new());

#[tokio::test]
async fn unavailable_memory_repository_fails_every_call() {
    let repo = MemoryFavoriteRepository::new();
    repo.set_unavailable(true);

    let err = repo.insert(saved("a", 0)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Sqlx(_)), "got {err:?}");
    assert!(repo.fetch_all(SortOrder::Ascending).await.is_err());
    assert!(repo.is_empty());

    repo.set_unavailable(false);
    repo.insert(saved("a", 0)).await.unwrap();
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn sqlite_rejects_corrupt_categories() {
    let repo = sqlite_repo().await;
    let record = repo.insert(saved("a", 0)).await.unwrap();

    sqlx::query("UPDATE favorites SET categories = 'not json' WHERE id = ?")
        .bind(record.record_id)
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.fetch_all(SortOrder::Ascending).await.unwrap_err();
    assert!(
        matches!(err, RepositoryError::Corrupt { record_id, .. } if record_id == record.record_id),
        "got {err:?}"
    );
}
