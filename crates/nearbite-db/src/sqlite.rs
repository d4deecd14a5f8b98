//! SQLite-backed [`FavoriteRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nearbite_core::{Candidate, Coordinate, PriceTier};
use sqlx::SqlitePool;

use crate::favorites::{FavoriteRecord, FavoriteRepository, NewFavorite, SortOrder};
use crate::RepositoryError;

const SELECT_COLUMNS: &str = "SELECT id, candidate_id, name, latitude, longitude, price_tier, \
            address, phone, website, image_url, rating, review_count, is_open_now, \
            categories, source, saved_at \
     FROM favorites";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `favorites` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FavoriteRow {
    id: i64,
    candidate_id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    price_tier: i64,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    image_url: Option<String>,
    rating: f64,
    review_count: i64,
    is_open_now: bool,
    categories: String,
    source: String,
    saved_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for FavoriteRecord {
    type Error = RepositoryError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let record_id = row.id;
        let corrupt = |reason: String| RepositoryError::Corrupt { record_id, reason };

        let categories: Vec<String> = serde_json::from_str(&row.categories)
            .map_err(|e| corrupt(format!("categories: {e}")))?;
        let price_tier = u8::try_from(row.price_tier)
            .map(PriceTier::new)
            .map_err(|_| corrupt(format!("price_tier out of range: {}", row.price_tier)))?;
        let review_count = u32::try_from(row.review_count)
            .map_err(|_| corrupt(format!("review_count out of range: {}", row.review_count)))?;

        Ok(Self {
            record_id,
            candidate: Candidate {
                id: row.candidate_id,
                name: row.name,
                coordinate: Coordinate::new(row.latitude, row.longitude),
                price_tier,
                address: row.address,
                phone: row.phone,
                website: row.website,
                image_url: row.image_url,
                rating: row.rating,
                review_count,
                is_open_now: row.is_open_now,
                categories,
                source: row.source,
            },
            saved_at: row.saved_at,
        })
    }
}

fn into_records(rows: Vec<FavoriteRow>) -> Result<Vec<FavoriteRecord>, RepositoryError> {
    rows.into_iter().map(FavoriteRecord::try_from).collect()
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SqliteFavoriteRepository {
    pool: SqlitePool,
}

impl SqliteFavoriteRepository {
    /// Wrap an already-migrated pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepository {
    async fn insert(&self, favorite: NewFavorite) -> Result<FavoriteRecord, RepositoryError> {
        let candidate = &favorite.candidate;
        let categories = serde_json::to_string(&candidate.categories)?;

        let result = sqlx::query(
            "INSERT INTO favorites (candidate_id, name, latitude, longitude, price_tier, \
                                    address, phone, website, image_url, rating, review_count, \
                                    is_open_now, categories, source, saved_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(candidate.coordinate.latitude)
        .bind(candidate.coordinate.longitude)
        .bind(i64::from(candidate.price_tier.value()))
        .bind(&candidate.address)
        .bind(&candidate.phone)
        .bind(&candidate.website)
        .bind(&candidate.image_url)
        .bind(candidate.rating)
        .bind(i64::from(candidate.review_count))
        .bind(candidate.is_open_now)
        .bind(categories)
        .bind(&candidate.source)
        .bind(favorite.saved_at)
        .execute(&self.pool)
        .await?;

        let record_id = result.last_insert_rowid();
        tracing::debug!(record_id, candidate_id = %candidate.id, "favorite inserted");

        Ok(FavoriteRecord {
            record_id,
            candidate: favorite.candidate,
            saved_at: favorite.saved_at,
        })
    }

    async fn delete(&self, record_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(record_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_candidate(&self, candidate_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM favorites WHERE candidate_id = ?")
            .bind(candidate_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, order: SortOrder) -> Result<Vec<FavoriteRecord>, RepositoryError> {
        let order_by = match order {
            SortOrder::Ascending => "ORDER BY saved_at ASC, id ASC",
            SortOrder::Descending => "ORDER BY saved_at DESC, id DESC",
        };
        let rows = sqlx::query_as::<_, FavoriteRow>(&format!("{SELECT_COLUMNS} {order_by}"))
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn fetch_by_candidate(
        &self,
        candidate_id: &str,
    ) -> Result<Vec<FavoriteRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(&format!(
            "{SELECT_COLUMNS} WHERE candidate_id = ? ORDER BY saved_at ASC, id ASC"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        into_records(rows)
    }
}
