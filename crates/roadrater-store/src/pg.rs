//! PostgreSQL storage backend.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use roadrater_core::{
    round_to_two, PageParams, Rating, RatingStats, RoadSegment, RoadSummary, User,
};

use crate::error::{Result, StoreError};
use crate::{schema, Store, SubmittedRating};

/// PostgreSQL unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

const SEGMENT_COLUMNS: &str = "id, name, latitude, longitude, created_at";
const RATING_COLUMNS: &str = "id, segment_id, user_id, rating, comment, created_at";
const USER_COLUMNS: &str = "id, username, password_hash, created_at";

/// PostgreSQL-backed [`Store`].
///
/// Holds a connection pool; clones share it. Transactions acquired for
/// the rating submission roll back automatically when dropped on an
/// error path, so connections always return to the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and build a pooled store.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the schema DDL. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in schema::all_statements() {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database schema ensured");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let inserted = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn segment_by_id(&self, id: i64) -> Result<Option<RoadSegment>> {
        let segment = sqlx::query_as::<_, RoadSegment>(&format!(
            "SELECT {SEGMENT_COLUMNS} FROM road_segments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(segment)
    }

    async fn list_segments_page(&self, page: PageParams) -> Result<(Vec<RoadSummary>, i64)> {
        let mut roads = sqlx::query_as::<_, RoadSummary>(
            "SELECT s.id, s.name, s.latitude, s.longitude, s.created_at, \
             COUNT(r.id) AS rating_count, \
             COALESCE(AVG(r.rating), 0)::float8 AS average_rating \
             FROM road_segments s \
             LEFT JOIN ratings r ON r.segment_id = s.id \
             GROUP BY s.id \
             ORDER BY s.id ASC \
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        for road in &mut roads {
            road.average_rating = round_to_two(road.average_rating);
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM road_segments")
            .fetch_one(&self.pool)
            .await?;

        Ok((roads, total))
    }

    async fn top_segments(&self, limit: i64) -> Result<Vec<RoadSummary>> {
        // NULLS LAST keeps unrated segments behind any rated one.
        let mut roads = sqlx::query_as::<_, RoadSummary>(
            "SELECT s.id, s.name, s.latitude, s.longitude, s.created_at, \
             COUNT(r.id) AS rating_count, \
             COALESCE(AVG(r.rating), 0)::float8 AS average_rating \
             FROM road_segments s \
             LEFT JOIN ratings r ON r.segment_id = s.id \
             GROUP BY s.id \
             ORDER BY AVG(r.rating) DESC NULLS LAST, COUNT(r.id) DESC, s.id ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        for road in &mut roads {
            road.average_rating = round_to_two(road.average_rating);
        }

        Ok(roads)
    }

    async fn ratings_for_segment(&self, segment_id: i64) -> Result<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE segment_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(segment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ratings)
    }

    async fn segment_stats(&self, segment_id: i64) -> Result<RatingStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count, \
             COALESCE(AVG(rating), 0)::float8 AS average, \
             COALESCE(MIN(rating), 0) AS min, \
             COALESCE(MAX(rating), 0) AS max \
             FROM ratings WHERE segment_id = $1",
        )
        .bind(segment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingStats {
            count: row.try_get("count")?,
            average: round_to_two(row.try_get("average")?),
            min: row.try_get("min")?,
            max: row.try_get("max")?,
        })
    }

    async fn submit_rating(
        &self,
        segment_id: i64,
        user_id: i64,
        score: i32,
        comment: Option<&str>,
    ) -> Result<SubmittedRating> {
        let mut tx = self.pool.begin().await?;

        // Existence check inside the transaction, not just the FK:
        // returning early here drops the transaction and rolls back.
        let segment = sqlx::query_as::<_, RoadSegment>(&format!(
            "SELECT {SEGMENT_COLUMNS} FROM road_segments WHERE id = $1"
        ))
        .bind(segment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(segment) = segment else {
            return Err(StoreError::NotFound {
                entity: "Road segment",
                id: segment_id,
            });
        };

        let rating = sqlx::query_as::<_, Rating>(&format!(
            "INSERT INTO ratings (segment_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) RETURNING {RATING_COLUMNS}"
        ))
        .bind(segment_id)
        .bind(user_id)
        .bind(score)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        // Recomputed over the row set that includes the insert above.
        let average: f64 =
            sqlx::query_scalar("SELECT AVG(rating)::float8 FROM ratings WHERE segment_id = $1")
                .bind(segment_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(SubmittedRating {
            rating,
            segment,
            new_average: round_to_two(average),
        })
    }
}
