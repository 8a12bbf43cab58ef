//! In-memory storage backend.
//!
//! Mirrors the semantics of [`crate::PgStore`] over `Mutex`-guarded
//! tables, including the all-or-nothing rating submission (the whole
//! compound operation runs under one lock). Intended for tests.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use roadrater_core::{
    round_to_two, PageParams, Rating, RatingStats, RoadSegment, RoadSummary, User,
};

use crate::error::{Result, StoreError};
use crate::{Store, SubmittedRating};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    segments: Vec<RoadSegment>,
    ratings: Vec<Rating>,
}

impl Tables {
    fn scores_for(&self, segment_id: i64) -> Vec<i32> {
        self.ratings
            .iter()
            .filter(|r| r.segment_id == segment_id)
            .map(|r| r.rating)
            .collect()
    }

    fn average_of(scores: &[i32]) -> Option<f64> {
        if scores.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = f64::from(scores.iter().sum::<i32>()) / scores.len() as f64;
        Some(mean)
    }

    fn stats_for(&self, segment_id: i64) -> RatingStats {
        let scores = self.scores_for(segment_id);
        RatingStats {
            count: scores.len() as i64,
            average: Self::average_of(&scores).map_or(0.0, round_to_two),
            min: scores.iter().copied().min().unwrap_or(0),
            max: scores.iter().copied().max().unwrap_or(0),
        }
    }

    fn summarize(&self, segment: &RoadSegment) -> (RoadSummary, Option<f64>) {
        let scores = self.scores_for(segment.id);
        let raw_average = Self::average_of(&scores);
        let summary = RoadSummary {
            id: segment.id,
            name: segment.name.clone(),
            latitude: segment.latitude,
            longitude: segment.longitude,
            created_at: segment.created_at,
            rating_count: scores.len() as i64,
            average_rating: raw_average.map_or(0.0, round_to_two),
        };
        (summary, raw_average)
    }
}

/// In-memory [`Store`] for tests.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: Mutex<Tables>,
}

impl MemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a road segment with an explicit id (segments are externally
    /// managed in production; tests seed them directly).
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn seed_segment(
        &self,
        id: i64,
        name: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> RoadSegment {
        let segment = RoadSegment {
            id,
            name: name.to_string(),
            latitude,
            longitude,
            created_at: Utc::now(),
        };
        let mut tables = self.tables.lock().expect("mem store lock poisoned");
        tables.segments.push(segment.clone());
        segment
    }

    /// Number of rating rows currently stored (for write-free assertions).
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn rating_count(&self) -> usize {
        self.tables
            .lock()
            .expect("mem store lock poisoned")
            .ratings
            .len()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("mem store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }
        let user = User {
            id: tables.users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn segment_by_id(&self, id: i64) -> Result<Option<RoadSegment>> {
        let tables = self.lock()?;
        Ok(tables.segments.iter().find(|s| s.id == id).cloned())
    }

    async fn list_segments_page(&self, page: PageParams) -> Result<(Vec<RoadSummary>, i64)> {
        let tables = self.lock()?;
        let mut segments: Vec<&RoadSegment> = tables.segments.iter().collect();
        segments.sort_by_key(|s| s.id);

        let roads = segments
            .iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .map(|segment| tables.summarize(segment).0)
            .collect();

        Ok((roads, tables.segments.len() as i64))
    }

    async fn top_segments(&self, limit: i64) -> Result<Vec<RoadSummary>> {
        let tables = self.lock()?;
        let mut summaries: Vec<(RoadSummary, Option<f64>)> = tables
            .segments
            .iter()
            .map(|segment| tables.summarize(segment))
            .collect();

        // Average descending with unrated (None) last, ties by count
        // descending, then id for stability.
        summaries.sort_by(|(a, a_avg), (b, b_avg)| match (a_avg, b_avg) {
            (None, None) => a.id.cmp(&b.id),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => y
                .partial_cmp(x)
                .unwrap_or(Ordering::Equal)
                .then(b.rating_count.cmp(&a.rating_count))
                .then(a.id.cmp(&b.id)),
        });

        summaries.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(summaries.into_iter().map(|(summary, _)| summary).collect())
    }

    async fn ratings_for_segment(&self, segment_id: i64) -> Result<Vec<Rating>> {
        let tables = self.lock()?;
        let mut ratings: Vec<Rating> = tables
            .ratings
            .iter()
            .filter(|r| r.segment_id == segment_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(ratings)
    }

    async fn segment_stats(&self, segment_id: i64) -> Result<RatingStats> {
        let tables = self.lock()?;
        Ok(tables.stats_for(segment_id))
    }

    async fn submit_rating(
        &self,
        segment_id: i64,
        user_id: i64,
        score: i32,
        comment: Option<&str>,
    ) -> Result<SubmittedRating> {
        // One lock span covers the whole compound operation, so the
        // existence check, insert, and average are atomic here too.
        let mut tables = self.lock()?;

        let Some(segment) = tables
            .segments
            .iter()
            .find(|s| s.id == segment_id)
            .cloned()
        else {
            return Err(StoreError::NotFound {
                entity: "Road segment",
                id: segment_id,
            });
        };

        let rating = Rating {
            id: tables.ratings.len() as i64 + 1,
            segment_id,
            user_id,
            rating: score,
            comment: comment.map(ToString::to_string),
            created_at: Utc::now(),
        };
        tables.ratings.push(rating.clone());

        let scores = tables.scores_for(segment_id);
        let new_average = Tables::average_of(&scores).map_or(0.0, round_to_two);

        Ok(SubmittedRating {
            rating,
            segment,
            new_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submitted_average_includes_the_new_row() {
        let store = MemStore::new();
        store.seed_segment(1, "Main Street", None, None);

        let first = store.submit_rating(1, 10, 4, None).await.unwrap();
        assert!((first.new_average - 4.0).abs() < f64::EPSILON);

        let second = store.submit_rating(1, 11, 5, Some("Smooth")).await.unwrap();
        assert!((second.new_average - 4.5).abs() < f64::EPSILON);
        assert_eq!(second.segment.id, 1);
        assert_eq!(second.rating.rating, 5);
        assert_eq!(second.rating.comment.as_deref(), Some("Smooth"));
    }

    #[tokio::test]
    async fn average_is_rounded_to_two_decimals() {
        let store = MemStore::new();
        store.seed_segment(1, "Main Street", None, None);

        store.submit_rating(1, 10, 5, None).await.unwrap();
        store.submit_rating(1, 11, 4, None).await.unwrap();
        let third = store.submit_rating(1, 12, 4, None).await.unwrap();

        // 13 / 3 = 4.333...
        assert!((third.new_average - 4.33).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_segment_writes_nothing() {
        let store = MemStore::new();

        let err = store.submit_rating(42, 10, 3, None).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: "Road segment",
                id: 42
            }
        ));
        assert_eq!(store.rating_count(), 0);
    }

    #[tokio::test]
    async fn ratings_come_back_most_recent_first() {
        let store = MemStore::new();
        store.seed_segment(1, "Main Street", None, None);

        for score in [1, 2, 3] {
            store.submit_rating(1, 10, score, None).await.unwrap();
        }

        let ratings = store.ratings_for_segment(1).await.unwrap();
        let scores: Vec<i32> = ratings.iter().map(|r| r.rating).collect();
        assert_eq!(scores, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn stats_are_zero_for_unrated_segments() {
        let store = MemStore::new();
        store.seed_segment(1, "Main Street", None, None);

        let stats = store.segment_stats(1).await.unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.average.abs() < f64::EPSILON);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 0);
    }

    #[tokio::test]
    async fn stats_report_count_average_min_max() {
        let store = MemStore::new();
        store.seed_segment(1, "Main Street", None, None);
        for score in [2, 5, 3] {
            store.submit_rating(1, 10, score, None).await.unwrap();
        }

        let stats = store.segment_stats(1).await.unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.average - 3.33).abs() < f64::EPSILON);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 5);
    }

    #[tokio::test]
    async fn unrated_segments_never_outrank_rated_ones() {
        let store = MemStore::new();
        store.seed_segment(1, "Rated Low", None, None);
        store.seed_segment(2, "Unrated", None, None);
        store.submit_rating(1, 10, 1, None).await.unwrap();

        let top = store.top_segments(5).await.unwrap();
        let ids: Vec<i64> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn top_ties_break_on_rating_count() {
        let store = MemStore::new();
        store.seed_segment(1, "One Five", None, None);
        store.seed_segment(2, "Two Fives", None, None);
        store.submit_rating(1, 10, 5, None).await.unwrap();
        store.submit_rating(2, 10, 5, None).await.unwrap();
        store.submit_rating(2, 11, 5, None).await.unwrap();

        let top = store.top_segments(5).await.unwrap();
        let ids: Vec<i64> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn pagination_returns_requested_window_and_total() {
        let store = MemStore::new();
        for id in 1..=3 {
            store.seed_segment(id, &format!("Segment {id}"), None, None);
        }

        let (roads, total) = store
            .list_segments_page(PageParams::clamped(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].id, 3);
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = MemStore::new();
        store.create_user("freshroadie1", "hash-a").await.unwrap();

        let err = store.create_user("freshroadie1", "hash-b").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername { .. }));
    }
}
