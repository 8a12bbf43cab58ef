//! Road listing and leaderboard handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use roadrater_core::{PageParams, RoadSummary};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::response;
use crate::state::AppState;

/// Leaderboard size for `GET /top5`.
const TOP_ROADS_LIMIT: i64 = 5;

/// Raw pagination query; out-of-range values are clamped, not rejected.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Rows per page (default 25, max 100).
    pub limit: Option<i64>,
}

/// Paged road listing payload.
#[derive(Debug, Serialize)]
pub struct RoadsPage {
    /// Segments in this page, with aggregates.
    pub roads: Vec<RoadSummary>,
    /// Number of rows in this page.
    pub count: usize,
    /// Total number of segments.
    pub total: i64,
    /// Effective page after clamping.
    pub page: i64,
    /// Effective limit after clamping.
    pub limit: i64,
}

/// Single road payload.
#[derive(Debug, Serialize)]
pub struct RoadData {
    /// The segment merged with its aggregate statistics.
    pub road: RoadSummary,
}

/// Leaderboard payload.
#[derive(Debug, Serialize)]
pub struct TopRoads {
    /// Number of entries returned (at most 5).
    pub count: usize,
    /// Best-rated segments, unrated ones last.
    pub roads: Vec<RoadSummary>,
}

/// List road segments with aggregate ratings, paged.
pub async fn list_roads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams::clamped(query.page, query.limit);
    let (roads, total) = state.store.list_segments_page(page).await?;

    Ok(response::ok(RoadsPage {
        count: roads.len(),
        roads,
        total,
        page: page.page,
        limit: page.limit,
    }))
}

/// Fetch one road segment merged with its aggregate statistics.
pub async fn get_road(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "id")?;

    let segment = state
        .store
        .segment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Road segment not found".to_string()))?;
    let stats = state.store.segment_stats(id).await?;

    Ok(response::ok(RoadData {
        road: RoadSummary::from_segment(segment, &stats),
    }))
}

/// The five best-rated road segments, ties broken by rating count.
pub async fn top_roads(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let roads = state.store.top_segments(TOP_ROADS_LIMIT).await?;

    Ok(response::ok(TopRoads {
        count: roads.len(),
        roads,
    }))
}
