//! Analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use shelf_core::analytics::{
    AnalyticsData, CategoryDistribution, Insight, OverallStats, Period, RatingBucket,
    TimeSeriesPoint,
};

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn resolve(&self, default: Period) -> Result<Period, AppError> {
        match self.period.as_deref() {
            Some(raw) => raw.parse().map_err(|e: String| AppError::bad_request(&e)),
            None => Ok(default),
        }
    }
}

/// GET /api/analytics - Every analytics facet for one period
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<AnalyticsData>, AppError> {
    let period = params.resolve(state.config.default_period)?;
    Ok(Json(state.analytics.all_analytics(period).await?))
}

/// GET /api/analytics/stats
pub async fn get_overall_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverallStats>, AppError> {
    Ok(Json(state.analytics.overall_stats().await?))
}

/// GET /api/analytics/timeseries
pub async fn get_time_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<TimeSeriesPoint>>, AppError> {
    let period = params.resolve(state.config.default_period)?;
    Ok(Json(state.analytics.time_series(period).await?))
}

/// GET /api/analytics/categories
pub async fn get_category_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryDistribution>>, AppError> {
    Ok(Json(state.analytics.category_distribution().await?))
}

/// GET /api/analytics/ratings
pub async fn get_rating_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RatingBucket>>, AppError> {
    Ok(Json(state.analytics.rating_distribution().await?))
}

/// GET /api/analytics/insights
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Insight>>, AppError> {
    Ok(Json(state.analytics.insights().await?))
}
