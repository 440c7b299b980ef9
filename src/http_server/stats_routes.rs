//! Statistics HTTP Routes
//!
//! Summary statistics and chart-ready trend reports over the filtered
//! record set.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::data_routes::{flag, parse_param};
use super::errors::ApiResult;
use super::state::AppState;
use crate::aggregation::{
    dedup, summarize, trend_report, FilterParams, RecordFilter, SummaryStats, TrendQuery,
    TrendReport,
};

/// Stats routes with shared state
pub fn stats_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(summary_handler))
        .route("/trend", get(trend_handler))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendParams {
    #[serde(default)]
    pub since_year: Option<String>,
    #[serde(default)]
    pub synthetic: Option<String>,
}

/// Summary of the filtered records; `null` when nothing matches
async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Option<SummaryStats>>> {
    let filter = RecordFilter::try_from(params)?;
    let records = filter.apply(dedup(state.store.all()?));
    Ok(Json(summarize(&records)))
}

/// Trend buckets and growth for the filtered records
///
/// Without a year filter the series starts at `sinceYear`, falling back to
/// the configured default.
async fn trend_handler(
    State(state): State<Arc<AppState>>,
    Query(trend): Query<TrendParams>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<TrendReport>> {
    let filter = RecordFilter::try_from(params)?;
    let since_year = match parse_param::<i32>("sinceYear", trend.since_year.as_deref())? {
        Some(year) => Some(year),
        None if filter.year.is_none() => Some(state.ingestion.trend_since_year),
        None => None,
    };
    let synthetic_points =
        flag(trend.synthetic.as_deref()).unwrap_or(state.ingestion.synthetic_trend_points);

    let query = TrendQuery {
        filter,
        since_year,
        synthetic_points,
    };
    let records = dedup(state.store.all()?);
    Ok(Json(trend_report(&records, &query)))
}
