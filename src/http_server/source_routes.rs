//! Data Source HTTP Routes
//!
//! Raw output of each configured source, with fallback applied. Nothing
//! here touches the record store.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::records::Record;
use crate::sources::SourceProfile;

/// Source routes with shared state
pub fn source_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/all", get(all_handler))
        .route("/:source", get(source_handler))
        .with_state(state)
}

/// Response key for a source in the combined listing
fn response_key(key: &str) -> String {
    match SourceProfile::from_slug(key) {
        Some(SourceProfile::WorldBank) => "worldBank".to_string(),
        Some(SourceProfile::Usda) => "usda".to_string(),
        Some(SourceProfile::Pakistan) => "openDataPakistan".to_string(),
        None => key.to_string(),
    }
}

async fn source_handler(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let batch = state
        .ingestor
        .fetch_source(&source)
        .await
        .ok_or(ApiError::UnknownSource(source))?;
    Ok(Json(batch.records))
}

async fn all_handler(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, Vec<Record>>> {
    let batches = state.ingestor.fetch_all().await;
    Json(
        batches
            .into_iter()
            .map(|b| (response_key(&b.key), b.records))
            .collect(),
    )
}
