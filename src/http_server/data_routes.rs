//! Record HTTP Routes
//!
//! Listing, filtering and paging of stored records, plus authenticated
//! create, update and delete.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::aggregation::{dedup, filter_options, paginate, FilterOptions, FilterParams, Page, RecordFilter};
use crate::observability::{log_event_with_fields, Event};
use crate::records::{AsRecord, Record, RecordError, RecordPayload, StoreError, StoredRecord};

/// Record routes with shared state
pub fn data_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route("/page", get(page_handler))
        .route("/options", get(options_handler))
        .route("/year/:year", get(by_year_handler))
        .route("/crop/:crop", get(by_crop_handler))
        .route("/region/:region", get(by_region_handler))
        .route("/:id", put(update_handler).delete(delete_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshQuery {
    pub fn requested(&self) -> bool {
        flag(self.refresh.as_deref()).unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a boolean query flag. Only "true" and "false" count.
pub(crate) fn flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Parse an optional numeric query parameter
pub(crate) fn parse_param<T: FromStr>(name: &str, value: Option<&str>) -> ApiResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid value for {}: '{}'", name, raw))),
    }
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid record id: '{}'", raw)))
}

fn parse_payload(body: &Bytes) -> ApiResult<RecordPayload> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RecordError::InvalidBody(e.to_string()))?;
    Ok(RecordPayload::from_json(value)?)
}

fn parse_body(body: &Bytes) -> ApiResult<Record> {
    Ok(parse_payload(body)?.into_record(Utc::now())?)
}

/// Deduplicated, filtered view of the store
fn current_records(state: &AppState, filter: &RecordFilter) -> ApiResult<Vec<StoredRecord>> {
    let records = dedup(state.store.all()?);
    Ok(filter.apply(records))
}

// ==================
// Read Handlers
// ==================

/// All records matching the filters, optionally after a refresh
async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(refresh): Query<RefreshQuery>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Vec<StoredRecord>>> {
    let filter = RecordFilter::try_from(params)?;

    if refresh.requested() {
        state.ingestor.refresh(state.store.as_ref()).await?;
    }

    Ok(Json(current_records(&state, &filter)?))
}

async fn page_handler(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Page<StoredRecord>>> {
    let filter = RecordFilter::try_from(params)?;
    let number = parse_param::<usize>("page", page.page.as_deref())?;
    let size = parse_param::<usize>("pageSize", page.page_size.as_deref())?;

    let records = current_records(&state, &filter)?;
    Ok(Json(paginate(records, number, size)))
}

async fn options_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<FilterOptions>> {
    let records = dedup(state.store.all()?);
    Ok(Json(filter_options(&records)))
}

fn exact_match<F>(state: &AppState, pred: F) -> ApiResult<Vec<StoredRecord>>
where
    F: Fn(&Record) -> bool,
{
    let records = dedup(state.store.all()?);
    Ok(records.into_iter().filter(|r| pred(r.as_record())).collect())
}

async fn by_year_handler(
    State(state): State<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<Json<Vec<StoredRecord>>> {
    Ok(Json(exact_match(&state, |r| r.year == year)?))
}

async fn by_crop_handler(
    State(state): State<Arc<AppState>>,
    Path(crop): Path<String>,
) -> ApiResult<Json<Vec<StoredRecord>>> {
    Ok(Json(exact_match(&state, |r| r.crop == crop)?))
}

async fn by_region_handler(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
) -> ApiResult<Json<Vec<StoredRecord>>> {
    Ok(Json(exact_match(&state, |r| r.region == region)?))
}

// ==================
// Write Handlers
// ==================

async fn create_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<StoredRecord>)> {
    let (claims, _) = state.authorize(&headers)?;
    let record = parse_body(&body)?;

    let stored = state.store.insert(record)?;
    log_event_with_fields(
        Event::RecordCreated,
        &[
            ("id", stored.id.to_string().as_str()),
            ("username", claims.username.as_str()),
        ],
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<StoredRecord>> {
    let (claims, _) = state.authorize(&headers)?;
    let id = parse_id(&id)?;
    let payload = parse_payload(&body)?;
    let current = state.store.get(id)?.ok_or(StoreError::NotFound(id))?;

    // Only the fields sent are replaced
    let mut record = payload.overlay(&current.record)?;
    record.last_updated = Utc::now();

    let stored = state.store.update(id, record)?;
    log_event_with_fields(
        Event::RecordUpdated,
        &[
            ("id", stored.id.to_string().as_str()),
            ("username", claims.username.as_str()),
        ],
    );
    Ok(Json(stored))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let (claims, _) = state.authorize(&headers)?;
    let id = parse_id(&id)?;

    state.store.delete(id)?;
    log_event_with_fields(
        Event::RecordDeleted,
        &[
            ("id", id.to_string().as_str()),
            ("username", claims.username.as_str()),
        ],
    );
    Ok(Json(MessageResponse {
        message: "Data deleted successfully".to_string(),
    }))
}
