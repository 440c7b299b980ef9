//! # Ingestion
//!
//! Fans out over every configured source, substitutes fallback data for
//! any source that fails, and replaces the store contents with the merged,
//! deduplicated result.

use futures_util::future::join_all;
use serde::Serialize;

use super::errors::{SourceError, SourceResult};
use super::fixtures::FixtureSource;
use super::generated::{emergency_records, GeneratedSource, SourceProfile};
use super::source::{DataSource, SourceConfig};
use crate::aggregation::merge_dedup;
use crate::observability::{log_event_with_fields, Event};
use crate::records::{Record, RecordStore, StoreResult};

/// A source paired with the data that stands in for it on failure
pub struct SourceEntry {
    /// Short identifier, e.g. "usda"
    pub key: String,
    pub primary: Box<dyn DataSource>,
    pub fallback: Box<dyn DataSource>,
}

impl SourceEntry {
    pub fn new(
        key: impl Into<String>,
        primary: impl DataSource + 'static,
        fallback: impl DataSource + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    /// Generator for `profile` with its fixture as fallback
    pub fn generated(profile: SourceProfile) -> Self {
        Self::new(
            profile.slug(),
            GeneratedSource::new(profile),
            FixtureSource::for_profile(profile),
        )
    }
}

/// What one source contributed to a fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBatch {
    pub key: String,
    pub source: String,
    pub records: Vec<Record>,
    pub used_fallback: bool,
}

/// Outcome of one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub sources: Vec<SourceCount>,
    pub fetched: usize,
    pub merged: usize,
    pub duplicates_removed: usize,
    pub used_emergency_data: bool,
    /// Rows in the store after the refresh
    pub stored: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCount {
    pub source: String,
    pub records: usize,
    pub used_fallback: bool,
}

/// Runs fetch cycles over a set of sources
pub struct Ingestor {
    entries: Vec<SourceEntry>,
    config: SourceConfig,
}

impl Ingestor {
    pub fn new(entries: Vec<SourceEntry>, config: SourceConfig) -> Self {
        Self { entries, config }
    }

    /// World Bank, USDA and Open Data Pakistan generators with fixture
    /// fallbacks
    pub fn standard(config: SourceConfig) -> Self {
        let entries = SourceProfile::ALL
            .into_iter()
            .map(SourceEntry::generated)
            .collect();
        Self::new(entries, config)
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Fetch every source concurrently
    pub async fn fetch_all(&self) -> Vec<SourceBatch> {
        join_all(self.entries.iter().map(|entry| self.fetch_entry(entry))).await
    }

    /// Fetch a single source by key
    pub async fn fetch_source(&self, key: &str) -> Option<SourceBatch> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        Some(self.fetch_entry(entry).await)
    }

    async fn fetch_entry(&self, entry: &SourceEntry) -> SourceBatch {
        let source = entry.primary.name().to_string();

        let primary_error = match self.fetch_bounded(entry.primary.as_ref()).await {
            Ok(records) if !records.is_empty() => {
                log_event_with_fields(
                    Event::SourceFetched,
                    &[("source", source.as_str()), ("records", records.len().to_string().as_str())],
                );
                return SourceBatch {
                    key: entry.key.clone(),
                    source,
                    records,
                    used_fallback: false,
                };
            }
            Ok(_) => "no records returned".to_string(),
            Err(e) => e.to_string(),
        };

        log_event_with_fields(
            Event::SourceFallback,
            &[("source", source.as_str()), ("reason", primary_error.as_str())],
        );

        let records = match self.fetch_bounded(entry.fallback.as_ref()).await {
            Ok(records) => records,
            Err(e) => {
                log_event_with_fields(
                    Event::SourceFailed,
                    &[("source", source.as_str()), ("error", e.to_string().as_str())],
                );
                Vec::new()
            }
        };

        SourceBatch {
            key: entry.key.clone(),
            source,
            records,
            used_fallback: true,
        }
    }

    async fn fetch_bounded(&self, source: &dyn DataSource) -> SourceResult<Vec<Record>> {
        let limit = self.config.request_timeout;
        match tokio::time::timeout(limit, source.fetch(&self.config)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                source_name: source.name().to_string(),
                after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Fetch, merge and replace the store contents
    ///
    /// If every source comes back empty the store is filled with emergency
    /// data instead.
    pub async fn refresh(&self, store: &dyn RecordStore) -> StoreResult<RefreshReport> {
        log_event_with_fields(
            Event::RefreshStart,
            &[("sources", self.entries.len().to_string().as_str())],
        );

        let batches = self.fetch_all().await;
        let sources: Vec<SourceCount> = batches
            .iter()
            .map(|b| SourceCount {
                source: b.source.clone(),
                records: b.records.len(),
                used_fallback: b.used_fallback,
            })
            .collect();
        let fetched: usize = sources.iter().map(|s| s.records).sum();

        let mut merged = merge_dedup(batches.into_iter().map(|b| b.records));
        let mut duplicates_removed = fetched - merged.len();
        let mut used_emergency_data = false;

        if merged.is_empty() {
            let emergency = emergency_records(self.config.seed);
            let raw = emergency.len();
            merged = merge_dedup([emergency]);
            duplicates_removed = raw - merged.len();
            used_emergency_data = true;
            log_event_with_fields(Event::EmergencyData, &[("records", merged.len().to_string().as_str())]);
        }

        if duplicates_removed > 0 {
            log_event_with_fields(
                Event::DuplicatesRemoved,
                &[("count", duplicates_removed.to_string().as_str())],
            );
        }

        let merged_count = merged.len();
        let stored = store.replace_all(merged).map_err(|e| {
            log_event_with_fields(Event::StoreFailure, &[("error", e.to_string().as_str())]);
            e
        })?;

        log_event_with_fields(
            Event::RefreshComplete,
            &[
                ("fetched", fetched.to_string().as_str()),
                ("merged", merged_count.to_string().as_str()),
                ("stored", stored.to_string().as_str()),
            ],
        );

        Ok(RefreshReport {
            sources,
            fetched,
            merged: merged_count,
            duplicates_removed,
            used_emergency_data,
            stored,
        })
    }
}
