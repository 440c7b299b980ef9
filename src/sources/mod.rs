//! # Data Sources
//!
//! Producers of agricultural records, one per provenance tag, and the
//! [`Ingestor`] that fans out over them.
//!
//! A source that fails or times out never fails a refresh: the ingestor
//! logs it and serves the source's fixture data instead.

pub mod errors;
pub mod fixtures;
pub mod generated;
pub mod ingest;
pub mod source;

pub use errors::{SourceError, SourceResult};
pub use fixtures::{FailingSource, FixtureSource};
pub use generated::{
    emergency_records, GeneratedSource, SourceProfile, OPEN_DATA_PAKISTAN, USDA, WORLD_BANK,
};
pub use ingest::{Ingestor, RefreshReport, SourceBatch, SourceCount, SourceEntry};
pub use source::{DataSource, FetchFuture, SourceConfig};
