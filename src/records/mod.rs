//! # Records
//!
//! The canonical agricultural record, client payload validation, and the
//! record store.

pub mod errors;
pub mod record;
pub mod store;

pub use errors::{RecordError, RecordResult, StoreError, StoreResult};
pub use record::{
    compare_years, derive_yield, AsRecord, Record, RecordKey, RecordPayload, Season,
    StoredRecord, TOTAL_CROPS,
};
pub use store::{InMemoryRecordStore, JsonFileRecordStore, RecordStore};
