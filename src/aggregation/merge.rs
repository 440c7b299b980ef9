//! Merge and deduplication
//!
//! The dedup key is (year, month-if-present, crop, region, source). On a
//! collision the record with the later `lastUpdated` wins; equal timestamps
//! go to the record seen last.

use std::collections::HashMap;

use crate::records::{AsRecord, RecordKey};

/// Merge any number of record lists into one deduplicated, sorted list
pub fn merge_dedup<R, I, L>(lists: I) -> Vec<R>
where
    R: AsRecord,
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = R>,
{
    let mut by_key: HashMap<RecordKey, R> = HashMap::new();

    for record in lists.into_iter().flatten() {
        let key = record.as_record().key();
        let keep_existing = by_key
            .get(&key)
            .map(|existing| existing.as_record().last_updated > record.as_record().last_updated)
            .unwrap_or(false);
        if !keep_existing {
            by_key.insert(key, record);
        }
    }

    let mut merged: Vec<R> = by_key.into_values().collect();
    merged.sort_by(|a, b| a.as_record().display_cmp(b.as_record()));
    merged
}

/// Deduplicate a single list
pub fn dedup<R: AsRecord>(records: Vec<R>) -> Vec<R> {
    merge_dedup([records])
}
