//! Chart view-mode selection

use serde::Serialize;

use super::filter::RecordFilter;
use crate::records::AsRecord;

/// How trend data is bucketed for charting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Yearly,
    Monthly,
    Crop,
}

/// Pick the view for the active filters
///
/// `records` is the set the chart will draw from, before the month filter
/// is applied. Monthly data is looked for among records of the pinned year.
pub fn select_view<R: AsRecord>(filter: &RecordFilter, records: &[R]) -> ViewMode {
    match (filter.month.is_some(), filter.year.as_deref()) {
        (true, Some(_)) => ViewMode::Crop,
        (true, None) => ViewMode::Yearly,
        (false, None) => ViewMode::Yearly,
        (false, Some(year)) => {
            let has_monthly = records.iter().any(|r| {
                let record = r.as_record();
                record.year.trim() == year && record.month.is_some()
            });
            if has_monthly {
                ViewMode::Monthly
            } else if filter.crop.is_some() {
                ViewMode::Yearly
            } else {
                ViewMode::Crop
            }
        }
    }
}
