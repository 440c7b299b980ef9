//! # Aggregation Pipeline
//!
//! Everything the dashboard derives from a set of records:
//!
//! - [`merge`]: combine per-source lists and drop duplicates
//! - [`filter`]: per-request record filters and filter options
//! - [`pagination`]: table paging
//! - [`summary`]: totals, averages, ranges and extremes
//! - [`trend`]: bucketed series and growth rates
//! - [`view`]: chart view-mode selection
//!
//! No operation here fails. Empty input gives empty output.

pub mod filter;
pub mod merge;
pub mod pagination;
pub mod summary;
pub mod trend;
pub mod view;

pub use filter::{filter_options, FilterOptions, FilterParams, RecordFilter};
pub use merge::{dedup, merge_dedup};
pub use pagination::{page_window, paginate, Page};
pub use summary::{summarize, ProductionHighlight, SummaryStats, YearRange};
pub use trend::{
    average_growth, bucket_by_crop, bucket_by_month, bucket_by_year, growth_rate, growth_stats,
    synthesize_neighbors, trend_report, GrowthStats, TrendBucket, TrendQuery, TrendReport,
};
pub use view::{select_view, ViewMode};

use serde::{Serialize, Serializer};

/// Marker shown where a statistic cannot be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Serialize `None` as `"N/A"` instead of `null`
pub(crate) fn serialize_or_na<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

/// Treat NaN and infinities as zero when summing
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
