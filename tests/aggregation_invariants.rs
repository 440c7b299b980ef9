//! Aggregation Invariant Tests
//!
//! Invariants of the aggregation pipeline over generated data:
//! - dedup keeps one record per key, the most recently updated
//! - merging a deduplicated set with itself changes nothing
//! - average yield is total production over total area
//! - growth rates stay within [-100, 100]
//! - empty input never panics

use agridash::aggregation::{
    bucket_by_year, dedup, growth_rate, growth_stats, merge_dedup, summarize, trend_report,
    RecordFilter, TrendQuery, ViewMode,
};
use agridash::records::Record;
use agridash::sources::{GeneratedSource, SourceConfig, SourceProfile};
use chrono::{Duration, Utc};

// =============================================================================
// Test Utilities
// =============================================================================

fn generated(seed: u64) -> Vec<Record> {
    let config = SourceConfig {
        seed: Some(seed),
        ..SourceConfig::default()
    };
    SourceProfile::ALL
        .into_iter()
        .flat_map(|p| GeneratedSource::new(p).generate(&config))
        .collect()
}

// =============================================================================
// Deduplication
// =============================================================================

#[test]
fn test_later_update_wins_across_lists() {
    let t1 = Utc::now() - Duration::hours(1);
    let t2 = Utc::now();
    let old = Record::new("2020", "Wheat", "Punjab", "USDA", 100.0, 10.0).updated_at(t1);
    let new = Record::new("2020", "Wheat", "Punjab", "USDA", 120.0, 10.0).updated_at(t2);

    let merged = merge_dedup(vec![vec![new.clone()], vec![old.clone()]]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].production, 120.0);

    let merged = merge_dedup(vec![vec![old], vec![new]]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].production, 120.0);
}

#[test]
fn test_month_is_part_of_the_key() {
    let yearly = Record::new("2020", "Rice", "Sindh", "USDA", 10.0, 1.0);
    let march = yearly.clone().with_month(3);
    let april = yearly.clone().with_month(4);
    assert_eq!(dedup(vec![yearly, march, april]).len(), 3);
}

#[test]
fn test_dedup_is_idempotent() {
    for seed in [1, 2, 3] {
        let once = dedup(generated(seed));
        let twice = merge_dedup(vec![once.clone(), once.clone()]);
        assert_eq!(once, twice);
    }
}

// =============================================================================
// Summary
// =============================================================================

#[test]
fn test_average_yield_is_ratio_of_totals() {
    for seed in [5, 6, 7] {
        let records = dedup(generated(seed));
        let stats = summarize(&records).unwrap();
        assert!(stats.total_area > 0.0);
        let expected = stats.total_production / stats.total_area;
        assert!((stats.average_yield - expected).abs() < 1e-9 * expected.max(1.0));
        assert_eq!(stats.record_count, records.len());
    }
}

#[test]
fn test_empty_input() {
    let empty: Vec<Record> = Vec::new();
    assert!(summarize(&empty).is_none());
    assert!(dedup(empty.clone()).is_empty());

    let report = trend_report(&empty, &TrendQuery::default());
    assert!(report.buckets.is_empty());
    assert_eq!(report.record_count, 0);
    assert_eq!(report.growth.avg_production_growth, None);
}

// =============================================================================
// Growth
// =============================================================================

#[test]
fn test_growth_is_bounded() {
    let values = [0.0, 1.0, 3.5, 100.0, 1e9, 42.0, 0.5];
    for prev in values {
        for curr in values {
            let rate = growth_rate(prev, curr);
            assert!((-100.0..=100.0).contains(&rate), "{} -> {} gave {}", prev, curr, rate);
        }
    }

    let buckets = bucket_by_year(&dedup(generated(9)));
    let growth = growth_stats(&buckets);
    for value in [growth.avg_production_growth, growth.avg_area_growth, growth.avg_yield_growth]
        .into_iter()
        .flatten()
    {
        assert!((-100.0..=100.0).contains(&value));
    }
}

#[test]
fn test_two_year_growth() {
    let records = vec![
        Record::new("2020", "Wheat", "Punjab", "A", 100.0, 10.0),
        Record::new("2021", "Wheat", "Punjab", "A", 150.0, 10.0),
    ];
    let report = trend_report(&records, &TrendQuery::default());
    assert_eq!(report.view, ViewMode::Yearly);
    assert_eq!(report.growth.avg_production_growth, Some(50.0));
    assert_eq!(report.growth.avg_area_growth, Some(0.0));
}

#[test]
fn test_single_bucket_growth_is_not_available() {
    let records = vec![Record::new("2020", "Wheat", "Punjab", "A", 100.0, 10.0)];
    let query = TrendQuery {
        filter: RecordFilter::new().crop("Wheat").year("2020"),
        synthetic_points: true,
        ..TrendQuery::default()
    };
    let report = trend_report(&records, &query);
    assert_eq!(report.buckets.len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["growth"]["avgProductionGrowth"], "N/A");
    assert_eq!(json["syntheticSeries"].as_array().unwrap().len(), 3);
}
