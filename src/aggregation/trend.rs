//! Trend buckets and growth rates
//!
//! Records are summed into buckets (per year, per month, or per crop) and
//! growth is measured between consecutive time buckets. Crop buckets are a
//! breakdown, not a series, so they carry no growth.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::filter::RecordFilter;
use super::view::{select_view, ViewMode};
use super::{finite_or_zero, serialize_or_na};
use crate::records::{compare_years, derive_yield, AsRecord};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const UNKNOWN_MONTH: &str = "Unknown";

/// Growth limit in percent, both directions
const GROWTH_CLAMP: f64 = 100.0;

// Offsets applied to fabricate neighbours of a lone yearly bucket
const SYNTHETIC_PRODUCTION_STEP: f64 = 0.10;
const SYNTHETIC_AREA_STEP: f64 = 0.08;
const SYNTHETIC_YIELD_STEP: f64 = 0.05;

pub fn month_name(month: u8) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[usize::from(month) - 1],
        _ => UNKNOWN_MONTH,
    }
}

/// Percentage change from `previous` to `current`, clamped to ±100.
/// Zero when there is no positive baseline.
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous > 0.0 && previous.is_finite() && current.is_finite() {
        ((current - previous) / previous * 100.0).clamp(-GROWTH_CLAMP, GROWTH_CLAMP)
    } else {
        0.0
    }
}

/// Mean growth over consecutive pairs; `None` with fewer than two values
pub fn average_growth(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let rates: Vec<f64> = values.windows(2).map(|w| growth_rate(w[0], w[1])).collect();
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

/// One point of a trend series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    pub production: f64,
    pub area: f64,
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    /// Records summed into this bucket
    pub count: usize,
    /// Fabricated for display; never a real observation
    pub synthetic: bool,
}

#[derive(Default)]
struct Totals {
    production: f64,
    area: f64,
    count: usize,
}

impl Totals {
    fn add<R: AsRecord>(&mut self, item: &R) {
        let record = item.as_record();
        self.production += finite_or_zero(record.production);
        self.area += finite_or_zero(record.area);
        self.count += 1;
    }

    fn into_bucket(
        self,
        label: String,
        year: Option<String>,
        month: Option<u8>,
        crop: Option<String>,
    ) -> TrendBucket {
        TrendBucket {
            label,
            year,
            month,
            crop,
            production: self.production,
            area: self.area,
            crop_yield: derive_yield(self.production, self.area),
            count: self.count,
            synthetic: false,
        }
    }
}

/// One bucket per year, in numeric year order
pub fn bucket_by_year<R: AsRecord>(records: &[R]) -> Vec<TrendBucket> {
    let mut totals: HashMap<String, Totals> = HashMap::new();
    for item in records {
        totals
            .entry(item.as_record().year.trim().to_string())
            .or_default()
            .add(item);
    }

    let mut years: Vec<(String, Totals)> = totals.into_iter().collect();
    years.sort_by(|a, b| compare_years(&a.0, &b.0));
    years
        .into_iter()
        .map(|(year, t)| t.into_bucket(year.clone(), Some(year), None, None))
        .collect()
}

/// One bucket per (year, month)
///
/// With `year_pinned` the label is just the month name. Records without a
/// month land in an "Unknown" bucket after December of their year.
pub fn bucket_by_month<R: AsRecord>(records: &[R], year_pinned: bool) -> Vec<TrendBucket> {
    let mut totals: HashMap<(String, Option<u8>), Totals> = HashMap::new();
    for item in records {
        let record = item.as_record();
        totals
            .entry((record.year.trim().to_string(), record.month))
            .or_default()
            .add(item);
    }

    let mut keys: Vec<((String, Option<u8>), Totals)> = totals.into_iter().collect();
    keys.sort_by(|(a, _), (b, _)| {
        compare_years(&a.0, &b.0).then_with(|| match (a.1, b.1) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    });

    keys.into_iter()
        .map(|((year, month), t)| {
            let name = month.map_or(UNKNOWN_MONTH, month_name);
            let label = if year_pinned {
                name.to_string()
            } else {
                format!("{} {}", name, year)
            };
            t.into_bucket(label, Some(year), month, None)
        })
        .collect()
}

/// One bucket per crop, alphabetical
pub fn bucket_by_crop<R: AsRecord>(records: &[R]) -> Vec<TrendBucket> {
    let mut totals: BTreeMap<String, Totals> = BTreeMap::new();
    for item in records {
        totals
            .entry(item.as_record().crop.clone())
            .or_default()
            .add(item);
    }
    totals
        .into_iter()
        .map(|(crop, t)| t.into_bucket(crop.clone(), None, None, Some(crop)))
        .collect()
}

/// Average growth per metric, "N/A" where it cannot be computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthStats {
    #[serde(serialize_with = "serialize_or_na")]
    pub avg_production_growth: Option<f64>,
    #[serde(serialize_with = "serialize_or_na")]
    pub avg_area_growth: Option<f64>,
    #[serde(serialize_with = "serialize_or_na")]
    pub avg_yield_growth: Option<f64>,
}

/// Growth across a time series. Synthetic buckets are ignored.
pub fn growth_stats(buckets: &[TrendBucket]) -> GrowthStats {
    let real: Vec<&TrendBucket> = buckets.iter().filter(|b| !b.synthetic).collect();
    let series = |f: fn(&TrendBucket) -> f64| real.iter().map(|b| f(b)).collect::<Vec<f64>>();

    GrowthStats {
        avg_production_growth: average_growth(&series(|b| b.production)),
        avg_area_growth: average_growth(&series(|b| b.area)),
        avg_yield_growth: average_growth(&series(|b| b.crop_yield)),
    }
}

/// Previous and next year around a lone yearly bucket, for display only
///
/// Returns `[previous, actual, next]`, or nothing when the bucket has no
/// numeric year.
pub fn synthesize_neighbors(bucket: &TrendBucket) -> Vec<TrendBucket> {
    let Some(year) = bucket.year.as_deref().and_then(|y| y.trim().parse::<i32>().ok()) else {
        return Vec::new();
    };

    let neighbour = |year: i32, sign: f64| {
        let year = year.to_string();
        TrendBucket {
            label: year.clone(),
            year: Some(year),
            month: None,
            crop: bucket.crop.clone(),
            production: bucket.production * (1.0 + sign * SYNTHETIC_PRODUCTION_STEP),
            area: bucket.area * (1.0 + sign * SYNTHETIC_AREA_STEP),
            crop_yield: bucket.crop_yield * (1.0 + sign * SYNTHETIC_YIELD_STEP),
            count: 0,
            synthetic: true,
        }
    };

    vec![neighbour(year - 1, -1.0), bucket.clone(), neighbour(year + 1, 1.0)]
}

/// Parameters of a trend request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendQuery {
    pub filter: RecordFilter,
    /// Drop records with a numeric year below this
    pub since_year: Option<i32>,
    /// Attach a synthetic series around a single yearly bucket
    pub synthetic_points: bool,
}

/// Chart-ready trend data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub title: String,
    pub view: ViewMode,
    pub buckets: Vec<TrendBucket>,
    pub growth: GrowthStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthetic_series: Option<Vec<TrendBucket>>,
    pub record_count: usize,
}

pub fn trend_report<R: AsRecord>(records: &[R], query: &TrendQuery) -> TrendReport {
    let without_month = query.filter.without_month();
    let scoped: Vec<&R> = records
        .iter()
        .filter(|r| match (query.since_year, r.as_record().numeric_year()) {
            (Some(since), Some(year)) => year >= since,
            _ => true,
        })
        .filter(|r| without_month.matches(r))
        .collect();

    let view = select_view(&query.filter, &scoped);

    let charted: Vec<&R> = match query.filter.month {
        Some(month) => scoped
            .into_iter()
            .filter(|r| r.as_record().month == Some(month))
            .collect(),
        None => scoped,
    };

    let buckets = match view {
        ViewMode::Yearly => bucket_by_year(&charted),
        ViewMode::Monthly => bucket_by_month(&charted, query.filter.year.is_some()),
        ViewMode::Crop => bucket_by_crop(&charted),
    };

    let growth = match view {
        ViewMode::Crop => GrowthStats::default(),
        _ => growth_stats(&buckets),
    };

    let synthetic_series = (view == ViewMode::Yearly
        && buckets.len() == 1
        && query.filter.year.is_some()
        && query.synthetic_points)
        .then(|| synthesize_neighbors(&buckets[0]))
        .filter(|series| !series.is_empty());

    TrendReport {
        title: chart_title(query, view),
        view,
        buckets,
        growth,
        synthetic_series,
        record_count: charted.len(),
    }
}

fn chart_title(query: &TrendQuery, view: ViewMode) -> String {
    let filter = &query.filter;
    let mut title = match &filter.crop {
        Some(crop) => format!("{} Trends Analysis", crop),
        None => "Agricultural Trends Analysis".to_string(),
    };

    match (&filter.year, query.since_year) {
        (Some(year), _) => title.push_str(&format!(" in {}", year)),
        (None, Some(since)) => title.push_str(&format!(" ({} onwards)", since)),
        (None, None) => {}
    }

    if let Some(month) = filter.month {
        title.push_str(&format!(" - {}", month_name(month)));
    }

    match view {
        ViewMode::Monthly => title.push_str(" by Month"),
        ViewMode::Crop => title.push_str(" by Crop"),
        ViewMode::Yearly => {}
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;

    fn rec(year: &str, crop: &str, production: f64, area: f64) -> Record {
        Record::new(year, crop, "Punjab", "A", production, area)
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(100.0, 150.0), 50.0);
        assert_eq!(growth_rate(100.0, 50.0), -50.0);
        assert_eq!(growth_rate(10.0, 100.0), 100.0);
        assert_eq!(growth_rate(100.0, 0.0), -100.0);
        assert_eq!(growth_rate(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_average_growth() {
        assert_eq!(average_growth(&[100.0, 150.0]), Some(50.0));
        assert_eq!(average_growth(&[100.0, 150.0, 75.0]), Some(0.0));
        assert_eq!(average_growth(&[100.0]), None);
        assert_eq!(average_growth(&[]), None);
    }

    #[test]
    fn test_yearly_buckets_sum_and_sort() {
        let buckets = bucket_by_year(&[
            rec("2021", "Wheat", 50.0, 10.0),
            rec("2020", "Wheat", 100.0, 50.0),
            rec("2021", "Rice", 100.0, 20.0),
        ]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "2020");
        assert_eq!(buckets[1].production, 150.0);
        assert_eq!(buckets[1].area, 30.0);
        assert_eq!(buckets[1].crop_yield, 5.0);
        assert_eq!(buckets[1].count, 2);
    }

    #[test]
    fn test_monthly_buckets_unknown_last() {
        let records = vec![
            rec("2022", "Wheat", 1.0, 1.0).with_month(3),
            rec("2022", "Wheat", 1.0, 1.0),
            rec("2022", "Rice", 1.0, 1.0).with_month(1),
        ];
        let labels: Vec<String> = bucket_by_month(&records, true).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["January", "March", "Unknown"]);

        let labels: Vec<String> = bucket_by_month(&records, false).into_iter().map(|b| b.label).collect();
        assert_eq!(labels[0], "January 2022");
    }

    #[test]
    fn test_single_bucket_growth_is_na() {
        let report = trend_report(&[rec("2022", "Wheat", 10.0, 5.0)], &TrendQuery::default());
        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.growth, GrowthStats::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["growth"]["avgProductionGrowth"], "N/A");
        assert!(json.get("syntheticSeries").is_none());
    }

    #[test]
    fn test_yearly_growth_example() {
        let report = trend_report(
            &[rec("2020", "Wheat", 100.0, 10.0), rec("2021", "Wheat", 150.0, 10.0)],
            &TrendQuery::default(),
        );
        assert_eq!(report.view, ViewMode::Yearly);
        assert_eq!(report.growth.avg_production_growth, Some(50.0));
        assert_eq!(report.growth.avg_area_growth, Some(0.0));
    }

    #[test]
    fn test_since_year_drops_older_records() {
        let query = TrendQuery {
            since_year: Some(2019),
            ..Default::default()
        };
        let report = trend_report(
            &[rec("2015", "Wheat", 1.0, 1.0), rec("2020", "Wheat", 1.0, 1.0)],
            &query,
        );
        assert_eq!(report.record_count, 1);
        assert_eq!(report.title, "Agricultural Trends Analysis (2019 onwards)");
    }

    #[test]
    fn test_synthetic_series_is_opt_in_and_separate() {
        let records = vec![rec("2022", "Wheat", 100.0, 50.0)];
        let mut query = TrendQuery {
            filter: RecordFilter::new().year("2022").crop("Wheat"),
            ..Default::default()
        };
        assert!(trend_report(&records, &query).synthetic_series.is_none());

        query.synthetic_points = true;
        let report = trend_report(&records, &query);
        assert_eq!(report.view, ViewMode::Yearly);
        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.growth, GrowthStats::default());

        let series = report.synthetic_series.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].label, "2021");
        assert!(series[0].synthetic);
        assert!((series[0].production - 90.0).abs() < 1e-9);
        assert!(!series[1].synthetic);
        assert!((series[2].area - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_crop_view_has_no_growth() {
        let query = TrendQuery {
            filter: RecordFilter::new().year("2022"),
            ..Default::default()
        };
        let report = trend_report(
            &[rec("2022", "Wheat", 100.0, 1.0), rec("2022", "Rice", 10.0, 1.0)],
            &query,
        );
        assert_eq!(report.view, ViewMode::Crop);
        assert_eq!(report.buckets[0].label, "Rice");
        assert_eq!(report.growth, GrowthStats::default());
        assert_eq!(report.title, "Agricultural Trends Analysis in 2022 by Crop");
    }

    #[test]
    fn test_monthly_view_title() {
        let query = TrendQuery {
            filter: RecordFilter::new().year("2022").crop("Wheat"),
            ..Default::default()
        };
        let report = trend_report(
            &[
                rec("2022", "Wheat", 100.0, 1.0).with_month(1),
                rec("2022", "Wheat", 150.0, 1.0).with_month(2),
            ],
            &query,
        );
        assert_eq!(report.view, ViewMode::Monthly);
        assert_eq!(report.title, "Wheat Trends Analysis in 2022 by Month");
        assert_eq!(report.growth.avg_production_growth, Some(50.0));
    }

    #[test]
    fn test_month_filter_title() {
        let query = TrendQuery {
            filter: RecordFilter::new().crop("Wheat").year("2022").month(3),
            ..Default::default()
        };
        let report = trend_report(&[rec("2022", "Wheat", 1.0, 1.0).with_month(3)], &query);
        assert_eq!(report.title, "Wheat Trends Analysis in 2022 - March by Crop");
        assert_eq!(report.record_count, 1);
    }

    #[test]
    fn test_empty_input() {
        let report = trend_report::<Record>(&[], &TrendQuery::default());
        assert!(report.buckets.is_empty());
        assert_eq!(report.record_count, 0);
        assert_eq!(report.growth, GrowthStats::default());
    }
}
