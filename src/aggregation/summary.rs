//! Summary statistics over a record set

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::{finite_or_zero, serialize_or_na};
use crate::records::{AsRecord, Record, TOTAL_CROPS};

/// Headline numbers for the statistical summary panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub record_count: usize,
    pub total_production: f64,
    pub average_production: f64,
    pub total_area: f64,
    pub average_area: f64,
    pub average_yield: f64,
    pub year_range: YearRange,
    /// Distinct crops, not counting the national "Total Crops" aggregate
    pub crop_count: usize,
    pub region_count: usize,
    pub highest_production: Option<ProductionHighlight>,
    /// Lowest production above zero
    pub lowest_production: Option<ProductionHighlight>,
    pub source_counts: BTreeMap<String, usize>,
}

/// Span of numeric years in the set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearRange {
    #[serde(serialize_with = "serialize_or_na")]
    pub start: Option<i32>,
    #[serde(serialize_with = "serialize_or_na")]
    pub end: Option<i32>,
    /// Number of calendar years covered, inclusive
    #[serde(serialize_with = "serialize_or_na")]
    pub span: Option<i32>,
}

impl YearRange {
    fn include(&mut self, year: i32) {
        self.start = Some(self.start.map_or(year, |s| s.min(year)));
        self.end = Some(self.end.map_or(year, |e| e.max(year)));
        self.span = match (self.start, self.end) {
            (Some(s), Some(e)) => Some(e - s + 1),
            _ => None,
        };
    }
}

/// The record behind a production extreme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionHighlight {
    pub value: f64,
    pub crop: String,
    pub year: String,
    pub region: String,
    pub source: String,
}

impl ProductionHighlight {
    fn from_record(record: &Record, value: f64) -> Self {
        Self {
            value,
            crop: record.crop.clone(),
            year: record.year.clone(),
            region: record.region.clone(),
            source: record.source.clone(),
        }
    }
}

/// Compute summary statistics. Returns `None` for an empty set.
pub fn summarize<R: AsRecord>(records: &[R]) -> Option<SummaryStats> {
    if records.is_empty() {
        return None;
    }

    let mut total_production = 0.0;
    let mut total_area = 0.0;
    let mut per_record_yield_sum = 0.0;
    let mut per_record_yield_count = 0usize;
    let mut year_range = YearRange::default();
    let mut crops: HashSet<&str> = HashSet::new();
    let mut regions: HashSet<&str> = HashSet::new();
    let mut highest: Option<ProductionHighlight> = None;
    let mut lowest: Option<ProductionHighlight> = None;
    let mut source_counts: BTreeMap<String, usize> = BTreeMap::new();

    for item in records {
        let record = item.as_record();
        let production = finite_or_zero(record.production);
        let area = finite_or_zero(record.area);

        total_production += production;
        total_area += area;

        if area > 0.0 {
            per_record_yield_sum += production / area;
            per_record_yield_count += 1;
        }

        if let Some(year) = record.numeric_year() {
            year_range.include(year);
        }

        if !record.crop.is_empty() && record.crop != TOTAL_CROPS {
            crops.insert(&record.crop);
        }
        if !record.region.is_empty() {
            regions.insert(&record.region);
        }

        // Strict comparisons: ties keep the first record seen
        if highest.as_ref().map_or(true, |h| production > h.value) {
            highest = Some(ProductionHighlight::from_record(record, production));
        }
        if production > 0.0 && lowest.as_ref().map_or(true, |l| production < l.value) {
            lowest = Some(ProductionHighlight::from_record(record, production));
        }

        *source_counts.entry(record.source.clone()).or_insert(0) += 1;
    }

    let count = records.len() as f64;
    let average_yield = if total_area > 0.0 {
        total_production / total_area
    } else if per_record_yield_count > 0 {
        per_record_yield_sum / per_record_yield_count as f64
    } else {
        0.0
    };

    Some(SummaryStats {
        record_count: records.len(),
        total_production,
        average_production: total_production / count,
        total_area,
        average_area: total_area / count,
        average_yield,
        year_range,
        crop_count: crops.len(),
        region_count: regions.len(),
        highest_production: highest,
        lowest_production: lowest,
        source_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: &str, crop: &str, region: &str, production: f64, area: f64) -> Record {
        Record::new(year, crop, region, "USDA", production, area)
    }

    #[test]
    fn test_empty_is_none() {
        assert!(summarize::<Record>(&[]).is_none());
    }

    #[test]
    fn test_totals_and_averages() {
        let records = vec![
            rec("2020", "Wheat", "Punjab", 100.0, 50.0),
            rec("2022", "Rice", "Sindh", 300.0, 150.0),
        ];
        let stats = summarize(&records).unwrap();
        assert_eq!(stats.total_production, 400.0);
        assert_eq!(stats.average_production, 200.0);
        assert_eq!(stats.total_area, 200.0);
        assert_eq!(stats.average_area, 100.0);
        assert_eq!(stats.average_yield, stats.total_production / stats.total_area);
        assert_eq!(stats.year_range.start, Some(2020));
        assert_eq!(stats.year_range.end, Some(2022));
        assert_eq!(stats.year_range.span, Some(3));
        assert_eq!(stats.source_counts.get("USDA"), Some(&2));
    }

    #[test]
    fn test_zero_area_yield_is_zero() {
        let stats = summarize(&[rec("2020", "Wheat", "Punjab", 100.0, 0.0)]).unwrap();
        assert_eq!(stats.average_yield, 0.0);
    }

    #[test]
    fn test_total_crops_not_counted() {
        let stats = summarize(&[
            rec("2020", TOTAL_CROPS, "Pakistan", 1.0, 1.0),
            rec("2020", "Wheat", "Punjab", 1.0, 1.0),
            rec("2021", "Wheat", "Sindh", 1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(stats.crop_count, 1);
        assert_eq!(stats.region_count, 3);
    }

    #[test]
    fn test_extremes() {
        let stats = summarize(&[
            rec("2020", "Zero", "A", 0.0, 1.0),
            rec("2020", "First", "A", 500.0, 1.0),
            rec("2021", "Second", "A", 500.0, 1.0),
            rec("2021", "Small", "A", 5.0, 1.0),
        ])
        .unwrap();
        let highest = stats.highest_production.unwrap();
        assert_eq!(highest.crop, "First");
        assert_eq!(highest.value, 500.0);
        let lowest = stats.lowest_production.unwrap();
        assert_eq!(lowest.crop, "Small");
    }

    #[test]
    fn test_no_numeric_years_serialize_as_na() {
        let stats = summarize(&[rec("unknown", "Wheat", "Punjab", 1.0, 1.0)]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["yearRange"]["start"], "N/A");
        assert_eq!(json["yearRange"]["end"], "N/A");
        assert_eq!(json["yearRange"]["span"], "N/A");
    }

    #[test]
    fn test_all_zero_production_has_no_lowest() {
        let stats = summarize(&[rec("2020", "Wheat", "Punjab", 0.0, 1.0)]).unwrap();
        assert!(stats.lowest_production.is_none());
        assert_eq!(stats.highest_production.unwrap().value, 0.0);
    }
}
