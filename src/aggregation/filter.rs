//! Record filters
//!
//! Filters arrive as query-string parameters ([`FilterParams`]) and are
//! normalised into a [`RecordFilter`]. Empty values and `"all"` mean the
//! filter is unset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::records::{compare_years, AsRecord, RecordError, RecordResult};

/// Raw filter parameters as they appear in a query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Active filters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub year: Option<String>,
    pub crop: Option<String>,
    pub region: Option<String>,
    pub month: Option<u8>,
    pub source: Option<String>,
    /// Case-insensitive substring over crop, region and source
    pub search: Option<String>,
}

fn normalise(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl TryFrom<FilterParams> for RecordFilter {
    type Error = RecordError;

    fn try_from(params: FilterParams) -> RecordResult<Self> {
        let month = match normalise(params.month) {
            None => None,
            Some(m) => {
                let month: u8 = m
                    .parse()
                    .map_err(|_| RecordError::invalid("month", "must be a number"))?;
                if !(1..=12).contains(&month) {
                    return Err(RecordError::invalid("month", "must be between 1 and 12"));
                }
                Some(month)
            }
        };

        Ok(Self {
            year: normalise(params.year),
            crop: normalise(params.crop),
            region: normalise(params.region),
            month,
            source: normalise(params.source),
            search: normalise(params.search).map(|s| s.to_lowercase()),
        })
    }
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into().to_lowercase());
        self
    }

    /// Same filter with the month constraint dropped
    pub fn without_month(&self) -> Self {
        Self {
            month: None,
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches<R: AsRecord>(&self, item: &R) -> bool {
        let record = item.as_record();

        if let Some(year) = &self.year {
            if record.year.trim() != year {
                return false;
            }
        }
        if let Some(crop) = &self.crop {
            if &record.crop != crop {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if &record.region != region {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &record.source != source {
                return false;
            }
        }
        if let Some(month) = self.month {
            if record.month != Some(month) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let hit = [&record.crop, &record.region, &record.source]
                .iter()
                .any(|field| field.to_lowercase().contains(search.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Keep only matching records
    pub fn apply<R: AsRecord>(&self, records: Vec<R>) -> Vec<R> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Values available for the filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Most recent first
    pub years: Vec<String>,
    pub crops: Vec<String>,
    pub regions: Vec<String>,
    pub sources: Vec<String>,
}

pub fn filter_options<R: AsRecord>(records: &[R]) -> FilterOptions {
    let mut years: Vec<String> = Vec::new();
    let mut crops = BTreeSet::new();
    let mut regions = BTreeSet::new();
    let mut sources = BTreeSet::new();

    for item in records {
        let record = item.as_record();
        if !years.contains(&record.year) {
            years.push(record.year.clone());
        }
        crops.insert(record.crop.clone());
        regions.insert(record.region.clone());
        sources.insert(record.source.clone());
    }
    years.sort_by(|a, b| compare_years(b, a));

    FilterOptions {
        years,
        crops: crops.into_iter().collect(),
        regions: regions.into_iter().collect(),
        sources: sources.into_iter().collect(),
    }
}
