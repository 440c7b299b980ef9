//! Deterministic fallback data
//!
//! When a generator fails the ingestor substitutes one of these fixed sets,
//! so the dashboard always has something to draw.

use chrono::Utc;

use super::errors::SourceError;
use super::generated::{SourceProfile, OPEN_DATA_PAKISTAN, PAKISTAN, USDA, WORLD_BANK};
use super::source::{DataSource, FetchFuture, SourceConfig};
use crate::records::{Record, TOTAL_CROPS};

/// A fixed record set served under one provenance tag
#[derive(Debug, Clone)]
pub struct FixtureSource {
    name: String,
    records: Vec<Record>,
}

impl FixtureSource {
    /// Records are re-tagged with `name` so the provenance contract holds
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        let name = name.into();
        let records = records
            .into_iter()
            .map(|r| Record {
                source: name.clone(),
                ..r
            })
            .collect();
        Self { name, records }
    }

    /// Fallback data for a generated profile
    pub fn for_profile(profile: SourceProfile) -> Self {
        match profile {
            SourceProfile::WorldBank => Self::world_bank(),
            SourceProfile::Usda => Self::usda(),
            SourceProfile::Pakistan => Self::pakistan(),
        }
    }

    /// National totals, 2020-2025
    pub fn world_bank() -> Self {
        let rows = [
            ("2020", 38900.0, 22000.0),
            ("2021", 41000.0, 22500.0),
            ("2022", 42800.0, 23000.0),
            ("2023", 43500.0, 23200.0),
            ("2024", 44300.0, 23500.0),
            ("2025", 45200.0, 23800.0),
        ];
        let records = rows
            .into_iter()
            .map(|(year, production, area)| {
                Record::new(year, TOTAL_CROPS, PAKISTAN, WORLD_BANK, production, area)
            })
            .collect();
        Self::new(WORLD_BANK, records)
    }

    /// Every crop, year and region combination with index-derived values
    pub fn usda() -> Self {
        let crops: [(&str, (usize, usize), (usize, usize)); 5] = [
            ("Wheat", (25000, 5000), (9000, 1000)),
            ("Rice", (8000, 2000), (3000, 500)),
            ("Cotton", (7000, 1500), (2600, 400)),
            ("Corn", (6500, 1200), (2400, 350)),
            ("Soybeans", (3000, 800), (1500, 250)),
        ];
        let years = ["2022", "2023", "2024", "2025"];
        let regions = ["Punjab", "Sindh", "Balochistan", "KPK", "Gilgit-Baltistan"];

        let mut records = Vec::with_capacity(crops.len() * years.len() * regions.len());
        for (ci, (crop, (p_base, p_mod), (a_base, a_mod))) in crops.into_iter().enumerate() {
            for (yi, year) in years.iter().enumerate() {
                for (ri, region) in regions.iter().enumerate() {
                    let unique = (ci + 1) * (yi + 1) * (ri + 1);
                    let production = (p_base + unique % p_mod) as f64;
                    let area = (a_base + unique % a_mod) as f64;
                    records.push(Record::new(*year, crop, *region, USDA, production, area));
                }
            }
        }
        Self::new(USDA, records)
    }

    /// Provincial figures for the major crops, 2019-2021
    pub fn pakistan() -> Self {
        let rows = [
            ("2019", "Wheat", "Punjab", 24_349_000.0, 8_740_000.0),
            ("2019", "Wheat", "Sindh", 3_852_000.0, 1_154_000.0),
            ("2019", "Wheat", "KPK", 945_000.0, 490_000.0),
            ("2019", "Wheat", "Balochistan", 578_000.0, 363_000.0),
            ("2020", "Wheat", "Punjab", 25_248_000.0, 8_809_000.0),
            ("2020", "Wheat", "Sindh", 4_003_000.0, 1_167_000.0),
            ("2020", "Wheat", "KPK", 978_000.0, 503_000.0),
            ("2020", "Wheat", "Balochistan", 592_000.0, 372_000.0),
            ("2021", "Wheat", "Punjab", 26_394_000.0, 8_976_000.0),
            ("2021", "Wheat", "Sindh", 4_256_000.0, 1_189_000.0),
            ("2021", "Wheat", "KPK", 1_032_000.0, 525_000.0),
            ("2021", "Wheat", "Balochistan", 623_000.0, 385_000.0),
            ("2019", "Rice", "Punjab", 4_883_000.0, 2_029_000.0),
            ("2019", "Rice", "Sindh", 2_851_000.0, 755_000.0),
            ("2019", "Rice", "KPK", 152_000.0, 57_000.0),
            ("2019", "Rice", "Balochistan", 547_000.0, 179_000.0),
            ("2020", "Rice", "Punjab", 5_297_000.0, 2_153_000.0),
            ("2020", "Rice", "Sindh", 3_036_000.0, 782_000.0),
            ("2020", "Rice", "KPK", 163_000.0, 60_000.0),
            ("2020", "Rice", "Balochistan", 580_000.0, 187_000.0),
            ("2021", "Rice", "Punjab", 5_482_000.0, 2_213_000.0),
            ("2021", "Rice", "Sindh", 3_156_000.0, 803_000.0),
            ("2019", "Cotton", "Punjab", 6_856_000.0, 5_580_000.0),
            ("2019", "Cotton", "Sindh", 2_461_000.0, 1_542_000.0),
            ("2019", "Cotton", "Balochistan", 97_000.0, 42_000.0),
            ("2020", "Cotton", "Punjab", 5_939_000.0, 5_352_000.0),
            ("2020", "Cotton", "Sindh", 1_985_000.0, 1_484_000.0),
            ("2020", "Cotton", "Balochistan", 103_000.0, 44_000.0),
            ("2019", "Sugarcane", "Punjab", 47_372_000.0, 1_039_000.0),
            ("2019", "Sugarcane", "Sindh", 18_476_000.0, 308_000.0),
            ("2019", "Sugarcane", "KPK", 5_329_000.0, 116_000.0),
            ("2020", "Sugarcane", "Punjab", 49_273_000.0, 1_055_000.0),
            ("2020", "Sugarcane", "Sindh", 19_145_000.0, 316_000.0),
            ("2020", "Sugarcane", "KPK", 5_576_000.0, 121_000.0),
            ("2019", "Maize", "Punjab", 5_289_000.0, 818_000.0),
            ("2019", "Maize", "Sindh", 67_000.0, 38_000.0),
            ("2019", "Maize", "KPK", 897_000.0, 463_000.0),
            ("2020", "Maize", "Punjab", 5_736_000.0, 853_000.0),
            ("2020", "Maize", "Sindh", 72_000.0, 41_000.0),
            ("2020", "Maize", "KPK", 982_000.0, 478_000.0),
        ];
        let records = rows
            .into_iter()
            .map(|(year, crop, region, production, area)| {
                Record::new(year, crop, region, OPEN_DATA_PAKISTAN, production, area)
            })
            .collect();
        Self::new(OPEN_DATA_PAKISTAN, records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl DataSource for FixtureSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _config: &'a SourceConfig) -> FetchFuture<'a> {
        Box::pin(async move {
            let now = Utc::now();
            let records: Vec<Record> = self
                .records
                .iter()
                .cloned()
                .map(|r| r.updated_at(now))
                .collect();
            Ok::<_, SourceError>(records)
        })
    }
}

/// A source that always fails
#[derive(Debug, Clone)]
pub struct FailingSource {
    name: String,
    reason: String,
}

impl FailingSource {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl DataSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _config: &'a SourceConfig) -> FetchFuture<'a> {
        Box::pin(async move { Err::<Vec<Record>, _>(SourceError::unavailable(&self.name, &self.reason)) })
    }
}
