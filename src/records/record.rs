//! # Record Model
//!
//! One agricultural observation, its dedup key, and the payload adapter
//! that turns client JSON into a validated [`Record`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{RecordError, RecordResult};

/// Crop that stands for a national aggregate rather than a real crop
pub const TOTAL_CROPS: &str = "Total Crops";

/// Cropping season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Rabi,
    Kharif,
    Annual,
}

/// One agricultural observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Four-digit year
    pub year: String,

    /// Month of the observation (1-12), when the source is monthly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,

    pub crop: String,
    pub region: String,

    /// Provenance tag, e.g. "World Bank"
    pub source: String,

    /// Tons
    pub production: f64,

    /// Hectares
    pub area: f64,

    /// production / area, or 0 when area is 0
    #[serde(rename = "yield")]
    pub crop_yield: f64,

    pub last_updated: DateTime<Utc>,
}

impl Record {
    /// Create a record stamped with the current time
    pub fn new(
        year: impl Into<String>,
        crop: impl Into<String>,
        region: impl Into<String>,
        source: impl Into<String>,
        production: f64,
        area: f64,
    ) -> Self {
        Self {
            year: year.into(),
            month: None,
            season: None,
            crop: crop.into(),
            region: region.into(),
            source: source.into(),
            production,
            area,
            crop_yield: derive_yield(production, area),
            last_updated: Utc::now(),
        }
    }

    pub fn with_month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    /// Composite identity used for deduplication
    pub fn key(&self) -> RecordKey {
        RecordKey {
            year: self.year.clone(),
            month: self.month,
            crop: self.crop.clone(),
            region: self.region.clone(),
            source: self.source.clone(),
        }
    }

    /// Year as a number, when it parses
    pub fn numeric_year(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }

    /// Stable display order: year (numeric first), crop, region, month, source
    pub fn display_cmp(&self, other: &Record) -> Ordering {
        compare_years(&self.year, &other.year)
            .then_with(|| self.crop.cmp(&other.crop))
            .then_with(|| self.region.cmp(&other.region))
            .then_with(|| self.month.cmp(&other.month))
            .then_with(|| self.source.cmp(&other.source))
    }
}

/// Yield guarded against zero or malformed area
pub fn derive_yield(production: f64, area: f64) -> f64 {
    if area > 0.0 && area.is_finite() && production.is_finite() {
        production / area
    } else {
        0.0
    }
}

/// Order year strings numerically, falling back to text for unparseable ones
pub fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i32>(), b.trim().parse::<i32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Dedup key: (year, month-if-present, crop, region, source)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub year: String,
    pub month: Option<u8>,
    pub crop: String,
    pub region: String,
    pub source: String,
}

/// A record held by a store, with its assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: Record,
}

impl StoredRecord {
    pub fn new(record: Record) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }
}

/// Anything that carries a [`Record`]; lets the aggregation pipeline work
/// on raw source output and stored rows alike.
pub trait AsRecord {
    fn as_record(&self) -> &Record;
}

impl AsRecord for Record {
    fn as_record(&self) -> &Record {
        self
    }
}

impl AsRecord for StoredRecord {
    fn as_record(&self) -> &Record {
        &self.record
    }
}

impl<T: AsRecord> AsRecord for &T {
    fn as_record(&self) -> &Record {
        (*self).as_record()
    }
}

/// Client-supplied record, as accepted by POST and PUT
///
/// Accepts the legacy `cropsYield` spelling alongside `yield`. Any yield
/// sent by the client is ignored and recomputed from production and area.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub month: Option<Value>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub production: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default, rename = "yield")]
    pub crop_yield: Option<f64>,
    #[serde(default)]
    pub crops_yield: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RecordPayload {
    /// Parse a JSON body into a payload
    pub fn from_json(body: Value) -> RecordResult<Self> {
        if !body.is_object() {
            return Err(RecordError::InvalidBody("expected a JSON object".to_string()));
        }
        serde_json::from_value(body).map_err(|e| RecordError::InvalidBody(e.to_string()))
    }

    /// Validate and convert into a record. `now` stamps records that carry
    /// no `lastUpdated` of their own.
    pub fn into_record(self, now: DateTime<Utc>) -> RecordResult<Record> {
        let year = parse_year(self.year)?;
        let month = parse_month(self.month)?;
        let crop = required_text("crop", self.crop)?;
        let region = required_text("region", self.region)?;
        let source = required_text("source", self.source)?;
        let production = required_amount("production", self.production)?;
        let area = required_amount("area", self.area)?;

        Ok(Record {
            year,
            month,
            season: self.season,
            crop,
            region,
            source,
            production,
            area,
            crop_yield: derive_yield(production, area),
            last_updated: self.last_updated.unwrap_or(now),
        })
    }

    /// Overlay the fields present in this payload onto `base`, then
    /// validate the merged record as a whole
    pub fn overlay(self, base: &Record) -> RecordResult<Record> {
        let merged = RecordPayload {
            year: self.year.or_else(|| Some(Value::String(base.year.clone()))),
            month: self.month.or_else(|| base.month.map(Value::from)),
            season: self.season.or(base.season),
            crop: self.crop.or_else(|| Some(base.crop.clone())),
            region: self.region.or_else(|| Some(base.region.clone())),
            source: self.source.or_else(|| Some(base.source.clone())),
            production: self.production.or(Some(base.production)),
            area: self.area.or(Some(base.area)),
            crop_yield: None,
            crops_yield: None,
            last_updated: self.last_updated,
        };
        merged.into_record(base.last_updated)
    }
}

fn parse_year(value: Option<Value>) -> RecordResult<String> {
    let text = match value {
        None | Some(Value::Null) => return Err(RecordError::MissingField("year")),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(RecordError::invalid("year", format!("unexpected {}", other))),
    };
    if text.is_empty() {
        return Err(RecordError::MissingField("year"));
    }
    if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(RecordError::invalid("year", "must be four digits"));
    }
    Ok(text)
}

fn parse_month(value: Option<Value>) -> RecordResult<Option<u8>> {
    let month = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u8>()
            .map_err(|_| RecordError::invalid("month", "must be a number"))?,
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|m| u8::try_from(m).ok())
            .ok_or_else(|| RecordError::invalid("month", "must be between 1 and 12"))?,
        Some(_) => return Err(RecordError::invalid("month", "must be a number")),
    };
    if !(1..=12).contains(&month) {
        return Err(RecordError::invalid("month", "must be between 1 and 12"));
    }
    Ok(Some(month))
}

fn required_text(field: &'static str, value: Option<String>) -> RecordResult<String> {
    match value.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(RecordError::MissingField(field)),
    }
}

fn required_amount(field: &'static str, value: Option<f64>) -> RecordResult<f64> {
    let amount = value.ok_or(RecordError::MissingField(field))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(RecordError::invalid(field, "must be a non-negative number"));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(body: Value) -> RecordResult<Record> {
        RecordPayload::from_json(body)?.into_record(Utc::now())
    }

    #[test]
    fn test_yield_derivation() {
        assert_eq!(derive_yield(100.0, 50.0), 2.0);
        assert_eq!(derive_yield(100.0, 0.0), 0.0);
        assert_eq!(derive_yield(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_key_includes_month_when_present() {
        let yearly = Record::new("2022", "Wheat", "Punjab", "USDA", 10.0, 5.0);
        let monthly = yearly.clone().with_month(3);
        assert_ne!(yearly.key(), monthly.key());
        assert_eq!(monthly.key().month, Some(3));
    }

    #[test]
    fn test_serializes_canonical_yield_field() {
        let record = Record::new("2021", "Rice", "Sindh", "USDA", 300.0, 100.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["yield"], 3.0);
        assert!(json.get("cropsYield").is_none());
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("month").is_none());
    }

    #[test]
    fn test_stored_record_is_flat() {
        let stored = StoredRecord::new(Record::new("2021", "Rice", "Sindh", "USDA", 3.0, 1.0));
        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("id").is_some());
        assert_eq!(json["crop"], "Rice");

        let back: StoredRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_payload_accepts_legacy_yield_alias() {
        let record = payload(json!({
            "year": "2020", "crop": "Wheat", "region": "Punjab", "source": "A",
            "production": 100, "area": 50, "cropsYield": 99.0
        }))
        .unwrap();
        // Client yield is ignored
        assert_eq!(record.crop_yield, 2.0);
    }

    #[test]
    fn test_payload_accepts_both_yield_spellings() {
        let record = payload(json!({
            "year": "2020", "crop": "Wheat", "region": "Punjab", "source": "A",
            "production": 100, "area": 50, "cropsYield": 7.0, "yield": 7.0,
            "_id": "64b0c0ffee", "__v": 0
        }))
        .unwrap();
        assert_eq!(record.crop_yield, 2.0);
    }

    #[test]
    fn test_overlay_keeps_absent_fields() {
        let base = Record::new("2021", "Rice", "Sindh", "USDA", 300.0, 100.0).with_month(4);
        let patch = RecordPayload::from_json(json!({"production": 500})).unwrap();
        let merged = patch.overlay(&base).unwrap();

        assert_eq!(merged.production, 500.0);
        assert_eq!(merged.crop_yield, 5.0);
        assert_eq!(merged.key(), base.key());
        assert_eq!(merged.last_updated, base.last_updated);
    }

    #[test]
    fn test_overlay_revalidates() {
        let base = Record::new("2021", "Rice", "Sindh", "USDA", 300.0, 100.0);
        let err = RecordPayload::from_json(json!({"crop": " "}))
            .unwrap()
            .overlay(&base)
            .unwrap_err();
        assert_eq!(err, RecordError::MissingField("crop"));

        let err = RecordPayload::from_json(json!({"month": 14}))
            .unwrap()
            .overlay(&base)
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { field: "month", .. }));
    }

    #[test]
    fn test_payload_accepts_numeric_year_and_string_month() {
        let record = payload(json!({
            "year": 2023, "month": "7", "crop": "Rice", "region": "Sindh",
            "source": "USDA", "production": 10, "area": 0
        }))
        .unwrap();
        assert_eq!(record.year, "2023");
        assert_eq!(record.month, Some(7));
        assert_eq!(record.crop_yield, 0.0);
    }

    #[test]
    fn test_payload_missing_fields() {
        let err = payload(json!({"year": "2020", "region": "Punjab", "source": "A",
            "production": 1, "area": 1}))
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField("crop"));

        let err = payload(json!({"crop": "Wheat"})).unwrap_err();
        assert_eq!(err, RecordError::MissingField("year"));

        let err = payload(json!({"year": "2020", "crop": "Wheat", "region": "  ",
            "source": "A", "production": 1, "area": 1}))
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField("region"));
    }

    #[test]
    fn test_payload_invalid_values() {
        let base = |field: &str, value: Value| {
            let mut body = json!({"year": "2020", "crop": "Wheat", "region": "Punjab",
                "source": "A", "production": 1, "area": 1});
            body[field] = value;
            payload(body)
        };
        assert!(matches!(base("year", json!("20x0")), Err(RecordError::InvalidField { field: "year", .. })));
        assert!(matches!(base("month", json!(13)), Err(RecordError::InvalidField { field: "month", .. })));
        assert!(matches!(base("production", json!(-5)), Err(RecordError::InvalidField { field: "production", .. })));
        assert!(matches!(base("area", json!("lots")), Err(RecordError::InvalidBody(_))));
    }

    #[test]
    fn test_payload_rejects_non_object() {
        assert!(matches!(payload(json!([1, 2])), Err(RecordError::InvalidBody(_))));
    }

    #[test]
    fn test_compare_years() {
        assert_eq!(compare_years("2019", "2020"), Ordering::Less);
        assert_eq!(compare_years("999", "2020"), Ordering::Less);
        assert_eq!(compare_years("n/a", "2020"), Ordering::Greater);
    }
}
