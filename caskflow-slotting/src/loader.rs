//! CSV loaders for pick history and SKU locations.
//!
//! Pick export columns:
//!   sku_id, sku_code, product_name, quantity, picked_at,
//!   cases_per_pallet, items_per_case
//! The two dimension columns may be blank. Location export columns:
//!   sku_id, location
//! Timestamps accept RFC 3339 or bare `YYYY-MM-DD` dates.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::source::{LocationSource, PickHistorySource};
use crate::types::PickEvent;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("invalid timestamp '{value}' at line {line}")]
    InvalidTimestamp { line: usize, value: String },

    #[error("invalid quantity '{value}' at line {line}")]
    InvalidQuantity { line: usize, value: String },

    #[error("invalid dimension '{value}' at line {line}")]
    InvalidDimension { line: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct PickCsvRow {
    sku_id: String,
    sku_code: String,
    product_name: String,
    quantity: String,
    picked_at: String,
    cases_per_pallet: String,
    items_per_case: String,
}

#[derive(Debug, Deserialize)]
struct LocationCsvRow {
    sku_id: String,
    location: String,
}

/// Load pick events from any CSV reader.
pub fn load_picks<R: Read>(reader: R) -> Result<Vec<PickEvent>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for (index, result) in csv_reader.deserialize().enumerate() {
        let line = index + 2; // header occupies line 1
        let row: PickCsvRow = result.map_err(|source| LoadError::Csv { line, source })?;

        events.push(PickEvent {
            sku_id: row.sku_id,
            sku_code: row.sku_code,
            product_name: row.product_name,
            quantity: parse_quantity(&row.quantity, line)?,
            picked_at: parse_timestamp(&row.picked_at, line)?,
            cases_per_pallet: parse_dimension(&row.cases_per_pallet, line)?,
            items_per_case: parse_dimension(&row.items_per_case, line)?,
        });
    }

    log::debug!("loaded {} pick rows", events.len());
    Ok(events)
}

/// Load pick events from a CSV file path.
pub fn load_picks_file<P: AsRef<Path>>(path: P) -> Result<Vec<PickEvent>, LoadError> {
    load_picks(open(path)?)
}

/// Load a sku_id to location map from any CSV reader.
pub fn load_locations<R: Read>(reader: R) -> Result<HashMap<String, String>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = HashMap::new();
    for (index, result) in csv_reader.deserialize().enumerate() {
        let line = index + 2;
        let row: LocationCsvRow = result.map_err(|source| LoadError::Csv { line, source })?;
        if !row.location.is_empty() {
            locations.insert(row.sku_id, row.location);
        }
    }
    Ok(locations)
}

/// Load a location map from a CSV file path.
pub fn load_locations_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, LoadError> {
    load_locations(open(path)?)
}

fn open<P: AsRef<Path>>(path: P) -> Result<std::fs::File, LoadError> {
    let path = path.as_ref();
    std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })
}

fn parse_timestamp(value: &str, line: usize) -> Result<DateTime<Utc>, LoadError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(LoadError::InvalidTimestamp {
        line,
        value: value.to_string(),
    })
}

fn parse_quantity(value: &str, line: usize) -> Result<f64, LoadError> {
    value.parse().map_err(|_| LoadError::InvalidQuantity {
        line,
        value: value.to_string(),
    })
}

fn parse_dimension(value: &str, line: usize) -> Result<Option<u32>, LoadError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| LoadError::InvalidDimension {
            line,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Port adapters
// ---------------------------------------------------------------------------

/// CSV-backed pick history.
pub struct CsvPickHistory {
    events: Vec<PickEvent>,
}

impl CsvPickHistory {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self {
            events: load_picks_file(path)?,
        })
    }

    pub fn from_events(events: Vec<PickEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait]
impl PickHistorySource for CsvPickHistory {
    async fn picks_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<PickEvent>, String> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.picked_at >= cutoff)
            .cloned()
            .collect())
    }
}

/// CSV-backed location directory.
pub struct CsvLocations {
    locations: HashMap<String, String>,
}

impl CsvLocations {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self {
            locations: load_locations_file(path)?,
        })
    }

    pub fn from_map(locations: HashMap<String, String>) -> Self {
        Self { locations }
    }
}

#[async_trait]
impl LocationSource for CsvLocations {
    async fn locations_for(&self, sku_ids: &[String]) -> Result<HashMap<String, String>, String> {
        Ok(sku_ids
            .iter()
            .filter_map(|id| {
                self.locations
                    .get(id)
                    .map(|location| (id.clone(), location.clone()))
            })
            .collect())
    }
}
