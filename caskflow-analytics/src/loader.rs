//! CSV order history loader.
//!
//! Parses order export files into `OrderRecord`s plus a customer-name map.
//! Expected CSV columns:
//!   ordered_at, total, currency, status, customer_id, customer_name
//! Any field may be blank; blank fields become `None` rather than errors.
//! Timestamps accept RFC 3339 or bare `YYYY-MM-DD` dates.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::source::{CustomerDirectory, OrderSource};
use crate::types::{OrderRecord, OrderStatus};

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

    #[error("invalid amount '{value}' at line {line}")]
    InvalidAmount { line: usize, value: String },

    #[error("invalid status '{value}' at line {line}")]
    InvalidStatus { line: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct OrderCsvRow {
    ordered_at: String,
    total: String,
    currency: String,
    status: String,
    customer_id: String,
    customer_name: String,
}

/// Orders plus the customer-name directory read from one export file.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    pub orders: Vec<OrderRecord>,
    pub customer_names: HashMap<String, String>,
}

/// Load an order book from any CSV reader.
pub fn load_orders<R: Read>(reader: R) -> Result<OrderBook, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut book = OrderBook::default();
    for (index, result) in csv_reader.deserialize().enumerate() {
        let line = index + 2; // header occupies line 1
        let row: OrderCsvRow = result.map_err(|source| LoadError::Csv { line, source })?;

        let ordered_at = parse_timestamp(&row.ordered_at, line)?;
        let total = parse_amount(&row.total, line)?;
        let status = parse_status(&row.status, line)?;
        let customer_id = non_blank(&row.customer_id);

        if let (Some(id), Some(name)) = (&customer_id, non_blank(&row.customer_name)) {
            book.customer_names.insert(id.clone(), name);
        }

        book.orders.push(OrderRecord {
            ordered_at,
            total,
            currency: non_blank(&row.currency),
            customer_id,
            status,
        });
    }

    log::debug!("loaded {} order rows", book.orders.len());
    Ok(book)
}

/// Load an order book from a CSV file path.
pub fn load_orders_file<P: AsRef<Path>>(path: P) -> Result<OrderBook, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_orders(file)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_timestamp(value: &str, line: usize) -> Result<Option<DateTime<Utc>>, LoadError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }
    Err(LoadError::InvalidTimestamp { line, value })
}

fn parse_amount(value: &str, line: usize) -> Result<Option<Decimal>, LoadError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    Decimal::from_str(&value)
        .map(Some)
        .map_err(|_| LoadError::InvalidAmount { line, value })
}

fn parse_status(value: &str, line: usize) -> Result<Option<OrderStatus>, LoadError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    OrderStatus::from_str(&value)
        .map(Some)
        .map_err(|_| LoadError::InvalidStatus { line, value })
}

// ---------------------------------------------------------------------------
// Port adapter
// ---------------------------------------------------------------------------

/// CSV-backed implementation of the order repository ports.
pub struct CsvOrderBook {
    book: OrderBook,
}

impl CsvOrderBook {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self {
            book: load_orders_file(path)?,
        })
    }

    pub fn from_book(book: OrderBook) -> Self {
        Self { book }
    }

    pub fn len(&self) -> usize {
        self.book.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book.orders.is_empty()
    }
}

#[async_trait]
impl OrderSource for CsvOrderBook {
    async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderRecord>, String> {
        let mut orders = self.book.orders.clone();
        // Most recent first, undated rows last — same shape the repository
        // query returns.
        orders.sort_by(|a, b| match (a.ordered_at, b.ordered_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(&a_at),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        orders.truncate(limit);
        Ok(orders)
    }
}

#[async_trait]
impl CustomerDirectory for CsvOrderBook {
    async fn names_for(&self, customer_ids: &[String]) -> Result<HashMap<String, String>, String> {
        Ok(customer_ids
            .iter()
            .filter_map(|id| {
                self.book
                    .customer_names
                    .get(id)
                    .map(|name| (id.clone(), name.clone()))
            })
            .collect())
    }
}
