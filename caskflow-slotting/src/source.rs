//! Warehouse data ports.
//!
//! The production system backs these with pick-sheet and inventory queries;
//! the CLI backs them with CSV exports.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::PickEvent;

#[async_trait]
pub trait PickHistorySource: Send + Sync {
    /// Fetch pick events at or after the cutoff.
    async fn picks_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<PickEvent>, String>;
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Resolve current storage locations for the given SKU ids. SKUs with no
    /// location on file are absent from the result.
    async fn locations_for(&self, sku_ids: &[String]) -> Result<HashMap<String, String>, String>;
}
