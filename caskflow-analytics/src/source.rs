//! Repository ports for the order-health analyzer.
//!
//! The analyzer itself only ever sees plain records; these traits are the
//! seams where persistence plugs in. The production system backs them with
//! database queries issued in parallel before analysis; the CLI backs them
//! with CSV files.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::OrderRecord;

/// How many recent orders an analysis run looks at by default.
pub const RECENT_ORDER_LIMIT: usize = 250;

#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetch up to `limit` orders, most recent first.
    async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderRecord>, String>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Resolve display names for the given customer ids. Ids with no known
    /// name are simply absent from the result.
    async fn names_for(&self, customer_ids: &[String]) -> Result<HashMap<String, String>, String>;
}
