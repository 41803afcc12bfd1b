use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Order lifecycle status as stored by the order repository.
///
/// Only `Fulfilled` orders count toward cadence tracking; the other statuses
/// still contribute to pace and revenue windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Draft,
    Submitted,
    PartiallyFulfilled,
    Fulfilled,
    Delivered,
    Cancelled,
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(OrderStatus::Draft),
            "SUBMITTED" => Ok(OrderStatus::Submitted),
            "PARTIALLY_FULFILLED" => Ok(OrderStatus::PartiallyFulfilled),
            "FULFILLED" => Ok(OrderStatus::Fulfilled),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Submitted => "SUBMITTED",
            OrderStatus::PartiallyFulfilled => "PARTIALLY_FULFILLED",
            OrderStatus::Fulfilled => "FULFILLED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// A single order snapshot as supplied by the order repository.
///
/// Every field is optional: the analyzer treats nulls as absent data, never
/// as an error. Totals are arbitrary-precision decimals to keep currency
/// sums exact.
#[derive(Clone, Debug, Default)]
pub struct OrderRecord {
    pub ordered_at: Option<DateTime<Utc>>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Whether an account is past its cadence or merely coming due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountStanding {
    AtRisk,
    DueSoon,
}

/// Cadence risk snapshot for a single customer.
///
/// Day counts are rounded to whole days for display. `name` is filled in by
/// an optional enrichment step after analysis; the analyzer itself never
/// needs customer names.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSignal {
    pub customer_id: String,
    pub days_since_last_order: i64,
    pub average_pace: i64,
    pub lateness: i64,
    pub status: AccountStanding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Average revenue per delivery day over the trailing 30-day window,
/// compared against the 31–60 day window.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArpddMetrics {
    pub status: String,
    pub summary: String,
    pub current_value: Option<f64>,
    pub previous_value: Option<f64>,
    pub change_percent: Option<f64>,
    pub currency: String,
}

/// Aggregated cadence tracking counts plus the ranked risk lists.
///
/// `hotlist` is always `at_risk_customers` followed by `due_soon_customers`,
/// each capped at 5 entries sorted by lateness descending.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSignalSummary {
    pub tracked: usize,
    pub healthy: usize,
    pub due_soon: usize,
    pub at_risk: usize,
    pub at_risk_customers: Vec<AccountSignal>,
    pub due_soon_customers: Vec<AccountSignal>,
    pub hotlist: Vec<AccountSignal>,
}

/// The full order-health report consumed by the dashboard and copilot.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHealthMetrics {
    pub pace_label: String,
    pub pace_summary: String,
    pub revenue_status: String,
    pub revenue_summary: String,
    pub suggestions: Vec<String>,
    pub arpdd: ArpddMetrics,
    pub account_signals: AccountSignalSummary,
}

impl OrderHealthMetrics {
    /// Sentinel result for an empty or entirely undated order list.
    pub fn awaiting_data(currency: &str) -> Self {
        Self {
            pace_label: "Awaiting data".into(),
            pace_summary: "—".into(),
            revenue_status: "Awaiting data".into(),
            revenue_summary: "—".into(),
            suggestions: Vec::new(),
            arpdd: ArpddMetrics {
                status: "Awaiting data".into(),
                summary: "—".into(),
                current_value: None,
                previous_value: None,
                change_percent: None,
                currency: currency.to_string(),
            },
            account_signals: AccountSignalSummary::default(),
        }
    }
}
