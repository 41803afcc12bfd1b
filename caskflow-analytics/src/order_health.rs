//! Order health metrics: pace, revenue trend, ARPDD, and cadence risk.
//!
//! `compute_order_health_metrics` is a pure function over a flat order list.
//! It classifies ordering pace from the gaps between consecutive orders,
//! compares revenue across the trailing 30-day window and the 31–60 day
//! window, and appends plain-language suggestions in a fixed order (pace,
//! then revenue, then account signals, then a fallback) — callers may display
//! only the first N, so the ordering is part of the contract.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::arpdd;
use crate::cadence;
use crate::money;
use crate::types::{OrderHealthMetrics, OrderRecord, OrderStatus};

pub(crate) const ONE_DAY_MS: f64 = 86_400_000.0;

/// Pace at or under this many days between orders is healthy.
const PACE_ON_CADENCE_DAYS: f64 = 14.0;
/// Pace beyond this many days puts the book at risk.
const PACE_AT_RISK_DAYS: f64 = 30.0;
/// Revenue growth threshold on the fractional window delta.
const REVENUE_GROWING_PCT: f64 = 0.05;
/// Revenue decline threshold that triggers the "Down ≥15%" status.
const REVENUE_DOWN_PCT: f64 = -0.15;

/// An order with its nulls resolved, sorted newest-first by the caller.
#[derive(Clone, Debug)]
pub(crate) struct DatedOrder {
    pub ordered_at: DateTime<Utc>,
    pub total: Decimal,
    pub currency: String,
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Compute order health metrics against the current wall clock.
pub fn compute_order_health_metrics(orders: &[OrderRecord]) -> OrderHealthMetrics {
    compute_order_health_metrics_at(orders, Utc::now())
}

/// Compute order health metrics against an injected "now".
///
/// Deterministic for a given input list and timestamp; never fails. Empty
/// input (or input with no dated orders) returns the "Awaiting data"
/// sentinel.
pub fn compute_order_health_metrics_at(
    orders: &[OrderRecord],
    now: DateTime<Utc>,
) -> OrderHealthMetrics {
    if orders.is_empty() {
        return OrderHealthMetrics::awaiting_data("USD");
    }

    let mut dated: Vec<DatedOrder> = orders
        .iter()
        .filter_map(|order| {
            order.ordered_at.map(|ordered_at| DatedOrder {
                ordered_at,
                total: order.total.unwrap_or_default(),
                currency: order.currency.clone().unwrap_or_else(|| "USD".into()),
                customer_id: order.customer_id.clone(),
                status: order.status,
            })
        })
        .collect();
    dated.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));

    if dated.is_empty() {
        let fallback = orders
            .iter()
            .find_map(|order| order.currency.clone())
            .unwrap_or_else(|| "USD".into());
        return OrderHealthMetrics::awaiting_data(&fallback);
    }

    // --- Pace ---
    // Average gap between consecutive orders across the whole book, in
    // fractional days. Fewer than two dated orders means no pace yet.
    let intervals = gap_days(&dated);
    let pace_days = average(&intervals);
    let pace_label = match pace_days {
        None => "Need more history".to_string(),
        Some(days) if days <= PACE_ON_CADENCE_DAYS => "On cadence".to_string(),
        Some(days) if days <= PACE_AT_RISK_DAYS => "Check-in soon".to_string(),
        Some(_) => "At risk".to_string(),
    };
    let pace_summary = match pace_days {
        None => "—".to_string(),
        Some(days) => format!("{} day avg", days.round() as i64),
    };

    // --- Revenue trend ---
    // Decimal sums per window; only the final fractional delta is compared
    // as a float, so currency totals never accumulate float drift.
    let currency = dated[0].currency.clone();
    let mut revenue_last_30 = Decimal::ZERO;
    let mut revenue_prev_30 = Decimal::ZERO;
    for order in &dated {
        let diff_days = window_day(now, order.ordered_at);
        if diff_days <= 30 {
            revenue_last_30 += order.total;
        } else if diff_days <= 60 {
            revenue_prev_30 += order.total;
        }
    }

    let revenue_delta: Option<f64> = if revenue_prev_30 > Decimal::ZERO {
        ((revenue_last_30 - revenue_prev_30) / revenue_prev_30).to_f64()
    } else if revenue_last_30 > Decimal::ZERO {
        // No prior baseline but current revenue exists: treat as +100%.
        Some(1.0)
    } else {
        None
    };

    let revenue_status = match revenue_delta {
        None => "Need more history".to_string(),
        Some(pct) if pct >= REVENUE_GROWING_PCT => "Growing".to_string(),
        Some(pct) if pct <= REVENUE_DOWN_PCT => "Down \u{2265}15%".to_string(),
        Some(pct) if pct < 0.0 => "Softening".to_string(),
        Some(_) => "Holding steady".to_string(),
    };
    let revenue_summary = match revenue_delta {
        None => money::format_currency(&currency, revenue_last_30),
        Some(pct) => format!(
            "{} ({}%)",
            money::format_currency(&currency, revenue_last_30),
            (pct * 100.0).round() as i64
        ),
    };

    // --- Suggestions (order matters: pace, revenue, accounts, fallback) ---
    let mut suggestions: Vec<String> = Vec::new();
    if let Some(days) = pace_days {
        if days > PACE_AT_RISK_DAYS {
            suggestions.push(
                "Pace is slipping beyond 30 days. Queue outreach for buyers without recent activity."
                    .to_string(),
            );
        }
    }
    if let Some(pct) = revenue_delta {
        if pct <= REVENUE_DOWN_PCT {
            suggestions.push(
                "Revenue is down \u{2265}15% vs. the prior window. Review allocations and recent invoices."
                    .to_string(),
            );
        }
    }

    let arpdd = arpdd::compute_arpdd(&dated, now);
    let account_signals = cadence::compute_account_signals(&dated, now);

    if account_signals.at_risk > 0 {
        suggestions.push(format!(
            "{} account{} are past cadence. Line up outreach.",
            account_signals.at_risk,
            plural_s(account_signals.at_risk)
        ));
    } else if account_signals.due_soon > 0 {
        suggestions.push(format!(
            "{} account{} come due soon. Confirm their next order.",
            account_signals.due_soon,
            plural_s(account_signals.due_soon)
        ));
    }

    if suggestions.is_empty() && revenue_delta.is_none() {
        suggestions.push(
            "Connect historical order feeds to unlock proactive revenue and pace monitoring."
                .to_string(),
        );
    }

    OrderHealthMetrics {
        pace_label,
        pace_summary,
        revenue_status,
        revenue_summary,
        suggestions,
        arpdd,
        account_signals,
    }
}

// ---------------------------------------------------------------------------
// Shared day math
// ---------------------------------------------------------------------------

/// Gaps between consecutive orders in a newest-first list, in fractional
/// days. Clock-skewed pairs clamp to zero instead of going negative.
pub(crate) fn gap_days(orders: &[DatedOrder]) -> Vec<f64> {
    orders
        .windows(2)
        .map(|pair| {
            let diff = (pair[0].ordered_at - pair[1].ordered_at).num_milliseconds() as f64
                / ONE_DAY_MS;
            diff.max(0.0)
        })
        .collect()
}

pub(crate) fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Whole days between `now` and a timestamp, floored. Future timestamps
/// produce negative values, which land in the current window.
pub(crate) fn window_day(now: DateTime<Utc>, ts: DateTime<Utc>) -> i64 {
    ((now - ts).num_milliseconds() as f64 / ONE_DAY_MS).floor() as i64
}

fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
