//! Per-customer cadence risk signals.
//!
//! Only fulfilled orders with a customer id count toward cadence: a pending
//! or cancelled order says nothing about when a buyer actually reorders. A
//! customer needs at least three fulfilled orders before being tracked, and
//! the pace estimate looks at the gaps between the five most recent
//! consecutive pairs only, so an account's ancient history cannot drown out
//! its current rhythm.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::order_health::{average, gap_days, DatedOrder, ONE_DAY_MS};
use crate::types::{AccountSignal, AccountSignalSummary, AccountStanding, OrderStatus};

/// Minimum fulfilled orders before a customer is tracked at all.
pub const MIN_TRACKED_ORDERS: usize = 3;
/// Pace is averaged over at most this many recent order gaps.
pub const MAX_PACE_INTERVALS: usize = 5;
/// At-risk threshold: pace times this multiplier...
pub const RISK_PACE_MULTIPLIER: f64 = 1.5;
/// ...or pace plus this many grace days, whichever is larger. Keeps weekly
/// buyers from tripping the alarm three days late.
pub const RISK_GRACE_DAYS: f64 = 7.0;
/// Each risk list is truncated to this many entries.
pub const LIST_CAP: usize = 5;

pub(crate) fn compute_account_signals(
    orders: &[DatedOrder],
    now: DateTime<Utc>,
) -> AccountSignalSummary {
    let mut summary = AccountSignalSummary::default();

    // BTreeMap keeps customer iteration deterministic across calls.
    let mut by_customer: BTreeMap<String, Vec<&DatedOrder>> = BTreeMap::new();
    for order in orders {
        if order.status != Some(OrderStatus::Fulfilled) {
            continue;
        }
        let Some(customer_id) = &order.customer_id else {
            continue;
        };
        by_customer.entry(customer_id.clone()).or_default().push(order);
    }

    for (customer_id, mut list) in by_customer {
        list.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        if list.len() < MIN_TRACKED_ORDERS {
            continue;
        }

        let owned: Vec<DatedOrder> = list.iter().map(|order| (*order).clone()).collect();
        let span = (owned.len() - 1).min(MAX_PACE_INTERVALS);
        let intervals: Vec<f64> = gap_days(&owned).into_iter().take(span).collect();

        let Some(average_pace) = average(&intervals) else {
            continue;
        };
        if average_pace <= 0.0 {
            // Same-day duplicate rows produce a degenerate zero pace.
            continue;
        }

        let days_since_last =
            ((now - owned[0].ordered_at).num_milliseconds() as f64 / ONE_DAY_MS).max(0.0);
        let risk_threshold = (average_pace * RISK_PACE_MULTIPLIER).max(average_pace + RISK_GRACE_DAYS);
        let lateness = (days_since_last - average_pace).max(0.0);

        summary.tracked += 1;

        let make_signal = |status: AccountStanding| AccountSignal {
            customer_id: customer_id.clone(),
            days_since_last_order: days_since_last.round() as i64,
            average_pace: average_pace.round() as i64,
            lateness: lateness.round() as i64,
            status,
            name: None,
        };

        if days_since_last >= risk_threshold {
            summary.at_risk += 1;
            summary.at_risk_customers.push(make_signal(AccountStanding::AtRisk));
        } else if days_since_last >= average_pace {
            summary.due_soon += 1;
            summary.due_soon_customers.push(make_signal(AccountStanding::DueSoon));
        } else {
            summary.healthy += 1;
        }
    }

    summary
        .at_risk_customers
        .sort_by(|a, b| b.lateness.cmp(&a.lateness));
    summary.at_risk_customers.truncate(LIST_CAP);
    summary
        .due_soon_customers
        .sort_by(|a, b| b.lateness.cmp(&a.lateness));
    summary.due_soon_customers.truncate(LIST_CAP);

    summary.hotlist = summary
        .at_risk_customers
        .iter()
        .chain(summary.due_soon_customers.iter())
        .cloned()
        .collect();

    summary
}
