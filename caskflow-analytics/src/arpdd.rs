//! ARPDD: average revenue per delivery day.
//!
//! Window revenue divided by the count of distinct calendar days that saw at
//! least one order — a throughput-normalized revenue signal. Ten orders on
//! one delivery day count as one day, not ten.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::money;
use crate::order_health::{window_day, DatedOrder};
use crate::types::ArpddMetrics;

/// Change threshold (fractional) for the "Up" / "Down" statuses.
const ARPDD_SWING_PCT: f64 = 0.10;

pub(crate) fn compute_arpdd(orders: &[DatedOrder], now: DateTime<Utc>) -> ArpddMetrics {
    let currency = orders
        .first()
        .map(|order| order.currency.clone())
        .unwrap_or_else(|| "USD".into());

    let mut current_days: HashSet<NaiveDate> = HashSet::new();
    let mut previous_days: HashSet<NaiveDate> = HashSet::new();
    let mut current_revenue = Decimal::ZERO;
    let mut previous_revenue = Decimal::ZERO;

    for order in orders {
        let diff_days = window_day(now, order.ordered_at);
        let day = order.ordered_at.date_naive();
        if diff_days <= 30 {
            current_days.insert(day);
            current_revenue += order.total;
        } else if diff_days <= 60 {
            previous_days.insert(day);
            previous_revenue += order.total;
        }
    }

    let current_avg: Option<Decimal> = if current_days.is_empty() {
        None
    } else {
        Some(current_revenue / Decimal::from(current_days.len() as u64))
    };
    let previous_avg: Option<Decimal> = if previous_days.is_empty() {
        None
    } else {
        Some(previous_revenue / Decimal::from(previous_days.len() as u64))
    };

    let change_percent: Option<f64> = match (current_avg, previous_avg) {
        (Some(current), Some(previous)) if previous > Decimal::ZERO => {
            ((current - previous) / previous).to_f64()
        }
        _ => None,
    };

    let status = match (current_avg, change_percent) {
        (None, _) => "Awaiting data",
        (Some(_), None) => "Tracking",
        (Some(_), Some(pct)) if pct >= ARPDD_SWING_PCT => "Up",
        (Some(_), Some(pct)) if pct <= -ARPDD_SWING_PCT => "Down",
        (Some(_), Some(_)) => "Steady",
    };

    let current_value = current_avg.and_then(|avg| avg.to_f64());
    let previous_value = previous_avg.and_then(|avg| avg.to_f64());

    let summary = match (current_value, change_percent) {
        (None, _) => "—".to_string(),
        (Some(value), None) => format!("{} / day", money::format_currency_f64(&currency, value)),
        (Some(value), Some(pct)) => format!(
            "{} / day ({}%)",
            money::format_currency_f64(&currency, value),
            (pct * 100.0).round() as i64
        ),
    };

    ArpddMetrics {
        status: status.to_string(),
        summary,
        current_value,
        previous_value,
        change_percent,
        currency,
    }
}
