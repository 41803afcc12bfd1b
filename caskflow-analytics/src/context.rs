//! Copilot prompt context helpers.
//!
//! The chat surface wants a few extras beyond the health metrics: raw weekly
//! and monthly revenue totals, hotlist entries enriched with display names,
//! and a short list of follow-up prompts seeded from the current signals.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::types::{AccountSignal, OrderRecord};

/// Trailing 7-day and 30-day revenue totals with order counts.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodSnapshot {
    pub weekly_revenue: Decimal,
    pub weekly_orders: usize,
    pub monthly_revenue: Decimal,
    pub monthly_orders: usize,
    pub currency: String,
}

/// Sum revenue and order counts over the trailing week and month.
pub fn period_snapshot(orders: &[OrderRecord], now: DateTime<Utc>) -> PeriodSnapshot {
    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);

    let mut snapshot = PeriodSnapshot {
        weekly_revenue: Decimal::ZERO,
        weekly_orders: 0,
        monthly_revenue: Decimal::ZERO,
        monthly_orders: 0,
        currency: orders
            .iter()
            .find_map(|order| order.currency.clone())
            .unwrap_or_else(|| "USD".into()),
    };

    for order in orders {
        let Some(ordered_at) = order.ordered_at else {
            continue;
        };
        let total = order.total.unwrap_or_default();
        if ordered_at >= month_ago {
            snapshot.monthly_revenue += total;
            snapshot.monthly_orders += 1;
        }
        if ordered_at >= week_ago {
            snapshot.weekly_revenue += total;
            snapshot.weekly_orders += 1;
        }
    }

    snapshot
}

/// Join display names onto hotlist entries. Missing ids keep `name: None`.
pub fn attach_customer_names(
    signals: &[AccountSignal],
    names: &HashMap<String, String>,
) -> Vec<AccountSignal> {
    signals
        .iter()
        .map(|signal| AccountSignal {
            name: names.get(&signal.customer_id).cloned(),
            ..signal.clone()
        })
        .collect()
}

/// Follow-up prompts offered alongside a copilot reply.
///
/// The hotlist head (by name when resolved, id otherwise) leads, then two
/// fixed prompts about ARPDD and invoices.
pub fn build_follow_ups(hotlist: &[AccountSignal]) -> Vec<String> {
    let mut follow_ups = Vec::new();

    if let Some(top) = hotlist.first() {
        let label = top.name.clone().unwrap_or_else(|| top.customer_id.clone());
        follow_ups.push(format!("Show cadence history for {}.", label));
    }

    follow_ups.push("What's the latest ARPDD change versus last month?".to_string());
    follow_ups.push("List invoices contributing to the current revenue status.".to_string());

    follow_ups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountStanding;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn order(now: DateTime<Utc>, days_ago: i64, total: i64) -> OrderRecord {
        OrderRecord {
            ordered_at: Some(now - Duration::days(days_ago)),
            total: Some(Decimal::new(total, 0)),
            currency: Some("USD".into()),
            customer_id: None,
            status: None,
        }
    }

    fn signal(customer_id: &str, name: Option<&str>) -> AccountSignal {
        AccountSignal {
            customer_id: customer_id.to_string(),
            days_since_last_order: 40,
            average_pace: 20,
            lateness: 20,
            status: AccountStanding::AtRisk,
            name: name.map(|n| n.to_string()),
        }
    }

    #[test]
    fn weekly_window_nests_inside_monthly() {
        let now = test_now();
        let orders = vec![order(now, 2, 500), order(now, 20, 700), order(now, 45, 900)];
        let snapshot = period_snapshot(&orders, now);
        assert_eq!(snapshot.weekly_revenue, Decimal::new(500, 0));
        assert_eq!(snapshot.weekly_orders, 1);
        assert_eq!(snapshot.monthly_revenue, Decimal::new(1200, 0));
        assert_eq!(snapshot.monthly_orders, 2);
    }

    #[test]
    fn names_join_by_customer_id() {
        let mut names = HashMap::new();
        names.insert("c1".to_string(), "Harbor Bottle Shop".to_string());
        let enriched = attach_customer_names(&[signal("c1", None), signal("c2", None)], &names);
        assert_eq!(enriched[0].name.as_deref(), Some("Harbor Bottle Shop"));
        assert_eq!(enriched[1].name, None);
    }

    #[test]
    fn follow_ups_lead_with_hotlist_head() {
        let follow_ups = build_follow_ups(&[signal("c9", Some("Dockside Deli"))]);
        assert_eq!(follow_ups.len(), 3);
        assert_eq!(follow_ups[0], "Show cadence history for Dockside Deli.");
    }

    #[test]
    fn follow_ups_without_hotlist_skip_the_cadence_prompt() {
        let follow_ups = build_follow_ups(&[]);
        assert_eq!(follow_ups.len(), 2);
        assert!(follow_ups[0].contains("ARPDD"));
    }
}
