//! Pick-activity aggregation.
//!
//! Folds raw pick events into per-SKU monthly activity metrics. Frequency is
//! weighted three times heavier than volume in the composite score because
//! each pick costs a walk regardless of how many cases come back.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::{ActivityMetrics, PickEvent};

/// Days of pick history analyzed when the caller does not say otherwise.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;
/// Composite score weight on picks per month.
pub const FREQUENCY_WEIGHT: f64 = 3.0;
/// Composite score weight on cases per month.
pub const VOLUME_WEIGHT: f64 = 1.0;
/// Pallet configuration assumed when the SKU record has none.
pub const DEFAULT_CASES_PER_PALLET: u32 = 50;
/// Case configuration assumed when the SKU record has none.
pub const DEFAULT_ITEMS_PER_CASE: u32 = 12;

struct SkuAccumulator {
    sku_code: String,
    product_name: String,
    picks: usize,
    total_volume: f64,
    cases_per_pallet: Option<u32>,
    items_per_case: Option<u32>,
}

/// Aggregate pick events within the lookback window into per-SKU metrics,
/// normalized to monthly rates.
pub fn calculate_sku_activity(
    events: &[PickEvent],
    lookback_days: i64,
    now: DateTime<Utc>,
) -> HashMap<String, ActivityMetrics> {
    let cutoff = now - Duration::days(lookback_days);

    let mut by_sku: HashMap<String, SkuAccumulator> = HashMap::new();
    for event in events {
        if event.picked_at < cutoff {
            continue;
        }
        let entry = by_sku
            .entry(event.sku_id.clone())
            .or_insert_with(|| SkuAccumulator {
                sku_code: event.sku_code.clone(),
                product_name: event.product_name.clone(),
                picks: 0,
                total_volume: 0.0,
                cases_per_pallet: None,
                items_per_case: None,
            });
        entry.picks += 1;
        entry.total_volume += event.quantity;
        if entry.cases_per_pallet.is_none() {
            entry.cases_per_pallet = event.cases_per_pallet;
        }
        if entry.items_per_case.is_none() {
            entry.items_per_case = event.items_per_case;
        }
    }

    let months_factor = lookback_days as f64 / 30.0;

    let metrics: HashMap<String, ActivityMetrics> = by_sku
        .into_iter()
        .map(|(sku_id, acc)| {
            let pick_frequency = acc.picks as f64 / months_factor;
            let total_pick_volume = acc.total_volume / months_factor;
            let average_pick_size = acc.total_volume / acc.picks as f64;
            let activity_score =
                pick_frequency * FREQUENCY_WEIGHT + total_pick_volume * VOLUME_WEIGHT;

            let metrics = ActivityMetrics {
                sku_id: sku_id.clone(),
                sku_code: acc.sku_code,
                product_name: acc.product_name,
                pick_frequency: round2(pick_frequency),
                total_pick_volume: round2(total_pick_volume),
                average_pick_size: round2(average_pick_size),
                cases_per_pallet: acc.cases_per_pallet.unwrap_or(DEFAULT_CASES_PER_PALLET),
                items_per_case: acc.items_per_case.unwrap_or(DEFAULT_ITEMS_PER_CASE),
                activity_score: round2(activity_score),
            };
            (sku_id, metrics)
        })
        .collect();

    log::debug!(
        "aggregated {} pick events into {} SKUs over {} days",
        events.len(),
        metrics.len(),
        lookback_days
    );
    metrics
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn pick(now: DateTime<Utc>, days_ago: i64, sku: &str, quantity: f64) -> PickEvent {
        PickEvent {
            sku_id: sku.to_string(),
            sku_code: format!("CODE-{}", sku),
            product_name: format!("Product {}", sku),
            quantity,
            picked_at: now - Duration::days(days_ago),
            cases_per_pallet: None,
            items_per_case: None,
        }
    }

    #[test]
    fn monthly_normalization_over_ninety_days() {
        let now = test_now();
        // 9 picks of 2 cases over 90 days: 3 picks/month, 6 cases/month.
        let events: Vec<PickEvent> = (0..9).map(|i| pick(now, i * 10, "ipa", 2.0)).collect();
        let metrics = calculate_sku_activity(&events, DEFAULT_LOOKBACK_DAYS, now);
        let ipa = &metrics["ipa"];
        assert_eq!(ipa.pick_frequency, 3.0);
        assert_eq!(ipa.total_pick_volume, 6.0);
        assert_eq!(ipa.average_pick_size, 2.0);
        // 3*3 + 6*1
        assert_eq!(ipa.activity_score, 15.0);
    }

    #[test]
    fn events_outside_lookback_are_ignored() {
        let now = test_now();
        let events = vec![pick(now, 10, "ipa", 1.0), pick(now, 120, "ipa", 50.0)];
        let metrics = calculate_sku_activity(&events, DEFAULT_LOOKBACK_DAYS, now);
        assert_eq!(metrics["ipa"].average_pick_size, 1.0);
    }

    #[test]
    fn dimension_defaults_apply_when_sku_has_none() {
        let now = test_now();
        let mut event = pick(now, 5, "ipa", 1.0);
        event.items_per_case = Some(24);
        let metrics = calculate_sku_activity(&[event], DEFAULT_LOOKBACK_DAYS, now);
        assert_eq!(metrics["ipa"].cases_per_pallet, DEFAULT_CASES_PER_PALLET);
        assert_eq!(metrics["ipa"].items_per_case, 24);
    }

    #[test]
    fn empty_history_yields_empty_map() {
        let metrics = calculate_sku_activity(&[], DEFAULT_LOOKBACK_DAYS, test_now());
        assert!(metrics.is_empty());
    }

    #[test]
    fn metrics_round_to_two_decimals() {
        let now = test_now();
        let events = vec![
            pick(now, 1, "ipa", 1.0),
            pick(now, 2, "ipa", 2.0),
            pick(now, 3, "ipa", 2.0),
        ];
        let metrics = calculate_sku_activity(&events, DEFAULT_LOOKBACK_DAYS, now);
        // 5 cases over 3 picks: 1.666... rounds to 1.67.
        assert_eq!(metrics["ipa"].average_pick_size, 1.67);
    }
}
