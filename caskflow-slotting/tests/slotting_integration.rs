use chrono::{DateTime, Duration, TimeZone, Utc};

use caskflow_slotting::loader::{load_locations, load_picks, CsvLocations, CsvPickHistory};
use caskflow_slotting::source::{LocationSource, PickHistorySource};
use caskflow_slotting::{
    abc_summary, calculate_optimal_slot, calculate_sku_activity, classify_skus_abc,
    generate_slotting_recommendations, AbcClass, NewSkuForecast, PickEvent, Priority,
    DEFAULT_LOOKBACK_DAYS,
};

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
        cases_per_pallet: Some(50),
        items_per_case: Some(12),
    }
}

/// A pick log with one clear runaway seller, a handful of steady movers,
/// and a tail of slow SKUs.
fn sample_picks(now: DateTime<Utc>) -> Vec<PickEvent> {
    let mut events = Vec::new();
    // Runaway: picked every other day.
    for i in 0..45 {
        events.push(pick(now, i * 2, "flagship-ipa", 3.0));
    }
    // Steady movers.
    for sku in ["amber-ale", "pilsner", "stout"] {
        for i in 0..12 {
            events.push(pick(now, i * 7, sku, 2.0));
        }
    }
    // Slow tail.
    for (i, sku) in ["barleywine", "kriek", "gose", "rauchbier", "sahti", "braggot"]
        .iter()
        .enumerate()
    {
        events.push(pick(now, 10 + i as i64, sku, 1.0));
    }
    events
}

#[test]
fn top_sku_is_always_a_and_bottom_is_c() {
    let now = test_now();
    let metrics = calculate_sku_activity(&sample_picks(now), DEFAULT_LOOKBACK_DAYS, now);
    let classified = classify_skus_abc(&metrics);

    assert_eq!(classified[0].metrics.sku_id, "flagship-ipa");
    assert_eq!(classified[0].abc_class, AbcClass::A);
    assert_eq!(classified.last().unwrap().abc_class, AbcClass::C);
}

#[test]
fn summary_reflects_activity_concentration() {
    let now = test_now();
    let metrics = calculate_sku_activity(&sample_picks(now), DEFAULT_LOOKBACK_DAYS, now);
    let classified = classify_skus_abc(&metrics);
    let summary = abc_summary(&classified);

    assert_eq!(summary.total_skus, 10);
    assert_eq!(
        summary.a_count + summary.b_count + summary.c_count,
        summary.total_skus
    );
    // The runaway seller concentrates most activity in the A band.
    assert!(summary.a_percent_activity > summary.c_percent_activity);
    let total =
        summary.a_percent_activity + summary.b_percent_activity + summary.c_percent_activity;
    assert!((total - 100.0).abs() < 0.1);
    assert_eq!(summary.top_a_items[0].metrics.sku_id, "flagship-ipa");
}

#[test]
fn classification_is_idempotent() {
    let now = test_now();
    let picks = sample_picks(now);
    let first = classify_skus_abc(&calculate_sku_activity(&picks, DEFAULT_LOOKBACK_DAYS, now));
    let second = classify_skus_abc(&calculate_sku_activity(&picks, DEFAULT_LOOKBACK_DAYS, now));
    assert_eq!(first, second);
}

#[test]
fn misplaced_flagship_generates_a_high_priority_move() {
    let now = test_now();
    let metrics = calculate_sku_activity(&sample_picks(now), DEFAULT_LOOKBACK_DAYS, now);
    let classified = classify_skus_abc(&metrics);

    let mut locations = std::collections::HashMap::new();
    locations.insert("flagship-ipa".to_string(), "A9-S1-B2".to_string());
    locations.insert("gose".to_string(), "A2-S3-B1".to_string());

    let recs = generate_slotting_recommendations(&classified, &locations);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].sku_id, "flagship-ipa");
    assert_eq!(recs[0].priority, Priority::High);
    assert_eq!(recs[0].recommended_aisle, "1-3");
    assert_eq!(recs[1].sku_id, "gose");
    assert_eq!(recs[1].priority, Priority::Low);
}

#[test]
fn optimal_slot_ignores_any_batch_context() {
    // The same forecast slots identically no matter what else is on the
    // floor: absolute thresholds only.
    let forecast = NewSkuForecast {
        predicted_picks_per_month: 4.5,
        cases_per_pallet: Some(80),
    };
    let plan = calculate_optimal_slot(&forecast);
    assert_eq!(plan.abc_class, AbcClass::B);
    assert_eq!(plan.recommended_aisle_range, "4-7");
    assert_eq!(
        plan.reason,
        "Predicted 4.5 picks/month suggests B classification"
    );
}

#[tokio::test]
async fn csv_ports_feed_the_classifier() {
    let picks_csv = "\
sku_id,sku_code,product_name,quantity,picked_at,cases_per_pallet,items_per_case
sku-1,IPA-16,Harbor IPA 16oz,4,2025-06-10,60,24
sku-1,IPA-16,Harbor IPA 16oz,2,2025-06-05,60,24
sku-2,STOUT-12,Dockside Stout 12oz,1,2025-06-01,,
";
    let locations_csv = "\
sku_id,location
sku-1,A8-S1-B1
";
    let now = test_now();
    let history = CsvPickHistory::from_events(load_picks(picks_csv.as_bytes()).unwrap());
    let locations = CsvLocations::from_map(load_locations(locations_csv.as_bytes()).unwrap());

    let cutoff = now - Duration::days(DEFAULT_LOOKBACK_DAYS);
    let events = history.picks_since(cutoff).await.unwrap();
    let classified = classify_skus_abc(&calculate_sku_activity(&events, DEFAULT_LOOKBACK_DAYS, now));

    let sku_ids: Vec<String> = classified
        .iter()
        .map(|sku| sku.metrics.sku_id.clone())
        .collect();
    let resolved = locations.locations_for(&sku_ids).await.unwrap();
    let recs = generate_slotting_recommendations(&classified, &resolved);

    // sku-1 is the batch's A item sitting in aisle 8.
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].sku_id, "sku-1");
    assert_eq!(recs[0].current_aisle, "A8");
}
