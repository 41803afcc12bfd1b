//! Pareto ABC classification.
//!
//! SKUs rank by composite activity score within the batch; the top slice
//! earns A and the prime aisles nearest shipping. Classification is relative
//! to the batch, which is what keeps the A aisles from silting up as overall
//! volume drifts.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::activity::round1;
use crate::types::{AbcClass, AbcSummary, ActivityMetrics, SkuActivity};

/// SKUs at or above this percentile are A items.
pub const A_PERCENTILE: f64 = 80.0;
/// SKUs at or above this percentile (and below A) are B items.
pub const B_PERCENTILE: f64 = 50.0;
/// The summary lists at most this many top A items.
pub const TOP_A_LIMIT: usize = 10;

/// Aisle range and shelf preference for a class.
pub fn aisle_assignment(class: AbcClass) -> (&'static str, &'static str) {
    match class {
        // Fast pick lanes, closest to shipping. Waist height.
        AbcClass::A => ("1-3", "middle"),
        AbcClass::B => ("4-7", "middle"),
        // Back lanes may use top and bottom shelves.
        AbcClass::C => ("8+", "any"),
    }
}

/// Rank a batch of SKUs by activity score and assign ABC classes by
/// percentile. An empty batch classifies to an empty vec.
pub fn classify_skus_abc(metrics: &HashMap<String, ActivityMetrics>) -> Vec<SkuActivity> {
    let mut skus: Vec<&ActivityMetrics> = metrics.values().collect();
    // Score descending, sku id as tiebreak so equal scores rank stably.
    skus.sort_by(|a, b| {
        b.activity_score
            .partial_cmp(&a.activity_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.sku_id.cmp(&b.sku_id))
    });

    let count = skus.len();
    skus.iter()
        .enumerate()
        .map(|(index, sku)| {
            let percentile = ((count - index) as f64 / count as f64) * 100.0;
            let (abc_class, reason) = if percentile >= A_PERCENTILE {
                (
                    AbcClass::A,
                    format!(
                        "Top {:.0}% by activity ({:.1} picks/month)",
                        100.0 - A_PERCENTILE,
                        sku.pick_frequency
                    ),
                )
            } else if percentile >= B_PERCENTILE {
                (
                    AbcClass::B,
                    format!(
                        "Medium activity {:.0}-{:.0}th percentile ({:.1} picks/month)",
                        B_PERCENTILE, A_PERCENTILE, sku.pick_frequency
                    ),
                )
            } else {
                (
                    AbcClass::C,
                    format!(
                        "Low activity <{:.0}th percentile ({:.1} picks/month)",
                        B_PERCENTILE, sku.pick_frequency
                    ),
                )
            };
            let (aisles, _) = aisle_assignment(abc_class);

            SkuActivity {
                metrics: (*sku).clone(),
                abc_class,
                abc_percentile: round1(percentile),
                recommended_aisle_range: aisles.to_string(),
                reason,
            }
        })
        .collect()
}

/// Summarize one classification run: class counts, each class's share of
/// total activity, and the top A items.
pub fn abc_summary(classified: &[SkuActivity]) -> AbcSummary {
    let mut class_activity = [0.0_f64; 3];
    let mut class_counts = [0_usize; 3];
    let mut total_activity = 0.0;

    for sku in classified {
        let slot = match sku.abc_class {
            AbcClass::A => 0,
            AbcClass::B => 1,
            AbcClass::C => 2,
        };
        class_counts[slot] += 1;
        class_activity[slot] += sku.metrics.activity_score;
        total_activity += sku.metrics.activity_score;
    }

    let share = |activity: f64| {
        if total_activity > 0.0 {
            round1(activity / total_activity * 100.0)
        } else {
            0.0
        }
    };

    AbcSummary {
        total_skus: classified.len(),
        a_count: class_counts[0],
        b_count: class_counts[1],
        c_count: class_counts[2],
        a_percent_activity: share(class_activity[0]),
        b_percent_activity: share(class_activity[1]),
        c_percent_activity: share(class_activity[2]),
        top_a_items: classified
            .iter()
            .filter(|sku| sku.abc_class == AbcClass::A)
            .take(TOP_A_LIMIT)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sku: &str, score: f64, frequency: f64) -> ActivityMetrics {
        ActivityMetrics {
            sku_id: sku.to_string(),
            sku_code: format!("CODE-{}", sku),
            product_name: format!("Product {}", sku),
            pick_frequency: frequency,
            total_pick_volume: score - frequency * 3.0,
            average_pick_size: 1.0,
            cases_per_pallet: 50,
            items_per_case: 12,
            activity_score: score,
        }
    }

    fn batch(scores: &[(&str, f64)]) -> HashMap<String, ActivityMetrics> {
        scores
            .iter()
            .map(|(sku, score)| (sku.to_string(), metrics(sku, *score, score / 4.0)))
            .collect()
    }

    #[test]
    fn empty_batch_classifies_to_nothing() {
        assert!(classify_skus_abc(&HashMap::new()).is_empty());
    }

    #[test]
    fn single_sku_is_an_a_item() {
        let classified = classify_skus_abc(&batch(&[("only", 12.0)]));
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].abc_class, AbcClass::A);
        assert_eq!(classified[0].abc_percentile, 100.0);
        assert_eq!(classified[0].recommended_aisle_range, "1-3");
    }

    #[test]
    fn ten_sku_batch_splits_at_the_pareto_boundaries() {
        let scores: Vec<(String, f64)> = (0..10)
            .map(|i| (format!("sku-{}", i), 100.0 - i as f64 * 10.0))
            .collect();
        let refs: Vec<(&str, f64)> = scores.iter().map(|(s, v)| (s.as_str(), *v)).collect();
        let classified = classify_skus_abc(&batch(&refs));

        // Percentiles run 100, 90, 80, ... 10. The 80 boundary is still A
        // and the 50 boundary is still B.
        let count = |class| classified.iter().filter(|s| s.abc_class == class).count();
        assert_eq!(count(AbcClass::A), 3);
        assert_eq!(count(AbcClass::B), 3);
        assert_eq!(count(AbcClass::C), 4);
        assert_eq!(classified[0].metrics.sku_id, "sku-0");
        assert_eq!(classified[9].abc_percentile, 10.0);
        assert_eq!(classified[9].recommended_aisle_range, "8+");
    }

    #[test]
    fn reason_embeds_bracket_and_frequency() {
        let classified = classify_skus_abc(&batch(&[("hot", 40.0), ("mid", 20.0), ("cold", 4.0)]));
        assert_eq!(
            classified[0].reason,
            "Top 20% by activity (10.0 picks/month)"
        );
        assert_eq!(
            classified[1].reason,
            "Medium activity 50-80th percentile (5.0 picks/month)"
        );
        assert_eq!(
            classified[2].reason,
            "Low activity <50th percentile (1.0 picks/month)"
        );
    }

    #[test]
    fn equal_scores_break_ties_by_sku_id() {
        let classified = classify_skus_abc(&batch(&[("beta", 10.0), ("alpha", 10.0)]));
        assert_eq!(classified[0].metrics.sku_id, "alpha");
        assert_eq!(classified[1].metrics.sku_id, "beta");
    }

    #[test]
    fn summary_shares_sum_to_one_hundred() {
        let classified = classify_skus_abc(&batch(&[
            ("a", 80.0),
            ("b", 40.0),
            ("c", 20.0),
            ("d", 10.0),
            ("e", 5.0),
        ]));
        let summary = abc_summary(&classified);
        assert_eq!(summary.total_skus, 5);
        assert_eq!(
            summary.a_count + summary.b_count + summary.c_count,
            summary.total_skus
        );
        let total =
            summary.a_percent_activity + summary.b_percent_activity + summary.c_percent_activity;
        assert!((total - 100.0).abs() < 0.1, "shares summed to {}", total);
    }

    #[test]
    fn summary_of_empty_batch_is_all_zero() {
        let summary = abc_summary(&[]);
        assert_eq!(summary.total_skus, 0);
        assert_eq!(summary.a_percent_activity, 0.0);
        assert!(summary.top_a_items.is_empty());
    }

    #[test]
    fn top_a_items_cap_at_ten() {
        let scores: Vec<(String, f64)> = (0..100)
            .map(|i| (format!("sku-{:03}", i), 1000.0 - i as f64))
            .collect();
        let refs: Vec<(&str, f64)> = scores.iter().map(|(s, v)| (s.as_str(), *v)).collect();
        let classified = classify_skus_abc(&batch(&refs));
        let summary = abc_summary(&classified);
        assert_eq!(summary.a_count, 21); // percentiles 100 down to 80
        assert_eq!(summary.top_a_items.len(), TOP_A_LIMIT);
        assert_eq!(summary.top_a_items[0].metrics.sku_id, "sku-000");
    }
}
