//! Relocation recommendations and new-SKU slotting.
//!
//! Compares each classified SKU's current aisle against its recommended
//! range and estimates the daily walking time a move would save. SKUs with
//! no location on file, or a location that does not follow the `A<aisle>`
//! convention, are skipped rather than reported as errors.

use std::collections::HashMap;

use crate::classify::aisle_assignment;
use crate::types::{
    AbcClass, NewSkuForecast, Priority, SkuActivity, SlotPlan, SlottingRecommendation,
};

/// Feet of travel per aisle number under the `A<aisle>` layout.
pub const FEET_PER_AISLE: f64 = 10.0;
/// Average walking speed on the pick floor, feet per minute.
pub const WALK_FEET_PER_MINUTE: f64 = 200.0;
/// Predicted picks/month at or above which a new SKU slots as A.
pub const NEW_SKU_A_PICKS: f64 = 10.0;
/// Predicted picks/month at or above which a new SKU slots as B.
pub const NEW_SKU_B_PICKS: f64 = 3.0;

/// Parse the aisle number from a location like "A4-S2-B1".
fn parse_aisle(location: &str) -> Option<u32> {
    let digits: String = location
        .strip_prefix('A')?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn is_misplaced(class: AbcClass, aisle: u32) -> bool {
    match class {
        AbcClass::A => aisle > 3,
        AbcClass::B => !(4..=7).contains(&aisle),
        AbcClass::C => aisle < 8,
    }
}

/// Representative travel distance for each class's target zone, in feet.
fn target_distance(class: AbcClass) -> f64 {
    match class {
        AbcClass::A => 20.0,
        AbcClass::B => 50.0,
        AbcClass::C => 80.0,
    }
}

/// Find classified SKUs sitting in the wrong zone and turn each into a move
/// recommendation. Output is ordered by priority, discovery order within a
/// priority.
pub fn generate_slotting_recommendations(
    classified: &[SkuActivity],
    locations: &HashMap<String, String>,
) -> Vec<SlottingRecommendation> {
    let mut recommendations = Vec::new();

    for sku in classified {
        let Some(location) = locations.get(&sku.metrics.sku_id) else {
            continue;
        };
        let Some(aisle) = parse_aisle(location) else {
            continue;
        };
        if !is_misplaced(sku.abc_class, aisle) {
            continue;
        }

        let current_distance = aisle as f64 * FEET_PER_AISLE;
        let distance_saved = (current_distance - target_distance(sku.abc_class)).abs();
        let minutes_per_pick = distance_saved / WALK_FEET_PER_MINUTE;
        let minutes_per_day = minutes_per_pick * (sku.metrics.pick_frequency / 30.0);

        let priority = match sku.abc_class {
            AbcClass::A => Priority::High,
            AbcClass::B => Priority::Medium,
            AbcClass::C => Priority::Low,
        };
        let zone = if sku.abc_class == AbcClass::A {
            "slow"
        } else {
            "sub-optimal"
        };

        recommendations.push(SlottingRecommendation {
            sku_id: sku.metrics.sku_id.clone(),
            sku_code: sku.metrics.sku_code.clone(),
            product_name: sku.metrics.product_name.clone(),
            current_aisle: format!("A{}", aisle),
            recommended_aisle: sku.recommended_aisle_range.clone(),
            abc_class: sku.abc_class,
            priority,
            reason: format!(
                "{} item currently in {} zone. {}",
                sku.abc_class, zone, sku.reason
            ),
            estimated_time_savings: if minutes_per_day > 1.0 {
                format!("{:.0} min/day", minutes_per_day)
            } else {
                format!("{:.0} sec/day", minutes_per_day * 60.0)
            },
        });
    }

    // Stable: preserves classification order within each priority band.
    recommendations.sort_by_key(|rec| rec.priority.rank());
    recommendations
}

/// Slot a SKU with no pick history from its demand forecast.
///
/// Absolute picks/month thresholds, not batch percentiles: a forecast has no
/// batch to rank against.
pub fn calculate_optimal_slot(forecast: &NewSkuForecast) -> SlotPlan {
    let abc_class = if forecast.predicted_picks_per_month >= NEW_SKU_A_PICKS {
        AbcClass::A
    } else if forecast.predicted_picks_per_month >= NEW_SKU_B_PICKS {
        AbcClass::B
    } else {
        AbcClass::C
    };
    let (aisles, shelf) = aisle_assignment(abc_class);

    SlotPlan {
        recommended_aisle_range: aisles.to_string(),
        abc_class,
        shelf_preference: shelf.to_string(),
        reason: format!(
            "Predicted {:.1} picks/month suggests {} classification",
            forecast.predicted_picks_per_month, abc_class
        ),
    }
}
