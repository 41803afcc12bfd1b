//! Pick-event inputs and classification outputs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One pick-sheet line, flattened with its SKU attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct PickEvent {
    pub sku_id: String,
    pub sku_code: String,
    pub product_name: String,
    /// Cases picked on this line.
    pub quantity: f64,
    pub picked_at: DateTime<Utc>,
    pub cases_per_pallet: Option<u32>,
    pub items_per_case: Option<u32>,
}

/// ABC class, Pareto-style: A items are the top slice by activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

/// Per-SKU activity metrics before classification. All derived numbers are
/// rounded to two decimal places at aggregation time.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    pub sku_id: String,
    pub sku_code: String,
    pub product_name: String,
    /// Picks per month.
    pub pick_frequency: f64,
    /// Cases picked per month.
    pub total_pick_volume: f64,
    /// Average cases per pick.
    pub average_pick_size: f64,
    pub cases_per_pallet: u32,
    pub items_per_case: u32,
    /// Composite ranking score.
    pub activity_score: f64,
}

/// A classified SKU: activity metrics plus ABC assignment.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuActivity {
    #[serde(flatten)]
    pub metrics: ActivityMetrics,
    pub abc_class: AbcClass,
    /// Percentile rank within the classified batch, one decimal place.
    pub abc_percentile: f64,
    pub recommended_aisle_range: String,
    pub reason: String,
}

/// Overview statistics for one classification run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbcSummary {
    pub total_skus: usize,
    pub a_count: usize,
    pub b_count: usize,
    pub c_count: usize,
    /// Share of total activity score held by each class, one decimal place.
    pub a_percent_activity: f64,
    pub b_percent_activity: f64,
    pub c_percent_activity: f64,
    /// The ten highest-activity A items.
    pub top_a_items: Vec<SkuActivity>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub(crate) fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// One actionable move for the warehouse manager.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlottingRecommendation {
    pub sku_id: String,
    pub sku_code: String,
    pub product_name: String,
    pub current_aisle: String,
    pub recommended_aisle: String,
    pub abc_class: AbcClass,
    pub priority: Priority,
    pub reason: String,
    /// Human-readable, e.g. "2 min/day".
    pub estimated_time_savings: String,
}

/// Placement plan for a SKU with no pick history yet.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPlan {
    pub recommended_aisle_range: String,
    pub abc_class: AbcClass,
    pub shelf_preference: String,
    pub reason: String,
}

/// Demand forecast for a SKU that has not shipped yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSkuForecast {
    pub predicted_picks_per_month: f64,
    pub cases_per_pallet: Option<u32>,
}
