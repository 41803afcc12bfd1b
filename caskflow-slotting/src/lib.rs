//! ABC warehouse slotting for beverage distribution.
//!
//! Ranks SKUs by pick activity over a lookback window, classifies them into
//! Pareto ABC bands, and turns class/location mismatches into prioritized
//! relocation recommendations. New SKUs with no history get a slot from
//! their demand forecast instead.

pub mod activity;
pub mod classify;
pub mod loader;
pub mod recommend;
pub mod source;
pub mod types;

pub use activity::{calculate_sku_activity, DEFAULT_LOOKBACK_DAYS};
pub use classify::{abc_summary, classify_skus_abc};
pub use recommend::{calculate_optimal_slot, generate_slotting_recommendations};
pub use types::{
    AbcClass, AbcSummary, ActivityMetrics, NewSkuForecast, PickEvent, Priority, SkuActivity,
    SlotPlan, SlottingRecommendation,
};
