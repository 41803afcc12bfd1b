//! Order health analytics for the CaskFlow sales dashboard and copilot.
//!
//! The core entry point is [`compute_order_health_metrics`]: a pure function
//! over a flat list of [`OrderRecord`]s that produces pace and revenue
//! classifications, ARPDD (average revenue per delivery day), and per-customer
//! cadence risk signals with a ranked hotlist. It never fails — missing or
//! malformed data degrades to "Awaiting data" / "Need more history" outputs so
//! the consuming dashboard always has something to render.
//!
//! Persistence stays outside this crate. Callers fetch order rows through the
//! [`source::OrderSource`] port (the production system pulls the most recent
//! 250 orders) and hand plain records to the analyzer.

pub mod cadence;
pub mod context;
pub mod loader;
pub mod money;
pub mod order_health;
pub mod source;
pub mod types;

mod arpdd;

pub use context::{attach_customer_names, build_follow_ups, period_snapshot, PeriodSnapshot};
pub use order_health::{compute_order_health_metrics, compute_order_health_metrics_at};
pub use types::{
    AccountSignal, AccountSignalSummary, AccountStanding, ArpddMetrics, OrderHealthMetrics,
    OrderRecord, OrderStatus,
};
