use std::env;
use std::process;
use std::time::Instant;

use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use caskflow_analytics::loader::CsvOrderBook;
use caskflow_analytics::money::{format_currency, format_currency_f64};
use caskflow_analytics::source::{CustomerDirectory, OrderSource, RECENT_ORDER_LIMIT};
use caskflow_analytics::{
    attach_customer_names, build_follow_ups, compute_order_health_metrics, period_snapshot,
    AccountStanding, OrderHealthMetrics, PeriodSnapshot,
};
use caskflow_slotting::loader::{CsvLocations, CsvPickHistory};
use caskflow_slotting::source::{LocationSource, PickHistorySource};
use caskflow_slotting::{
    abc_summary, calculate_sku_activity, classify_skus_abc, generate_slotting_recommendations,
    AbcSummary, Priority, SkuActivity, SlottingRecommendation, DEFAULT_LOOKBACK_DAYS,
};

// ---------------------------------------------------------------------------
// JSON output contracts
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthReportJson {
    generated_at: String,
    source_file: String,
    orders_analyzed: usize,
    compute_ms: u128,
    metrics: OrderHealthMetrics,
    snapshot: SnapshotJson,
    follow_ups: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotJson {
    weekly_revenue: f64,
    weekly_orders: usize,
    monthly_revenue: f64,
    monthly_orders: usize,
    currency: String,
}

impl SnapshotJson {
    fn from_snapshot(snapshot: &PeriodSnapshot) -> Self {
        Self {
            weekly_revenue: snapshot.weekly_revenue.to_f64().unwrap_or(0.0),
            weekly_orders: snapshot.weekly_orders,
            monthly_revenue: snapshot.monthly_revenue.to_f64().unwrap_or(0.0),
            monthly_orders: snapshot.monthly_orders,
            currency: snapshot.currency.clone(),
        }
    }
}

#[derive(Serialize)]
struct SlottingReportJson {
    generated_at: String,
    source_file: String,
    lookback_days: i64,
    compute_ms: u128,
    summary: AbcSummary,
    skus: Vec<SkuActivity>,
    recommendations: Vec<SlottingRecommendation>,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_banner(title: &str) {
    let width = 62;
    let bar = "\u{2550}".repeat(width);
    println!();
    println!("  \u{2554}{}\u{2557}", bar);
    println!("  \u{2551}{:^width$}\u{2551}", title, width = width);
    println!("  \u{255a}{}\u{255d}", bar);
    println!();
}

fn print_health_human(
    metrics: &OrderHealthMetrics,
    snapshot: &PeriodSnapshot,
    follow_ups: &[String],
    orders_analyzed: usize,
    load_ms: u128,
    compute_ms: u128,
) {
    print_banner("CASKFLOW \u{2014} Order Health Report");

    let signals = &metrics.account_signals;
    println!(
        "  {} orders analyzed  \u{00b7}  {} customers tracked  \u{00b7}  {} on the hotlist",
        orders_analyzed,
        signals.tracked,
        signals.hotlist.len()
    );
    println!(
        "  Trailing 7d: {} across {} orders  \u{00b7}  30d: {} across {} orders",
        format_currency(&snapshot.currency, snapshot.weekly_revenue),
        snapshot.weekly_orders,
        format_currency(&snapshot.currency, snapshot.monthly_revenue),
        snapshot.monthly_orders
    );
    println!();

    println!("  Pace     {:16} {}", metrics.pace_label, metrics.pace_summary);
    println!(
        "  Revenue  {:16} {}",
        metrics.revenue_status, metrics.revenue_summary
    );
    println!(
        "  ARPDD    {:16} {}",
        metrics.arpdd.status, metrics.arpdd.summary
    );
    if let Some(change) = metrics.arpdd.change_percent {
        let previous = metrics.arpdd.previous_value.unwrap_or(0.0);
        println!(
            "           vs {} / day last month ({:+.0}%)",
            format_currency_f64(&metrics.arpdd.currency, previous),
            change * 100.0
        );
    }
    println!();

    if signals.hotlist.is_empty() {
        println!("  No accounts need a call today. All clear!");
    } else {
        println!("  {:\u{2500}<64}", "");
        for (i, signal) in signals.hotlist.iter().enumerate() {
            let marker = match signal.status {
                AccountStanding::AtRisk => "!!",
                AccountStanding::DueSoon => "! ",
            };
            let label = signal.name.as_deref().unwrap_or(&signal.customer_id);
            println!(
                "  {} {}. {:28} last order {:>3}d ago  \u{00b7}  pace {}d  \u{00b7}  {}d late",
                marker,
                i + 1,
                label,
                signal.days_since_last_order,
                signal.average_pace,
                signal.lateness
            );
        }
        println!("  {:\u{2500}<64}", "");
    }
    println!();

    if !metrics.suggestions.is_empty() {
        println!("  Suggested next steps:");
        for suggestion in &metrics.suggestions {
            println!("    \u{2022} {}", suggestion);
        }
        println!();
    }

    if !follow_ups.is_empty() {
        println!("  Ask the copilot:");
        for follow_up in follow_ups {
            println!("    \u{2022} {}", follow_up);
        }
        println!();
    }

    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Analysis ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        compute_ms,
        load_ms + compute_ms
    );
    println!();
}

fn print_slotting_human(
    summary: &AbcSummary,
    recommendations: &[SlottingRecommendation],
    lookback_days: i64,
    load_ms: u128,
    compute_ms: u128,
) {
    print_banner("CASKFLOW \u{2014} ABC Slotting Summary");

    println!(
        "  {} SKUs classified over {} days of pick history",
        summary.total_skus, lookback_days
    );
    println!(
        "  A: {} SKUs ({:.1}% of activity)  \u{00b7}  B: {} ({:.1}%)  \u{00b7}  C: {} ({:.1}%)",
        summary.a_count,
        summary.a_percent_activity,
        summary.b_count,
        summary.b_percent_activity,
        summary.c_count,
        summary.c_percent_activity
    );
    println!();

    if !summary.top_a_items.is_empty() {
        println!("  Top A items:");
        for (i, sku) in summary.top_a_items.iter().enumerate() {
            println!(
                "    {}. {:12} {:28} {:>6.1} picks/mo  score {:.1}",
                i + 1,
                sku.metrics.sku_code,
                sku.metrics.product_name,
                sku.metrics.pick_frequency,
                sku.metrics.activity_score
            );
        }
        println!();
    }

    if recommendations.is_empty() {
        println!("  No relocation moves recommended.");
    } else {
        println!("  {:\u{2500}<64}", "");
        for (i, rec) in recommendations.iter().enumerate() {
            let marker = match rec.priority {
                Priority::High => "!!",
                Priority::Medium => "! ",
                Priority::Low => "  ",
            };
            println!(
                "  {} {}. {:12} {:4} \u{2192} aisles {:4} saves {}",
                marker,
                i + 1,
                rec.sku_code,
                rec.current_aisle,
                rec.recommended_aisle,
                rec.estimated_time_savings
            );
            println!("       {}", rec.reason);
        }
        println!("  {:\u{2500}<64}", "");
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Analysis ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        compute_ms,
        load_ms + compute_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

async fn run_health(args: &[String]) {
    if args.is_empty() {
        usage();
    }
    let csv_path = &args[0];

    let mut limit = RECENT_ORDER_LIMIT;
    let mut json_output = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if i + 1 < args.len() {
                    limit = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --limit requires a positive integer");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --limit requires a number");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    let load_start = Instant::now();
    let book = match CsvOrderBook::open(csv_path) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    log::debug!("loaded {} order rows from {}", book.len(), csv_path);

    let compute_start = Instant::now();
    let orders = match book.recent_orders(limit).await {
        Ok(orders) => orders,
        Err(e) => {
            eprintln!("Error fetching orders: {}", e);
            process::exit(1);
        }
    };

    let now = Utc::now();
    let mut metrics = compute_order_health_metrics(&orders);
    let snapshot = period_snapshot(&orders, now);

    let hotlist_ids: Vec<String> = metrics
        .account_signals
        .hotlist
        .iter()
        .map(|signal| signal.customer_id.clone())
        .collect();
    let names = match book.names_for(&hotlist_ids).await {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error resolving customer names: {}", e);
            process::exit(1);
        }
    };
    metrics.account_signals.hotlist =
        attach_customer_names(&metrics.account_signals.hotlist, &names);
    let follow_ups = build_follow_ups(&metrics.account_signals.hotlist);
    let compute_ms = compute_start.elapsed().as_millis();

    if json_output {
        let report = HealthReportJson {
            generated_at: now.to_rfc3339(),
            source_file: csv_path.clone(),
            orders_analyzed: orders.len(),
            compute_ms,
            snapshot: SnapshotJson::from_snapshot(&snapshot),
            follow_ups,
            metrics,
        };
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print_health_human(
            &metrics,
            &snapshot,
            &follow_ups,
            orders.len(),
            load_ms,
            compute_ms,
        );
    }
}

async fn run_slotting(args: &[String]) {
    if args.is_empty() {
        usage();
    }
    let picks_path = &args[0];

    let mut locations_path: Option<String> = None;
    let mut lookback_days = DEFAULT_LOOKBACK_DAYS;
    let mut json_output = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--locations" => {
                if i + 1 < args.len() {
                    locations_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --locations requires a file path");
                    process::exit(1);
                }
            }
            "--lookback" => {
                if i + 1 < args.len() {
                    lookback_days = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --lookback requires a positive number of days");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --lookback requires a number");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    let load_start = Instant::now();
    let (history, locations) = tokio::join!(
        async { CsvPickHistory::open(picks_path) },
        async {
            match &locations_path {
                Some(path) => CsvLocations::open(path).map(Some),
                None => Ok(None),
            }
        }
    );
    let history = match history {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Error loading pick CSV: {}", e);
            process::exit(1);
        }
    };
    let locations = match locations {
        Ok(locations) => locations,
        Err(e) => {
            eprintln!("Error loading locations CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    log::debug!("loaded {} pick rows from {}", history.len(), picks_path);

    let compute_start = Instant::now();
    let now = Utc::now();
    let cutoff = now - Duration::days(lookback_days);
    let events = match history.picks_since(cutoff).await {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error fetching pick history: {}", e);
            process::exit(1);
        }
    };

    let metrics = calculate_sku_activity(&events, lookback_days, now);
    let classified = classify_skus_abc(&metrics);
    let summary = abc_summary(&classified);

    let recommendations = match &locations {
        Some(source) => {
            let sku_ids: Vec<String> = classified
                .iter()
                .map(|sku| sku.metrics.sku_id.clone())
                .collect();
            let resolved = match source.locations_for(&sku_ids).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    eprintln!("Error resolving SKU locations: {}", e);
                    process::exit(1);
                }
            };
            generate_slotting_recommendations(&classified, &resolved)
        }
        None => Vec::new(),
    };
    let compute_ms = compute_start.elapsed().as_millis();

    if json_output {
        let report = SlottingReportJson {
            generated_at: now.to_rfc3339(),
            source_file: picks_path.clone(),
            lookback_days,
            compute_ms,
            summary,
            skus: classified,
            recommendations,
        };
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print_slotting_human(&summary, &recommendations, lookback_days, load_ms, compute_ms);
    }
}

fn usage() -> ! {
    eprintln!("Usage: caskflow-server <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  health <orders.csv> [--limit N] [--json]");
    eprintln!("      Order pace, revenue, ARPDD, and cadence risk report");
    eprintln!("  slotting <picks.csv> [--locations <csv>] [--lookback N] [--json]");
    eprintln!("      ABC classification of pick activity with move recommendations");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --limit      Most recent orders to analyze (default: 250)");
    eprintln!("  --locations  SKU location CSV for relocation recommendations");
    eprintln!("  --lookback   Days of pick history to analyze (default: 90)");
    eprintln!("  --json       Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  caskflow-server health fixtures/sample_orders.csv");
    eprintln!("  caskflow-server health fixtures/sample_orders.csv --json");
    eprintln!("  caskflow-server slotting fixtures/sample_picks.csv --locations fixtures/sample_locations.csv");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    match args[1].as_str() {
        "health" => run_health(&args[2..]).await,
        "slotting" => run_slotting(&args[2..]).await,
        other => {
            eprintln!("Unknown command: {}", other);
            usage();
        }
    }
}
