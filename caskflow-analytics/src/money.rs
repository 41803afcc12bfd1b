//! Currency display formatting.
//!
//! Summaries render whole currency units with comma thousands separators,
//! matching the dashboard's `$1,234` style. Unknown currency codes fall back
//! to a `"CODE 1,234"` rendering rather than failing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal amount as whole currency units, e.g. `$12,400`.
pub fn format_currency(currency: &str, value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);
    render(currency, rounded)
}

/// Format an already-converted float amount (ARPDD averages).
pub fn format_currency_f64(currency: &str, value: f64) -> String {
    render(currency, value.round() as i64)
}

fn render(currency: &str, whole: i64) -> String {
    let sign = if whole < 0 { "-" } else { "" };
    let grouped = group_thousands(whole.unsigned_abs());
    match symbol(currency) {
        Some(sym) => format!("{}{}{}", sign, sym, grouped),
        None => format!("{}{} {}", sign, currency, grouped),
    }
}

fn symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("\u{20ac}"),
        "GBP" => Some("\u{a3}"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        "MXN" => Some("MX$"),
        _ => None,
    }
}

/// Insert comma thousands separators into a whole number.
fn group_thousands(whole: u64) -> String {
    let s = whole.to_string();
    if whole < 1_000 {
        return s;
    }
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
