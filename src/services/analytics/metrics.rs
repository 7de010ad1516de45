//! Shared numeric primitives for the report assemblers.
//!
//! Every percentage, average and growth figure in the reports goes through
//! these helpers so that the zero-denominator rules are applied in exactly
//! one place: an empty total yields 0.0, a zero previous period yields +100%
//! growth when the current period has data and 0% when it does not.

use chrono::Duration;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Share of `part` in `total` as a percentage, rounded to two decimals.
/// A zero total is reported as 0.0, never an error.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Arithmetic mean rounded to two decimals; 0.0 for an empty slice.
pub fn safe_avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round2(values.iter().sum::<f64>() / values.len() as f64)
}

/// Relative change from `previous` to `current`, rounded to two decimals.
/// A zero baseline counts as +100.0 when the current period has any data.
pub fn change_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) / previous * 100.0)
}

/// Growth formatted for display: `"+100%"` against an empty baseline,
/// `"0%"` when both periods are empty, otherwise a signed one-decimal
/// percentage such as `"+12.5%"` or `"-3.2%"`.
pub fn growth_label(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        return if current > 0.0 { "+100%" } else { "0%" }.to_string();
    }
    let change = (current - previous) / previous * 100.0;
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{change:.1}%")
}

/// Monetary amount as a two-decimal JSON number.
pub fn currency(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or(0.0)
}

pub fn duration_days(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / SECONDS_PER_DAY
}

pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / SECONDS_PER_HOUR
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
