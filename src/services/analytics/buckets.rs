//! Dense time bucketing and counting helpers.
//!
//! Trend series are emitted dense: a bucket exists for every day (or month)
//! inside the window even when its count is zero, so charts never skip quiet
//! days. Enum breakdowns likewise carry every variant, and top-N selection
//! breaks count ties by key so repeated runs over the same data agree.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use super::period::{at_midnight, DateRange};

/// Per-day counts covering every calendar day of `range`, oldest first.
/// Timestamps outside the range are ignored.
pub fn daily_counts(
    range: &DateRange,
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
) -> Vec<(NaiveDate, u64)> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut day = range.start.date_naive();
    let last = range.end.date_naive();
    while day <= last {
        counts.insert(day, 0);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    for ts in timestamps {
        if let Some(slot) = counts.get_mut(&ts.date_naive()) {
            *slot += 1;
        }
    }

    counts.into_iter().collect()
}

/// Per-month counts covering every calendar month touched by `range`,
/// oldest first, keyed by `(year, month)`.
pub fn monthly_counts(
    range: &DateRange,
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
) -> Vec<((i32, u32), u64)> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    let (mut year, mut month) = (range.start.year(), range.start.month());
    let (last_year, last_month) = (range.end.year(), range.end.month());
    while year < last_year || (year == last_year && month <= last_month) {
        counts.insert((year, month), 0);
        (year, month) = next_month(year, month);
    }

    for ts in timestamps {
        if let Some(slot) = counts.get_mut(&(ts.year(), ts.month())) {
            *slot += 1;
        }
    }

    counts.into_iter().collect()
}

/// Tally of `values` over every variant of `E`, in declaration order.
/// Variants that never occur are present with a zero count.
pub fn enum_counts<E>(values: impl IntoIterator<Item = E>) -> Vec<(E, u64)>
where
    E: IntoEnumIterator + PartialEq + Copy,
{
    let mut counts: Vec<(E, u64)> = E::iter().map(|variant| (variant, 0)).collect();
    for value in values {
        if let Some(slot) = counts.iter_mut().find(|(variant, _)| *variant == value) {
            slot.1 += 1;
        }
    }
    counts
}

/// Tally of arbitrary keys, ordered by key.
pub fn counts_by_key<K: Ord>(keys: impl IntoIterator<Item = K>) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// The `n` largest entries by count, descending; ties are broken by key
/// ascending so the selection is deterministic.
pub fn top_n<K: Ord>(mut entries: Vec<(K, u64)>, n: usize) -> Vec<(K, u64)> {
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Counts per hour of day (UTC), index 0 = midnight.
pub fn hour_histogram(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> [u64; 24] {
    let mut histogram = [0u64; 24];
    for ts in timestamps {
        histogram[ts.hour() as usize] += 1;
    }
    histogram
}

/// Counts per weekday, index 0 = Monday.
pub fn weekday_histogram(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> [u64; 7] {
    let mut histogram = [0u64; 7];
    for ts in timestamps {
        histogram[ts.weekday().num_days_from_monday() as usize] += 1;
    }
    histogram
}

/// Index of the largest slot, earliest on ties; `None` when all are zero.
pub fn peak_slot(histogram: &[u64]) -> Option<usize> {
    let (index, max) = histogram
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))?;
    if *max == 0 {
        return None;
    }
    Some(index)
}

/// The `n` calendar months ending with the month of `now`, oldest first.
pub fn trailing_months(now: DateTime<Utc>, n: usize) -> Vec<(i32, u32)> {
    let (mut year, mut month) = (now.year(), now.month());
    let mut months = Vec::with_capacity(n);
    for _ in 0..n {
        months.push((year, month));
        (year, month) = prev_month(year, month);
    }
    months.reverse();
    months
}

/// The `n` calendar quarters ending with the quarter of `now`, oldest first,
/// keyed by `(year, quarter)` with quarter in 1..=4.
pub fn trailing_quarters(now: DateTime<Utc>, n: usize) -> Vec<(i32, u32)> {
    let mut year = now.year();
    let mut quarter = (now.month() - 1) / 3 + 1;
    let mut quarters = Vec::with_capacity(n);
    for _ in 0..n {
        quarters.push((year, quarter));
        if quarter == 1 {
            year -= 1;
            quarter = 4;
        } else {
            quarter -= 1;
        }
    }
    quarters.reverse();
    quarters
}

/// Full extent of a calendar month as an inclusive range.
pub fn month_bounds(year: i32, month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = next_month(year, month);
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(DateRange {
        start: at_midnight(start),
        end: at_midnight(end) - Duration::seconds(1),
    })
}

/// Full extent of a calendar quarter as an inclusive range.
pub fn quarter_bounds(year: i32, quarter: u32) -> Option<DateRange> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let first_month = (quarter - 1) * 3 + 1;
    let start = month_bounds(year, first_month)?;
    let end = month_bounds(year, first_month + 2)?;
    Some(DateRange {
        start: start.start,
        end: end.end,
    })
}

/// Full month name such as `"January"`.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B").to_string())
        .unwrap_or_default()
}

/// Clock-hour window label such as `"2 PM - 3 PM"`.
pub fn hour_range_label(hour: usize) -> String {
    format!("{} - {}", hour_label(hour % 24), hour_label((hour + 1) % 24))
}

fn hour_label(hour: usize) -> String {
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let clock = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{clock} {meridiem}")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> DateRange {
        DateRange { start, end }
    }

    #[test]
    fn daily_counts_are_dense() {
        let window = range(at(2025, 3, 1, 0), at(2025, 3, 10, 23));
        let counts = daily_counts(
            &window,
            vec![at(2025, 3, 2, 9), at(2025, 3, 2, 17), at(2025, 3, 9, 12)],
        );

        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0].1, 0);
        assert_eq!(counts[1], (NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), 2));
        assert_eq!(counts[8].1, 1);
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<u64>(), 3);
    }

    #[test]
    fn daily_counts_ignore_out_of_range_timestamps() {
        let window = range(at(2025, 3, 1, 0), at(2025, 3, 3, 23));
        let counts = daily_counts(&window, vec![at(2025, 2, 28, 9), at(2025, 3, 4, 9)]);
        assert_eq!(counts.len(), 3);
        assert!(counts.iter().all(|(_, c)| *c == 0));
    }

    #[test]
    fn single_day_window_has_one_bucket() {
        let window = range(at(2025, 3, 7, 0), at(2025, 3, 7, 23));
        let counts = daily_counts(&window, vec![at(2025, 3, 7, 12)]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].1, 1);
    }

    #[test]
    fn monthly_counts_cross_year_boundaries() {
        let window = range(at(2024, 11, 15, 0), at(2025, 2, 10, 0));
        let counts = monthly_counts(&window, vec![at(2024, 12, 1, 8), at(2025, 2, 1, 8)]);

        let months: Vec<(i32, u32)> = counts.iter().map(|(m, _)| *m).collect();
        assert_eq!(months, vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]);
        assert_eq!(counts[1].1, 1);
        assert_eq!(counts[3].1, 1);
    }

    #[test]
    fn enum_counts_include_zero_variants() {
        let counts = enum_counts(vec![OrderStatus::New, OrderStatus::New, OrderStatus::Casting]);
        assert_eq!(counts.len(), 9);
        assert_eq!(counts[0], (OrderStatus::New, 2));
        assert!(counts.contains(&(OrderStatus::Delivered, 0)));
        assert!(counts.contains(&(OrderStatus::Casting, 1)));
    }

    #[test]
    fn top_n_breaks_ties_by_key() {
        let picked = top_n(vec![("b", 3), ("c", 5), ("a", 3), ("d", 1)], 3);
        assert_eq!(picked, vec![("c", 5), ("a", 3), ("b", 3)]);
    }

    #[test]
    fn histograms_count_slots() {
        let hours = hour_histogram(vec![at(2025, 3, 1, 14), at(2025, 3, 2, 14), at(2025, 3, 2, 9)]);
        assert_eq!(hours[14], 2);
        assert_eq!(hours[9], 1);

        // 2025-03-03 is a Monday
        let weekdays = weekday_histogram(vec![at(2025, 3, 3, 8), at(2025, 3, 8, 8)]);
        assert_eq!(weekdays[0], 1);
        assert_eq!(weekdays[5], 1);
    }

    #[test]
    fn peak_slot_prefers_earliest_on_ties() {
        assert_eq!(peak_slot(&[0, 4, 2, 4]), Some(1));
        assert_eq!(peak_slot(&[0, 0, 0]), None);
    }

    #[test]
    fn trailing_months_walk_back_across_years() {
        let months = trailing_months(at(2025, 2, 10, 0), 6);
        assert_eq!(
            months,
            vec![
                (2024, 9),
                (2024, 10),
                (2024, 11),
                (2024, 12),
                (2025, 1),
                (2025, 2)
            ]
        );
    }

    #[test]
    fn trailing_quarters_walk_back_across_years() {
        let quarters = trailing_quarters(at(2025, 2, 10, 0), 4);
        assert_eq!(quarters, vec![(2024, 2), (2024, 3), (2024, 4), (2025, 1)]);
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let feb = month_bounds(2024, 2).unwrap();
        assert_eq!(feb.start, at(2024, 2, 1, 0));
        assert_eq!(feb.end, Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
    }

    #[test]
    fn quarter_bounds_cover_three_months() {
        let q4 = quarter_bounds(2025, 4).unwrap();
        assert_eq!(q4.start, at(2025, 10, 1, 0));
        assert_eq!(q4.end, Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap());
        assert!(quarter_bounds(2025, 5).is_none());
    }

    #[test]
    fn hour_labels_use_twelve_hour_clock() {
        assert_eq!(hour_range_label(14), "2 PM - 3 PM");
        assert_eq!(hour_range_label(0), "12 AM - 1 AM");
        assert_eq!(hour_range_label(11), "11 AM - 12 PM");
        assert_eq!(hour_range_label(23), "11 PM - 12 AM");
    }

    #[test]
    fn month_label_is_full_name() {
        assert_eq!(month_label(2025, 1), "January");
        assert_eq!(month_label(2025, 12), "December");
    }
}
