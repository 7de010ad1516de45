//! Resolution of report time windows.
//!
//! Every analytics endpoint accepts the same three parameters: a named period
//! keyword (`today`, `week`, `month`, `quarter`, `year`), an explicit
//! `start_date`/`end_date` pair, or nothing. Resolution is pure: callers pass
//! the current instant, so a report for a fixed `now` is reproducible.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::errors::ServiceError;

/// Length of the fallback window when no usable period is supplied.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive UTC time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Number of calendar days touched by the range, endpoints inclusive.
    pub fn days_spanned(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days() + 1
    }

    /// Human label in the dashboard's `"Jul 01 - Jul 31, 2025"` form.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.end.format("%b %d, %Y")
        )
    }
}

/// A resolved window plus the filter that actually produced it, which is what
/// report metadata must echo back (an unknown keyword resolves to the default
/// window, and the metadata says so).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub range: DateRange,
    pub applied_filter: String,
}

/// Resolves the reporting window for `now`.
///
/// Precedence: a recognized keyword wins; otherwise an explicit date pair is
/// used; otherwise the trailing 30-day default. An unrecognized keyword is
/// logged and falls through rather than failing. Malformed or inverted
/// explicit dates are client errors.
///
/// Keyword semantics are calendar-aware: `month`, `quarter` and `year` start
/// on the first day of the current calendar month/quarter/year, `today` at
/// midnight of the current day. `week` is a rolling seven days.
pub fn resolve_period(
    period: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ResolvedPeriod, ServiceError> {
    if let Some(keyword) = period {
        if let Some(range) = keyword_range(keyword, now) {
            return Ok(ResolvedPeriod {
                range,
                applied_filter: format!("period:{keyword}"),
            });
        }
        warn!(keyword, "unknown period keyword, falling back");
    }

    if let (Some(start_raw), Some(end_raw)) = (start_date, end_date) {
        return explicit_range(start_raw, end_raw);
    }

    Ok(default_window(now))
}

/// The equal-length window immediately before `range`, ending one second
/// before it starts. Growth figures compare against this window.
pub fn previous_period(range: &DateRange) -> DateRange {
    let length = range.duration();
    let end = range.start - Duration::seconds(1);
    DateRange {
        start: end - length,
        end,
    }
}

fn keyword_range(keyword: &str, now: DateTime<Utc>) -> Option<DateRange> {
    let today = now.date_naive();
    let start = match keyword {
        "today" => at_midnight(today),
        "week" => now - Duration::days(7),
        "month" => at_midnight(month_start(today)),
        "quarter" => at_midnight(quarter_start(today)),
        "year" => at_midnight(year_start(today)),
        _ => return None,
    };
    Some(DateRange { start, end: now })
}

fn explicit_range(start_raw: &str, end_raw: &str) -> Result<ResolvedPeriod, ServiceError> {
    let start = parse_date(start_raw, "start_date")?;
    let end = parse_date(end_raw, "end_date")?;

    if start > end {
        return Err(ServiceError::InvalidRange(format!(
            "start_date {start} is after end_date {end}"
        )));
    }

    Ok(ResolvedPeriod {
        range: DateRange {
            start: at_midnight(start),
            end: at_end_of_day(end),
        },
        applied_filter: format!("range:{start}..{end}"),
    })
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        ServiceError::InvalidRange(format!("{field} '{raw}' is not a valid YYYY-MM-DD date"))
    })
}

fn default_window(now: DateTime<Utc>) -> ResolvedPeriod {
    ResolvedPeriod {
        range: DateRange {
            start: now - Duration::days(DEFAULT_WINDOW_DAYS),
            end: now,
        },
        applied_filter: format!("default:{DEFAULT_WINDOW_DAYS}d"),
    }
}

pub(crate) fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub(crate) fn at_end_of_day(date: NaiveDate) -> DateTime<Utc> {
    at_midnight(date) + Duration::seconds(86_399)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let quarter_month = ((date.month() - 1) / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), quarter_month, 1).unwrap_or(date)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn resolve(period: Option<&str>, now: DateTime<Utc>) -> ResolvedPeriod {
        resolve_period(period, None, None, now).unwrap()
    }

    #[test]
    fn today_starts_at_midnight() {
        let now = at(2025, 8, 15, 14, 30, 0);
        let resolved = resolve(Some("today"), now);
        assert_eq!(resolved.range.start, at(2025, 8, 15, 0, 0, 0));
        assert_eq!(resolved.range.end, now);
        assert_eq!(resolved.applied_filter, "period:today");
    }

    #[test]
    fn week_is_a_rolling_seven_days() {
        let now = at(2025, 8, 15, 14, 30, 0);
        let resolved = resolve(Some("week"), now);
        assert_eq!(resolved.range.start, at(2025, 8, 8, 14, 30, 0));
        assert_eq!(resolved.range.end, now);
    }

    #[test]
    fn month_starts_on_the_first() {
        let now = at(2025, 8, 15, 14, 30, 0);
        let resolved = resolve(Some("month"), now);
        assert_eq!(resolved.range.start, at(2025, 8, 1, 0, 0, 0));
    }

    #[test]
    fn quarter_starts_on_calendar_quarter_boundary() {
        assert_eq!(
            resolve(Some("quarter"), at(2025, 8, 15, 10, 0, 0)).range.start,
            at(2025, 7, 1, 0, 0, 0)
        );
        assert_eq!(
            resolve(Some("quarter"), at(2025, 2, 10, 10, 0, 0)).range.start,
            at(2025, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            resolve(Some("quarter"), at(2025, 12, 31, 10, 0, 0)).range.start,
            at(2025, 10, 1, 0, 0, 0)
        );
    }

    #[test]
    fn year_starts_january_first() {
        let resolved = resolve(Some("year"), at(2025, 8, 15, 10, 0, 0));
        assert_eq!(resolved.range.start, at(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn unknown_keyword_falls_back_to_default_window() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved = resolve(Some("fortnight"), now);
        assert_eq!(resolved.range.start, now - Duration::days(30));
        assert_eq!(resolved.range.end, now);
        assert_eq!(resolved.applied_filter, "default:30d");
    }

    #[test]
    fn missing_parameters_use_default_window() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved = resolve(None, now);
        assert_eq!(resolved.range.duration(), Duration::days(30));
        assert_eq!(resolved.applied_filter, "default:30d");
    }

    #[test]
    fn explicit_dates_cover_whole_days() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved =
            resolve_period(None, Some("2025-03-01"), Some("2025-03-10"), now).unwrap();
        assert_eq!(resolved.range.start, at(2025, 3, 1, 0, 0, 0));
        assert_eq!(resolved.range.end, at(2025, 3, 10, 23, 59, 59));
        assert_eq!(resolved.applied_filter, "range:2025-03-01..2025-03-10");
    }

    #[test]
    fn single_day_range_is_allowed() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved =
            resolve_period(None, Some("2025-03-07"), Some("2025-03-07"), now).unwrap();
        assert_eq!(resolved.range.days_spanned(), 1);
        assert_eq!(resolved.range.start, at(2025, 3, 7, 0, 0, 0));
        assert_eq!(resolved.range.end, at(2025, 3, 7, 23, 59, 59));
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let err = resolve_period(None, Some("2025-03-10"), Some("2025-03-01"), now).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRange(_)));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let now = at(2025, 8, 15, 10, 0, 0);
        for (start, end) in [
            ("March 1", "2025-03-10"),
            ("2025-03-01", "10/03/2025"),
            ("2025-13-01", "2025-03-10"),
            ("", "2025-03-10"),
        ] {
            let err = resolve_period(None, Some(start), Some(end), now).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidRange(_)), "{start}..{end}");
        }
    }

    #[test]
    fn recognized_keyword_wins_over_explicit_dates() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved =
            resolve_period(Some("today"), Some("2025-03-01"), Some("2025-03-10"), now).unwrap();
        assert_eq!(resolved.applied_filter, "period:today");
        assert_eq!(resolved.range.start, at(2025, 8, 15, 0, 0, 0));
    }

    #[test]
    fn unknown_keyword_falls_through_to_explicit_dates() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved =
            resolve_period(Some("banana"), Some("2025-03-01"), Some("2025-03-10"), now).unwrap();
        assert_eq!(resolved.applied_filter, "range:2025-03-01..2025-03-10");
    }

    #[test]
    fn lone_date_parameter_is_ignored() {
        let now = at(2025, 8, 15, 10, 0, 0);
        let resolved = resolve_period(None, Some("2025-03-01"), None, now).unwrap();
        assert_eq!(resolved.applied_filter, "default:30d");
    }

    #[test]
    fn previous_period_has_equal_length_and_abuts_current() {
        let current = DateRange {
            start: at(2025, 3, 1, 0, 0, 0),
            end: at(2025, 3, 10, 23, 59, 59),
        };
        let previous = previous_period(&current);
        assert_eq!(previous.end, at(2025, 2, 28, 23, 59, 59));
        assert_eq!(previous.duration(), current.duration());
        assert!(previous.end < current.start);
    }

    #[test]
    fn days_spanned_counts_inclusive_days() {
        let range = DateRange {
            start: at(2025, 3, 1, 0, 0, 0),
            end: at(2025, 3, 10, 23, 59, 59),
        };
        assert_eq!(range.days_spanned(), 10);
    }

    #[test]
    fn label_formats_like_the_dashboard() {
        let range = DateRange {
            start: at(2025, 7, 1, 0, 0, 0),
            end: at(2025, 7, 31, 23, 59, 59),
        };
        assert_eq!(range.label(), "Jul 01 - Jul 31, 2025");
    }
}
