//! Deterministic progress math for measurables
//!
//! Computes elapsed days, inclusive interval, remaining days, percent
//! progress, and the overdue flag from a start date and an optional due
//! date. Every caller (API layer, lifecycle transition) goes through this
//! one module so the numbers cannot drift between surfaces.
//!
//! All arithmetic is calendar-day based: time of day is truncated before
//! any comparison, including the overdue flag.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
/// Measurable Progress: the computed snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurableProgress {
    /// Days from set date to effective due date, both endpoints included
    pub interval_days: i64,
    /// Whole calendar days since the set date
    pub elapsed_days: i64,
    /// Days left until the effective due date, today included
    pub days_remaining: i64,
    /// round(elapsed / interval * 100); never negative, above 100 when
    /// overdue (the UI renders the overflow as an overdue bar)
    pub progress_pct: i64,
    pub overdue: bool,
}

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// Truncate a timestamp to midnight UTC of its calendar day.
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Whole calendar days from `from` to `to`, ignoring time of day.
pub fn calendar_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.date_naive().signed_duration_since(from.date_naive()).num_days()
}

/// Dec 31 of `now`'s year: the soft horizon for open-ended measurables.
fn end_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    chrono::NaiveDate::from_ymd_opt(now.year(), 12, 31)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

// ---------------------------------------------------------------------------
// Progress computation
// ---------------------------------------------------------------------------

/// Compute the progress snapshot for a measurable.
///
/// `due_date` is optional: an open-ended measurable gets the end of the
/// current calendar year as its effective due date, so percent and
/// remaining days stay meaningful without a due date being set.
///
/// A degenerate interval (due date before set date) yields zero percent
/// rather than an error; the calculator never raises.
pub fn compute_progress(
    set_date: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> MeasurableProgress {
    let effective_due = due_date.unwrap_or_else(|| end_of_year(now));

    let elapsed_days = calendar_days_between(set_date, now);
    let interval_days = calendar_days_between(set_date, effective_due) + 1;
    let days_remaining = calendar_days_between(now, effective_due) + 1;

    // Guard against a zero or inverted interval
    let raw_pct = if interval_days <= 0 {
        0
    } else {
        ((elapsed_days as f64 / interval_days as f64) * 100.0).round() as i64
    };
    let progress_pct = raw_pct.max(0);

    let overdue = now.date_naive() > effective_due.date_naive();

    MeasurableProgress {
        interval_days,
        elapsed_days,
        days_remaining,
        progress_pct,
        overdue,
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
