//! Measurable lifecycle: the completion transition
//!
//! Governs what happens to a measurable's type, set date, due date, and
//! interval when it is marked complete:
//! - Countdown restarts anchored to the old due date, one interval out
//! - Seeking locks in the just-observed elapsed duration and promotes to
//!   Countdown (one-way, once)
//! - Tally restarts open-ended, no due date ever
//!
//! Pure computation; persistence happens in the completion orchestrator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Measurable, MeasurableType};
use crate::progress::{compute_progress, start_of_day};

// ---------------------------------------------------------------------------
/// Completion Transition: the next cycle's fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTransition {
    pub next_type: MeasurableType,
    pub next_set_date: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    /// Explicit cadence carries forward unchanged; a learned Seeking
    /// interval lives in the new due date instead
    pub next_interval_days: Option<i64>,
}

/// Compute the state a measurable moves to when completed at `now`.
///
/// An explicitly configured interval always beats the computed one, so a
/// user-chosen cadence is sticky across completions. The next cycle starts
/// at the old due date (or `now` if there was none), truncated to midnight,
/// which anchors successive cycles to a stable clock instead of drifting
/// from whenever the user happened to tap complete.
pub fn apply_completion(measurable: &Measurable, now: DateTime<Utc>) -> CompletionTransition {
    let progress = compute_progress(
        measurable.set_date,
        Some(measurable.due_date.unwrap_or(now)),
        now,
    );

    let effective_interval = measurable.interval_days.unwrap_or(progress.interval_days);

    let next_set_date = start_of_day(measurable.due_date.unwrap_or(now));

    let next_due_date = match measurable.measurable_type {
        MeasurableType::Countdown => {
            Some(start_of_day(next_set_date + Duration::days(effective_interval)))
        }
        MeasurableType::Seeking => {
            Some(start_of_day(next_set_date + Duration::days(progress.elapsed_days)))
        }
        MeasurableType::Tally => None,
    };

    let next_type = match measurable.measurable_type {
        MeasurableType::Seeking => MeasurableType::Countdown,
        other => other,
    };

    CompletionTransition {
        next_type,
        next_set_date,
        next_due_date,
        next_interval_days: measurable.interval_days,
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OnComplete;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn make_measurable(
        measurable_type: MeasurableType,
        set_date: DateTime<Utc>,
        due_date: Option<DateTime<Utc>>,
        interval_days: Option<i64>,
    ) -> Measurable {
        Measurable {
            id: 1,
            owner_id: 1,
            name: "morning run".to_string(),
            description: None,
            measurable_type,
            set_date,
            due_date,
            interval_days,
            on_complete: OnComplete::None,
            area_id: None,
            created_at: Some(utc(2024, 1, 1)),
            updated_at: Some(utc(2024, 1, 1)),
        }
    }

    #[test]
    fn test_seeking_promotes_to_countdown_with_learned_interval() {
        let m = make_measurable(MeasurableType::Seeking, utc(2024, 1, 1), None, None);

        let t = apply_completion(&m, utc(2024, 1, 15));

        assert_eq!(t.next_type, MeasurableType::Countdown);
        assert_eq!(t.next_set_date, utc(2024, 1, 15));
        // The just-elapsed 14 days becomes the new due date
        assert_eq!(t.next_due_date, Some(utc(2024, 1, 29)));
        assert_eq!(t.next_interval_days, None);
    }

    #[test]
    fn test_promotion_is_one_way() {
        let m = make_measurable(MeasurableType::Seeking, utc(2024, 1, 1), None, None);
        let first = apply_completion(&m, utc(2024, 1, 15));

        let promoted = Measurable {
            measurable_type: first.next_type,
            set_date: first.next_set_date,
            due_date: first.next_due_date,
            interval_days: first.next_interval_days,
            ..m
        };
        let second = apply_completion(&promoted, utc(2024, 1, 29));

        // A second completion keeps Countdown; there is no path back
        assert_eq!(second.next_type, MeasurableType::Countdown);
        assert!(second.next_due_date.is_some());
    }

    #[test]
    fn test_explicit_interval_is_sticky() {
        // Natural interval would be 10 days (Jan 1..=Jan 10), but the user
        // configured a 7-day cadence
        let m = make_measurable(
            MeasurableType::Countdown,
            utc(2024, 1, 1),
            Some(utc(2024, 1, 10)),
            Some(7),
        );

        let t = apply_completion(&m, utc(2024, 1, 10));

        assert_eq!(t.next_set_date, utc(2024, 1, 10));
        assert_eq!(t.next_due_date, Some(utc(2024, 1, 17)));
        assert_eq!(t.next_interval_days, Some(7));
    }

    #[test]
    fn test_countdown_without_explicit_interval_uses_computed() {
        let m = make_measurable(
            MeasurableType::Countdown,
            utc(2024, 1, 1),
            Some(utc(2024, 1, 10)),
            None,
        );

        let t = apply_completion(&m, utc(2024, 1, 10));

        // Inclusive interval of 10 days carries the cycle forward
        assert_eq!(t.next_set_date, utc(2024, 1, 10));
        assert_eq!(t.next_due_date, Some(utc(2024, 1, 20)));
    }

    #[test]
    fn test_next_cycle_anchors_to_due_date_not_now() {
        // Completed three days late: the next cycle still starts at the old
        // due date, so the schedule does not drift
        let m = make_measurable(
            MeasurableType::Countdown,
            utc(2024, 1, 1),
            Some(utc(2024, 1, 10)),
            Some(9),
        );

        let t = apply_completion(&m, utc(2024, 1, 13));

        assert_eq!(t.next_set_date, utc(2024, 1, 10));
        assert_eq!(t.next_due_date, Some(utc(2024, 1, 19)));
    }

    #[test]
    fn test_countdown_tolerates_missing_due_date() {
        // Defensive: a Countdown should always have a due date, but the
        // transition must not panic when it does not
        let m = make_measurable(MeasurableType::Countdown, utc(2024, 1, 1), None, Some(7));

        let t = apply_completion(&m, utc(2024, 1, 5));

        assert_eq!(t.next_set_date, utc(2024, 1, 5));
        assert_eq!(t.next_due_date, Some(utc(2024, 1, 12)));
    }

    #[test]
    fn test_tally_stays_open_ended() {
        let m = make_measurable(MeasurableType::Tally, utc(2024, 1, 1), None, None);

        let t = apply_completion(&m, utc(2024, 1, 20));

        assert_eq!(t.next_type, MeasurableType::Tally);
        assert_eq!(t.next_set_date, utc(2024, 1, 20));
        assert_eq!(t.next_due_date, None);
    }

    #[test]
    fn test_set_date_truncates_to_midnight() {
        let m = make_measurable(MeasurableType::Tally, utc(2024, 1, 1), None, None);
        let late_evening = Utc.with_ymd_and_hms(2024, 1, 20, 22, 15, 0).unwrap();

        let t = apply_completion(&m, late_evening);

        assert_eq!(t.next_set_date, utc(2024, 1, 20));
    }
}
