//! Review status calculation. Pure: no clock, no store, no globals.
//!
//! PRECEDENCE (fixed):
//!   1. Exempt items (no interval, no last review)  -> None
//!   2. Due instant already passed                   -> Overdue
//!   3. Inside the alert window (inclusive start)    -> Needed
//!   4. Otherwise                                    -> None
//!
//! Month arithmetic is calendar-based and clamps to the last day of
//! the target month: Jan 31 + 1 month = Feb 28 (Feb 29 in leap years).

use crate::{
    config::ReviewConfig,
    item::{ReviewStatus, ReviewableItem},
};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};

/// `date + months`, clamped to the end of the target month.
/// None only if the result leaves chrono's representable range.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Review-due date: last review date plus the review interval.
pub fn due_date(item: &ReviewableItem) -> Option<NaiveDate> {
    let last = item.last_review_date?;
    let months = item.interval_months()?;
    add_months_clamped(last, months)
}

pub fn compute(item: &ReviewableItem, config: &ReviewConfig, now: DateTime<Utc>) -> ReviewStatus {
    let Some(due) = due_date(item) else {
        return ReviewStatus::None;
    };
    let due_at = due.and_time(NaiveTime::default()).and_utc();

    if due_at < now {
        return ReviewStatus::Overdue;
    }

    // A window reaching past chrono's range opens at the beginning of time.
    let alert_at = Duration::try_days(config.alert_window_days.max(0))
        .and_then(|window| due_at.checked_sub_signed(window));
    match alert_at {
        Some(alert_at) if alert_at > now => ReviewStatus::None,
        _ => ReviewStatus::Needed,
    }
}
