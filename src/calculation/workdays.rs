//! Workday counting.
//!
//! A workday is a Monday through Friday date. The number of workdays in a
//! period is the divisor for the daily salary.

use chrono::{Datelike, NaiveDate, Weekday};

/// Returns true for Saturdays and Sundays.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::is_weekend;
/// use chrono::NaiveDate;
///
/// // 2024-01-06 is a Saturday
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
/// // 2024-01-08 is a Monday
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts Monday to Friday dates in `[start, end]`, inclusive on both ends.
///
/// Returns zero when `start` is after `end`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::count_workdays;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
/// assert_eq!(count_workdays(start, end), 22);
/// ```
pub fn count_workdays(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let total_days = (end - start).num_days() + 1;
    let full_weeks = total_days / 7;
    let mut workdays = full_weeks * 5;

    // Walk the remaining partial week day by day.
    let mut day = start + chrono::Duration::days(full_weeks * 7);
    while day <= end {
        if !is_weekend(day) {
            workdays += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    workdays as u32
}
