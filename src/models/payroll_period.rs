//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] type, the administrative date
//! range over which payroll is computed once, and [`NewPayrollPeriod`] used to
//! create one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Represents a payroll period with its date range and processing state.
///
/// A period starts unprocessed. Once a payroll run completes it is marked
/// processed, which is terminal: the period and every date inside it become
/// immutable for activity records.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod {
///     id: 1,
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     is_processed: false,
///     processed_at: None,
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// assert!(!period.locks_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier for the period.
    pub id: u64,
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Whether a payroll run has completed for this period.
    pub is_processed: bool,
    /// When the period was marked processed.
    pub processed_at: Option<DateTime<Utc>>,
}

impl PayrollPeriod {
    /// Checks if a given date falls within this period (inclusive on both ends).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if this period is processed and covers the date.
    pub fn locks_date(&self, date: NaiveDate) -> bool {
        self.is_processed && self.contains_date(date)
    }
}

/// The administrative input for creating or editing a period's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayrollPeriod {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl NewPayrollPeriod {
    /// Creates a new period range.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Rejects ranges whose end precedes their start.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_range(self.start_date, self.end_date)
    }
}

pub(crate) fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> PayrollResult<()> {
    if start_date > end_date {
        return Err(PayrollError::invalid(
            "end_date",
            format!("end date {end_date} is before start date {start_date}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january(is_processed: bool) -> PayrollPeriod {
        PayrollPeriod {
            id: 1,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            is_processed,
            processed_at: None,
        }
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = january(false);
        assert!(period.contains_date(date(2024, 1, 1)));
        assert!(period.contains_date(date(2024, 1, 31)));
        assert!(!period.contains_date(date(2023, 12, 31)));
        assert!(!period.contains_date(date(2024, 2, 1)));
    }

    #[test]
    fn test_only_processed_periods_lock_dates() {
        assert!(!january(false).locks_date(date(2024, 1, 10)));
        assert!(january(true).locks_date(date(2024, 1, 10)));
        assert!(!january(true).locks_date(date(2024, 2, 10)));
    }

    #[test]
    fn test_new_period_rejects_inverted_range() {
        let inverted = NewPayrollPeriod::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(
            inverted.validate(),
            Err(PayrollError::InvalidInput { ref field, .. }) if field == "end_date"
        ));

        let single_day = NewPayrollPeriod::new(date(2024, 1, 1), date(2024, 1, 1));
        assert!(single_day.validate().is_ok());
    }

    #[test]
    fn test_deserialize_period() {
        let json = r#"{
            "id": 4,
            "start_date": "2024-03-01",
            "end_date": "2024-03-31",
            "is_processed": true,
            "processed_at": "2024-04-01T08:00:00Z"
        }"#;

        let period: PayrollPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.id, 4);
        assert!(period.is_processed);
        assert!(period.processed_at.is_some());
    }
}
