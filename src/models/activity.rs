//! Activity records: attendance, overtime and reimbursements.
//!
//! These records are owned by the activity stores. The payroll engine reads
//! only their per-period aggregates, and gates overtime and reimbursement
//! writes on processed periods.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One employee's attendance for one day.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Attendance;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut attendance = Attendance {
///     id: 1,
///     user_id: 7,
///     date: day,
///     check_in: day.and_hms_opt(9, 0, 0).unwrap(),
///     check_out: None,
/// };
/// assert!(!attendance.is_complete());
///
/// attendance.check_out = day.and_hms_opt(17, 0, 0);
/// assert!(attendance.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// The employee.
    pub user_id: u64,
    /// The attended day.
    pub date: NaiveDate,
    /// When the employee checked in.
    pub check_in: NaiveDateTime,
    /// When the employee checked out, if they have.
    pub check_out: Option<NaiveDateTime>,
}

impl Attendance {
    /// A day counts as attended only once both check-in and check-out exist.
    pub fn is_complete(&self) -> bool {
        self.check_out.is_some()
    }
}

/// Overtime claimed by an employee for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtime {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// The employee.
    pub user_id: u64,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Overtime hours.
    pub hours: Decimal,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// The payload for creating or replacing an overtime record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOvertime {
    /// The employee.
    pub user_id: u64,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Overtime hours.
    pub hours: Decimal,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl NewOvertime {
    /// Attaches a store-assigned id.
    pub fn into_record(self, id: u64) -> Overtime {
        Overtime {
            id,
            user_id: self.user_id,
            date: self.date,
            hours: self.hours,
            note: self.note,
        }
    }
}

/// An expense an employee asks to be reimbursed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reimbursement {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// The employee.
    pub user_id: u64,
    /// The day the expense was incurred.
    pub date: NaiveDate,
    /// The amount to reimburse.
    pub amount: Decimal,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// The payload for creating or replacing a reimbursement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReimbursement {
    /// The employee.
    pub user_id: u64,
    /// The day the expense was incurred.
    pub date: NaiveDate,
    /// The amount to reimburse.
    pub amount: Decimal,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl NewReimbursement {
    /// Attaches a store-assigned id.
    pub fn into_record(self, id: u64) -> Reimbursement {
        Reimbursement {
            id,
            user_id: self.user_id,
            date: self.date,
            amount: self.amount,
            note: self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_overtime_into_record() {
        let new = NewOvertime {
            user_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            hours: dec!(2.5),
            note: Some("release night".to_string()),
        };
        let record = new.into_record(11);
        assert_eq!(record.id, 11);
        assert_eq!(record.hours, dec!(2.5));
        assert_eq!(record.note.as_deref(), Some("release night"));
    }

    #[test]
    fn test_deserialize_reimbursement_without_note() {
        let json = r#"{
            "id": 5,
            "user_id": 2,
            "date": "2024-01-10",
            "amount": "150000.00"
        }"#;
        let record: Reimbursement = serde_json::from_str(json).unwrap();
        assert_eq!(record.amount, dec!(150000.00));
        assert!(record.note.is_none());
    }
}
