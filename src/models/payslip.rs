//! Payslip models.
//!
//! This module contains the [`Payslip`] record persisted once per employee per
//! period, the [`NewPayslip`] insert payload, and the [`PayslipSummary`]
//! returned when reporting on a whole period.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The computed compensation record for one employee within one payroll period.
///
/// All currency fields are rounded to two decimal places. At most one payslip
/// exists per `(user_id, payroll_period_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// The employee this payslip belongs to.
    pub user_id: u64,
    /// The period this payslip covers.
    pub payroll_period_id: u64,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
    /// Days with both a check-in and a check-out.
    pub attendance_days: u32,
    /// Rounded daily salary multiplied by attended days.
    pub attendance_earnings: Decimal,
    /// Approved overtime hours in the period.
    pub overtime_hours: Decimal,
    /// Rounded overtime pay.
    pub overtime_earnings: Decimal,
    /// Sum of reimbursements in the period.
    pub total_reimbursement: Decimal,
    /// Rounded total of earnings, overtime and reimbursements.
    pub take_home_pay: Decimal,
}

/// The payload written to the payslip store; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayslip {
    /// The employee this payslip belongs to.
    pub user_id: u64,
    /// The period this payslip covers.
    pub payroll_period_id: u64,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
    /// Days with both a check-in and a check-out.
    pub attendance_days: u32,
    /// Rounded daily salary multiplied by attended days.
    pub attendance_earnings: Decimal,
    /// Approved overtime hours in the period.
    pub overtime_hours: Decimal,
    /// Rounded overtime pay.
    pub overtime_earnings: Decimal,
    /// Sum of reimbursements in the period.
    pub total_reimbursement: Decimal,
    /// Rounded total of earnings, overtime and reimbursements.
    pub take_home_pay: Decimal,
}

impl NewPayslip {
    /// Attaches a store-assigned id.
    pub fn into_payslip(self, id: u64) -> Payslip {
        Payslip {
            id,
            user_id: self.user_id,
            payroll_period_id: self.payroll_period_id,
            generated_at: self.generated_at,
            attendance_days: self.attendance_days,
            attendance_earnings: self.attendance_earnings,
            overtime_hours: self.overtime_hours,
            overtime_earnings: self.overtime_earnings,
            total_reimbursement: self.total_reimbursement,
            take_home_pay: self.take_home_pay,
        }
    }
}

/// One employee's line in a period summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummaryItem {
    /// The employee.
    pub user_id: u64,
    /// The employee's name; absent when the directory no longer lists them.
    #[serde(default)]
    pub name: Option<String>,
    /// The employee's take-home pay for the period.
    pub take_home_pay: Decimal,
}

/// Take-home pay across every payslip of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummary {
    /// The summarized period.
    pub payroll_period_id: u64,
    /// One item per payslip, ordered by user id.
    pub items: Vec<PayslipSummaryItem>,
    /// Sum of all take-home pays, rounded once at the aggregate level.
    pub total_take_home_pay: Decimal,
}
