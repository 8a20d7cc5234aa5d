//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod activity;
mod audit;
mod employee;
mod pagination;
mod payroll_period;
mod payslip;

pub use activity::{
    Attendance, NewOvertime, NewReimbursement, Overtime, Reimbursement,
};
pub use audit::AuditStep;
pub use employee::Employee;
pub use pagination::{Page, Paginated};
pub(crate) use payroll_period::validate_range;
pub use payroll_period::{NewPayrollPeriod, PayrollPeriod};
pub use payslip::{NewPayslip, Payslip, PayslipSummary, PayslipSummaryItem};
