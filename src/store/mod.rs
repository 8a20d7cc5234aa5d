//! Collaborator interfaces consumed by the payroll engine.
//!
//! Each trait is the narrow contract the engine needs from a store it does
//! not own. Uniqueness rules (one payslip per user and period, one overtime
//! claim and one attendance row per user and day) are enforced atomically by
//! the store implementations and surface as Conflict errors, so callers never
//! rely on a read-then-write check alone.
//!
//! [`memory`] provides thread-safe in-memory implementations of every trait.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::error::PayrollResult;
use crate::models::{
    Attendance, Employee, NewOvertime, NewPayrollPeriod, NewPayslip, NewReimbursement, Overtime,
    Page, Paginated, PayrollPeriod, Payslip, Reimbursement,
};

/// Storage for payroll periods.
#[async_trait]
pub trait PeriodStore: Send + Sync {
    /// Returns the period, or `None` if it does not exist.
    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<PayrollPeriod>>;

    /// Lists periods, newest start date first.
    async fn find_all(&self, page: Page) -> PayrollResult<Paginated<PayrollPeriod>>;

    /// Creates an unprocessed period.
    async fn create(&self, period: NewPayrollPeriod) -> PayrollResult<PayrollPeriod>;

    /// Replaces the date range of an unprocessed period.
    ///
    /// Fails with `PeriodNotFound` or `PeriodAlreadyProcessed`.
    async fn update(&self, period: PayrollPeriod) -> PayrollResult<PayrollPeriod>;

    /// Deletes an unprocessed period.
    ///
    /// Fails with `PeriodNotFound` or `PeriodAlreadyProcessed`.
    async fn delete(&self, id: u64) -> PayrollResult<()>;

    /// Atomically marks an unprocessed period processed.
    ///
    /// Fails with `PeriodNotFound`, or `PeriodAlreadyProcessed` when the
    /// period was processed already; the transition happens at most once.
    async fn mark_processed(&self, id: u64, at: DateTime<Utc>) -> PayrollResult<PayrollPeriod>;

    /// True iff a processed period covers `date`.
    async fn is_date_locked(&self, date: NaiveDate) -> PayrollResult<bool>;
}

/// Storage for payslips.
#[async_trait]
pub trait PayslipStore: Send + Sync {
    /// Inserts a payslip unless one exists for the same user and period.
    ///
    /// Fails with `PayslipAlreadyGenerated` on a duplicate; the check and the
    /// insert are a single atomic step.
    async fn create(&self, payslip: NewPayslip) -> PayrollResult<Payslip>;

    /// Returns the user's payslip for the period, if any.
    async fn get_by_user_and_period(
        &self,
        user_id: u64,
        period_id: u64,
    ) -> PayrollResult<Option<Payslip>>;

    /// Returns every payslip of the period.
    async fn get_by_period(&self, period_id: u64) -> PayrollResult<Vec<Payslip>>;

    /// True if the user already has a payslip for the period.
    async fn exists(&self, user_id: u64, period_id: u64) -> PayrollResult<bool>;
}

/// Attendance aggregates.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Counts days in `[start, end]` with both a check-in and a check-out.
    async fn count_working_days(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<u32>;
}

/// Overtime aggregates.
#[async_trait]
pub trait OvertimeSource: Send + Sync {
    /// Sums overtime hours in `[start, end]`.
    async fn count_overtime_hours(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal>;
}

/// Reimbursement aggregates.
#[async_trait]
pub trait ReimbursementSource: Send + Sync {
    /// Sums reimbursement amounts in `[start, end]`.
    async fn sum_reimbursement(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal>;
}

/// The employee directory, read in pages.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Returns up to `limit` employees starting at `offset`, ordered by id.
    ///
    /// The page is empty once the directory is exhausted.
    async fn list_employees(&self, offset: usize, limit: usize) -> PayrollResult<Vec<Employee>>;
}

/// Attendance records.
#[async_trait]
pub trait AttendanceStore: AttendanceSource {
    /// Records a check-in. Fails with `DuplicateRecord` if the user already
    /// has an attendance row for `date`.
    async fn check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> PayrollResult<Attendance>;

    /// Records a check-out on the user's row for `date`.
    ///
    /// Fails with `RecordNotFound` when there was no check-in and with
    /// `DuplicateRecord` when the user already checked out.
    async fn check_out(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> PayrollResult<Attendance>;

    /// Lists the user's attendance rows in `[start, end]`, oldest first.
    async fn list(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Vec<Attendance>>;
}

/// Overtime records.
#[async_trait]
pub trait OvertimeStore: OvertimeSource {
    /// Inserts a claim. Fails with `DuplicateRecord` if the user already has
    /// a claim on that date.
    async fn create(&self, overtime: NewOvertime) -> PayrollResult<Overtime>;

    /// Returns the claim, if any.
    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<Overtime>>;

    /// Replaces a claim. Fails with `RecordNotFound`, or `DuplicateRecord`
    /// when moved onto a date the user already claimed.
    async fn update(&self, id: u64, overtime: NewOvertime) -> PayrollResult<Overtime>;

    /// Deletes a claim. Fails with `RecordNotFound`.
    async fn delete(&self, id: u64) -> PayrollResult<()>;

    /// Lists the user's claims, newest date first.
    async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Overtime>>;
}

/// Reimbursement records.
#[async_trait]
pub trait ReimbursementStore: ReimbursementSource {
    /// Inserts a reimbursement.
    async fn create(&self, reimbursement: NewReimbursement) -> PayrollResult<Reimbursement>;

    /// Returns the reimbursement, if any.
    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<Reimbursement>>;

    /// Replaces a reimbursement. Fails with `RecordNotFound`.
    async fn update(
        &self,
        id: u64,
        reimbursement: NewReimbursement,
    ) -> PayrollResult<Reimbursement>;

    /// Deletes a reimbursement. Fails with `RecordNotFound`.
    async fn delete(&self, id: u64) -> PayrollResult<()>;

    /// Lists the user's reimbursements, newest date first.
    async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Reimbursement>>;
}

/// Shared handle to a [`PeriodStore`].
pub type PeriodStoreRef = Arc<dyn PeriodStore>;
/// Shared handle to a [`PayslipStore`].
pub type PayslipStoreRef = Arc<dyn PayslipStore>;
/// Shared handle to an [`EmployeeDirectory`].
pub type EmployeeDirectoryRef = Arc<dyn EmployeeDirectory>;
