//! Thread-safe in-memory implementations of every collaborator trait.
//!
//! Each store keeps its rows behind a single `tokio::sync::RwLock`, so a
//! uniqueness check and the insert that depends on it happen under one write
//! guard and cannot interleave with a concurrent writer.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Attendance, Employee, NewOvertime, NewPayrollPeriod, NewPayslip, NewReimbursement, Overtime,
    Page, Paginated, PayrollPeriod, Payslip, Reimbursement,
};

use super::{
    AttendanceSource, AttendanceStore, EmployeeDirectory, OvertimeSource, OvertimeStore,
    PayslipStore, PeriodStore, ReimbursementSource, ReimbursementStore,
};

/// Rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    next_id: u64,
    rows: BTreeMap<u64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

// =============================================================================
// Periods
// =============================================================================

/// In-memory [`PeriodStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryPeriodStore {
    table: Arc<RwLock<Table<PayrollPeriod>>>,
}

impl InMemoryPeriodStore {
    /// Creates a new, empty period store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeriodStore for InMemoryPeriodStore {
    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<PayrollPeriod>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self, page: Page) -> PayrollResult<Paginated<PayrollPeriod>> {
        let table = self.table.read().await;
        let mut periods: Vec<PayrollPeriod> = table.rows.values().cloned().collect();
        periods.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(Paginated::from_slice(&periods, page))
    }

    async fn create(&self, period: NewPayrollPeriod) -> PayrollResult<PayrollPeriod> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let created = PayrollPeriod {
            id,
            start_date: period.start_date,
            end_date: period.end_date,
            is_processed: false,
            processed_at: None,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, period: PayrollPeriod) -> PayrollResult<PayrollPeriod> {
        let mut table = self.table.write().await;
        let existing = table
            .rows
            .get_mut(&period.id)
            .ok_or(PayrollError::PeriodNotFound {
                period_id: period.id,
            })?;
        if existing.is_processed {
            return Err(PayrollError::PeriodAlreadyProcessed {
                period_id: period.id,
            });
        }
        existing.start_date = period.start_date;
        existing.end_date = period.end_date;
        Ok(existing.clone())
    }

    async fn delete(&self, id: u64) -> PayrollResult<()> {
        let mut table = self.table.write().await;
        let is_processed = table
            .rows
            .get(&id)
            .map(|period| period.is_processed)
            .ok_or(PayrollError::PeriodNotFound { period_id: id })?;
        if is_processed {
            return Err(PayrollError::PeriodAlreadyProcessed { period_id: id });
        }
        table.rows.remove(&id);
        Ok(())
    }

    async fn mark_processed(&self, id: u64, at: DateTime<Utc>) -> PayrollResult<PayrollPeriod> {
        let mut table = self.table.write().await;
        let period = table
            .rows
            .get_mut(&id)
            .ok_or(PayrollError::PeriodNotFound { period_id: id })?;
        if period.is_processed {
            return Err(PayrollError::PeriodAlreadyProcessed { period_id: id });
        }
        period.is_processed = true;
        period.processed_at = Some(at);
        Ok(period.clone())
    }

    async fn is_date_locked(&self, date: NaiveDate) -> PayrollResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|period| period.locks_date(date)))
    }
}

// =============================================================================
// Payslips
// =============================================================================

#[derive(Debug, Default)]
struct PayslipTable {
    table: Table<Payslip>,
    by_user_period: HashMap<(u64, u64), u64>,
}

/// In-memory [`PayslipStore`] with a unique `(user_id, period_id)` index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPayslipStore {
    inner: Arc<RwLock<PayslipTable>>,
}

impl InMemoryPayslipStore {
    /// Creates a new, empty payslip store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of payslips across all periods.
    pub async fn count(&self) -> usize {
        self.inner.read().await.table.rows.len()
    }
}

#[async_trait]
impl PayslipStore for InMemoryPayslipStore {
    async fn create(&self, payslip: NewPayslip) -> PayrollResult<Payslip> {
        let mut inner = self.inner.write().await;
        let key = (payslip.user_id, payslip.payroll_period_id);
        if inner.by_user_period.contains_key(&key) {
            return Err(PayrollError::PayslipAlreadyGenerated {
                user_id: payslip.user_id,
                period_id: payslip.payroll_period_id,
            });
        }
        let id = inner.table.allocate_id();
        let created = payslip.into_payslip(id);
        inner.table.rows.insert(id, created.clone());
        inner.by_user_period.insert(key, id);
        Ok(created)
    }

    async fn get_by_user_and_period(
        &self,
        user_id: u64,
        period_id: u64,
    ) -> PayrollResult<Option<Payslip>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_user_period
            .get(&(user_id, period_id))
            .and_then(|id| inner.table.rows.get(id))
            .cloned())
    }

    async fn get_by_period(&self, period_id: u64) -> PayrollResult<Vec<Payslip>> {
        let inner = self.inner.read().await;
        Ok(inner
            .table
            .rows
            .values()
            .filter(|payslip| payslip.payroll_period_id == period_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, user_id: u64, period_id: u64) -> PayrollResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.by_user_period.contains_key(&(user_id, period_id)))
    }
}

// =============================================================================
// Employees
// =============================================================================

/// In-memory [`EmployeeDirectory`].
///
/// Records every `(offset, limit)` request so callers can inspect how a run
/// walked the directory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEmployeeDirectory {
    employees: Arc<RwLock<BTreeMap<u64, Employee>>>,
    requests: Arc<RwLock<Vec<(usize, usize)>>>,
}

impl InMemoryEmployeeDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an employee.
    pub async fn insert(&self, employee: Employee) {
        self.employees.write().await.insert(employee.id, employee);
    }

    /// The `(offset, limit)` pairs requested so far, in order.
    pub async fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn list_employees(&self, offset: usize, limit: usize) -> PayrollResult<Vec<Employee>> {
        self.requests.write().await.push((offset, limit));
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Attendance
// =============================================================================

#[derive(Debug, Default)]
struct AttendanceTable {
    table: Table<Attendance>,
    by_user_date: HashMap<(u64, NaiveDate), u64>,
}

/// In-memory [`AttendanceStore`] with a unique `(user_id, date)` index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAttendanceStore {
    inner: Arc<RwLock<AttendanceTable>>,
}

impl InMemoryAttendanceStore {
    /// Creates a new, empty attendance store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceSource for InMemoryAttendanceStore {
    async fn count_working_days(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<u32> {
        let inner = self.inner.read().await;
        let count = inner
            .table
            .rows
            .values()
            .filter(|a| a.user_id == user_id && in_range(a.date, start, end) && a.is_complete())
            .count();
        Ok(count as u32)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> PayrollResult<Attendance> {
        let mut inner = self.inner.write().await;
        if inner.by_user_date.contains_key(&(user_id, date)) {
            return Err(PayrollError::DuplicateRecord {
                kind: "attendance".to_string(),
                user_id,
                date,
            });
        }
        let id = inner.table.allocate_id();
        let attendance = Attendance {
            id,
            user_id,
            date,
            check_in: at,
            check_out: None,
        };
        inner.table.rows.insert(id, attendance.clone());
        inner.by_user_date.insert((user_id, date), id);
        Ok(attendance)
    }

    async fn check_out(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> PayrollResult<Attendance> {
        let mut inner = self.inner.write().await;
        let id = *inner
            .by_user_date
            .get(&(user_id, date))
            .ok_or_else(|| PayrollError::RecordNotFound {
                kind: "attendance".to_string(),
                id: user_id,
            })?;
        let attendance = inner
            .table
            .rows
            .get_mut(&id)
            .ok_or_else(|| PayrollError::store(format!("attendance index points at missing row {id}")))?;
        if attendance.check_out.is_some() {
            return Err(PayrollError::DuplicateRecord {
                kind: "check-out".to_string(),
                user_id,
                date,
            });
        }
        attendance.check_out = Some(at);
        Ok(attendance.clone())
    }

    async fn list(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Vec<Attendance>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Attendance> = inner
            .table
            .rows
            .values()
            .filter(|a| a.user_id == user_id && in_range(a.date, start, end))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        Ok(rows)
    }
}

// =============================================================================
// Overtime
// =============================================================================

#[derive(Debug, Default)]
struct OvertimeTable {
    table: Table<Overtime>,
    by_user_date: HashMap<(u64, NaiveDate), u64>,
}

/// In-memory [`OvertimeStore`] with a unique `(user_id, date)` index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOvertimeStore {
    inner: Arc<RwLock<OvertimeTable>>,
}

impl InMemoryOvertimeStore {
    /// Creates a new, empty overtime store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn overtime_not_found(id: u64) -> PayrollError {
    PayrollError::RecordNotFound {
        kind: "overtime".to_string(),
        id,
    }
}

#[async_trait]
impl OvertimeSource for InMemoryOvertimeStore {
    async fn count_overtime_hours(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal> {
        let inner = self.inner.read().await;
        Ok(inner
            .table
            .rows
            .values()
            .filter(|o| o.user_id == user_id && in_range(o.date, start, end))
            .map(|o| o.hours)
            .sum())
    }
}

#[async_trait]
impl OvertimeStore for InMemoryOvertimeStore {
    async fn create(&self, overtime: NewOvertime) -> PayrollResult<Overtime> {
        let mut inner = self.inner.write().await;
        let key = (overtime.user_id, overtime.date);
        if inner.by_user_date.contains_key(&key) {
            return Err(PayrollError::DuplicateRecord {
                kind: "overtime".to_string(),
                user_id: overtime.user_id,
                date: overtime.date,
            });
        }
        let id = inner.table.allocate_id();
        let record = overtime.into_record(id);
        inner.table.rows.insert(id, record.clone());
        inner.by_user_date.insert(key, id);
        Ok(record)
    }

    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<Overtime>> {
        Ok(self.inner.read().await.table.rows.get(&id).cloned())
    }

    async fn update(&self, id: u64, overtime: NewOvertime) -> PayrollResult<Overtime> {
        let mut inner = self.inner.write().await;
        let previous = inner
            .table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| overtime_not_found(id))?;

        let new_key = (overtime.user_id, overtime.date);
        let taken = inner
            .by_user_date
            .get(&new_key)
            .is_some_and(|&holder| holder != id);
        if taken {
            return Err(PayrollError::DuplicateRecord {
                kind: "overtime".to_string(),
                user_id: overtime.user_id,
                date: overtime.date,
            });
        }

        inner.by_user_date.remove(&(previous.user_id, previous.date));
        inner.by_user_date.insert(new_key, id);
        let record = overtime.into_record(id);
        inner.table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: u64) -> PayrollResult<()> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .table
            .rows
            .remove(&id)
            .ok_or_else(|| overtime_not_found(id))?;
        inner.by_user_date.remove(&(removed.user_id, removed.date));
        Ok(())
    }

    async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Overtime>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Overtime> = inner
            .table
            .rows
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(Paginated::from_slice(&rows, page))
    }
}

// =============================================================================
// Reimbursements
// =============================================================================

/// In-memory [`ReimbursementStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryReimbursementStore {
    table: Arc<RwLock<Table<Reimbursement>>>,
}

impl InMemoryReimbursementStore {
    /// Creates a new, empty reimbursement store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn reimbursement_not_found(id: u64) -> PayrollError {
    PayrollError::RecordNotFound {
        kind: "reimbursement".to_string(),
        id,
    }
}

#[async_trait]
impl ReimbursementSource for InMemoryReimbursementStore {
    async fn sum_reimbursement(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.user_id == user_id && in_range(r.date, start, end))
            .map(|r| r.amount)
            .sum())
    }
}

#[async_trait]
impl ReimbursementStore for InMemoryReimbursementStore {
    async fn create(&self, reimbursement: NewReimbursement) -> PayrollResult<Reimbursement> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let record = reimbursement.into_record(id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: u64) -> PayrollResult<Option<Reimbursement>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(
        &self,
        id: u64,
        reimbursement: NewReimbursement,
    ) -> PayrollResult<Reimbursement> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(reimbursement_not_found(id));
        }
        let record = reimbursement.into_record(id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: u64) -> PayrollResult<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| reimbursement_not_found(id))
    }

    async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Reimbursement>> {
        let table = self.table.read().await;
        let mut rows: Vec<Reimbursement> = table
            .rows
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(Paginated::from_slice(&rows, page))
    }
}
