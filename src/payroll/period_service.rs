//! Payroll period administration with cached reads.
//!
//! Reads go through the cache; every write and every completed run retires
//! the cached copies. Lock checks never consult the cache.

use chrono::NaiveDate;
use tracing::info;

use crate::cache::CacheInvalidator;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{NewPayrollPeriod, Page, Paginated, PayrollPeriod, validate_range};
use crate::store::PeriodStoreRef;

use super::lock_guard::PeriodLockGuard;
use super::runner::{PayrollRunner, RunReport};

/// Cache kind for payroll periods.
pub const PERIOD_CACHE_KIND: &str = "payroll";

/// Administration of payroll periods and the entry point for payroll runs.
#[derive(Clone)]
pub struct PayrollPeriodService {
    periods: PeriodStoreRef,
    cache: CacheInvalidator,
    lock_guard: PeriodLockGuard,
    runner: PayrollRunner,
}

impl PayrollPeriodService {
    /// Creates the service.
    pub fn new(
        periods: PeriodStoreRef,
        cache: CacheInvalidator,
        lock_guard: PeriodLockGuard,
        runner: PayrollRunner,
    ) -> Self {
        Self {
            periods,
            cache,
            lock_guard,
            runner,
        }
    }

    /// Lists periods, newest start date first.
    pub async fn list_periods(&self, page: Page) -> PayrollResult<Paginated<PayrollPeriod>> {
        let key = self
            .cache
            .listing_key(PERIOD_CACHE_KIND)
            .await
            .part(page.page)
            .part(page.limit);
        self.cache
            .read_through(&key, || self.periods.find_all(page))
            .await
    }

    /// Returns one period.
    pub async fn get_period(&self, id: u64) -> PayrollResult<PayrollPeriod> {
        let key = self.cache.item_key(PERIOD_CACHE_KIND, id).await;
        self.cache
            .read_through(&key, || async {
                self.periods
                    .find_by_id(id)
                    .await?
                    .ok_or(PayrollError::PeriodNotFound { period_id: id })
            })
            .await
    }

    /// Creates an unprocessed period.
    pub async fn create_period(&self, period: NewPayrollPeriod) -> PayrollResult<PayrollPeriod> {
        period.validate()?;
        let created = self.periods.create(period).await?;
        self.cache.invalidate_kind(PERIOD_CACHE_KIND).await;
        info!(
            period_id = created.id,
            start_date = %created.start_date,
            end_date = %created.end_date,
            "Payroll period created"
        );
        Ok(created)
    }

    /// Replaces the date range of an unprocessed period.
    pub async fn update_period(&self, period: PayrollPeriod) -> PayrollResult<PayrollPeriod> {
        validate_range(period.start_date, period.end_date)?;
        let updated = self.periods.update(period).await?;
        self.invalidate_period(updated.id).await;
        info!(period_id = updated.id, "Payroll period updated");
        Ok(updated)
    }

    /// Deletes an unprocessed period.
    pub async fn delete_period(&self, id: u64) -> PayrollResult<()> {
        if id == 0 {
            return Err(PayrollError::invalid("id", "period id is required"));
        }
        self.periods.delete(id).await?;
        self.invalidate_period(id).await;
        info!(period_id = id, "Payroll period deleted");
        Ok(())
    }

    /// Runs payroll for the period and drops every cached copy of it.
    pub async fn run_payroll(&self, id: u64) -> PayrollResult<RunReport> {
        let report = self.runner.run_payroll(id).await?;
        self.invalidate_period(id).await;
        Ok(report)
    }

    /// True iff a processed period covers `date`.
    pub async fn is_date_locked(&self, date: NaiveDate) -> PayrollResult<bool> {
        self.lock_guard.is_locked(date).await
    }

    async fn invalidate_period(&self, id: u64) {
        self.cache
            .invalidate(&self.cache.item_key(PERIOD_CACHE_KIND, id).await)
            .await;
        self.cache.invalidate_kind(PERIOD_CACHE_KIND).await;
    }
}
