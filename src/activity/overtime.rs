//! Overtime claims: one per user per day, capped in hours.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::cache::CacheInvalidator;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{NewOvertime, Overtime, Page, Paginated};
use crate::payroll::PeriodLockGuard;
use crate::store::OvertimeStore;

/// Cache kind for overtime records.
pub const OVERTIME_CACHE_KIND: &str = "overtime";

/// Overtime claims, gated by period locks.
#[derive(Clone)]
pub struct OvertimeService {
    store: Arc<dyn OvertimeStore>,
    lock_guard: PeriodLockGuard,
    cache: CacheInvalidator,
    max_hours_per_day: Decimal,
}

impl OvertimeService {
    /// Creates the service; claims above `max_hours_per_day` are rejected.
    pub fn new(
        store: Arc<dyn OvertimeStore>,
        lock_guard: PeriodLockGuard,
        cache: CacheInvalidator,
        max_hours_per_day: Decimal,
    ) -> Self {
        Self {
            store,
            lock_guard,
            cache,
            max_hours_per_day,
        }
    }

    fn validate_hours(&self, hours: Decimal) -> PayrollResult<()> {
        if hours <= Decimal::ZERO {
            return Err(PayrollError::invalid("hours", "must be greater than zero"));
        }
        if hours > self.max_hours_per_day {
            return Err(PayrollError::invalid(
                "hours",
                format!("cannot exceed {} hours per day", self.max_hours_per_day.normalize()),
            ));
        }
        Ok(())
    }

    async fn existing(&self, id: u64) -> PayrollResult<Overtime> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PayrollError::RecordNotFound {
                kind: OVERTIME_CACHE_KIND.to_string(),
                id,
            })
    }

    /// Records an overtime claim for one day.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `hours` is not in `(0, max_hours_per_day]`.
    /// - `DateLocked` if the day belongs to a processed period.
    /// - `DuplicateRecord` if the user already claimed overtime that day.
    pub async fn submit(
        &self,
        user_id: u64,
        date: NaiveDate,
        hours: Decimal,
        note: Option<String>,
    ) -> PayrollResult<Overtime> {
        self.validate_hours(hours)?;
        let lease = self.lock_guard.lock_for_write(&[date]).await?;

        let created = self
            .store
            .create(NewOvertime {
                user_id,
                date,
                hours,
                note,
            })
            .await?;
        drop(lease);
        self.cache.invalidate_kind(OVERTIME_CACHE_KIND).await;

        info!(user_id, date = %date, hours = %hours, overtime_id = created.id, "Overtime submitted");
        Ok(created)
    }

    /// Replaces the date, hours and note of a claim.
    ///
    /// Both the current and the target date must be unlocked.
    pub async fn update(
        &self,
        id: u64,
        date: NaiveDate,
        hours: Decimal,
        note: Option<String>,
    ) -> PayrollResult<Overtime> {
        self.validate_hours(hours)?;
        let current = self.existing(id).await?;
        let lease = self.lock_guard.lock_for_write(&[current.date, date]).await?;

        let updated = self
            .store
            .update(
                id,
                NewOvertime {
                    user_id: current.user_id,
                    date,
                    hours,
                    note,
                },
            )
            .await?;
        drop(lease);
        self.invalidate(id).await;

        info!(overtime_id = id, date = %date, hours = %hours, "Overtime updated");
        Ok(updated)
    }

    /// Deletes a claim on an unlocked date.
    pub async fn delete(&self, id: u64) -> PayrollResult<()> {
        let current = self.existing(id).await?;
        let lease = self.lock_guard.lock_for_write(&[current.date]).await?;
        self.store.delete(id).await?;
        drop(lease);
        self.invalidate(id).await;
        info!(overtime_id = id, "Overtime deleted");
        Ok(())
    }

    /// Returns one claim.
    pub async fn get(&self, id: u64) -> PayrollResult<Overtime> {
        let key = self.cache.item_key(OVERTIME_CACHE_KIND, id).await;
        self.cache.read_through(&key, || self.existing(id)).await
    }

    /// Lists the user's claims, newest date first.
    pub async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Overtime>> {
        let key = self
            .cache
            .listing_key(OVERTIME_CACHE_KIND)
            .await
            .part(user_id)
            .part(page.page)
            .part(page.limit);
        self.cache
            .read_through(&key, || self.store.list(user_id, page))
            .await
    }

    async fn invalidate(&self, id: u64) {
        self.cache
            .invalidate(&self.cache.item_key(OVERTIME_CACHE_KIND, id).await)
            .await;
        self.cache.invalidate_kind(OVERTIME_CACHE_KIND).await;
    }
}
