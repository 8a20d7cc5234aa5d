//! Reimbursement requests with positive amounts, gated by period locks.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::cache::CacheInvalidator;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{NewReimbursement, Page, Paginated, Reimbursement};
use crate::payroll::PeriodLockGuard;
use crate::store::ReimbursementStore;

/// Cache kind for reimbursements.
pub const REIMBURSEMENT_CACHE_KIND: &str = "reimbursement";

/// Reimbursement requests, gated by period locks.
#[derive(Clone)]
pub struct ReimbursementService {
    store: Arc<dyn ReimbursementStore>,
    lock_guard: PeriodLockGuard,
    cache: CacheInvalidator,
}

fn validate_amount(amount: Decimal) -> PayrollResult<()> {
    if amount <= Decimal::ZERO {
        return Err(PayrollError::invalid("amount", "must be greater than zero"));
    }
    Ok(())
}

impl ReimbursementService {
    /// Creates the service.
    pub fn new(
        store: Arc<dyn ReimbursementStore>,
        lock_guard: PeriodLockGuard,
        cache: CacheInvalidator,
    ) -> Self {
        Self {
            store,
            lock_guard,
            cache,
        }
    }

    async fn existing(&self, id: u64) -> PayrollResult<Reimbursement> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PayrollError::RecordNotFound {
                kind: REIMBURSEMENT_CACHE_KIND.to_string(),
                id,
            })
    }

    /// Records a reimbursement request. Several may exist for the same day.
    pub async fn submit(
        &self,
        user_id: u64,
        date: NaiveDate,
        amount: Decimal,
        note: Option<String>,
    ) -> PayrollResult<Reimbursement> {
        validate_amount(amount)?;
        let lease = self.lock_guard.lock_for_write(&[date]).await?;

        let created = self
            .store
            .create(NewReimbursement {
                user_id,
                date,
                amount,
                note,
            })
            .await?;
        drop(lease);
        self.cache.invalidate_kind(REIMBURSEMENT_CACHE_KIND).await;

        info!(user_id, date = %date, amount = %amount, reimbursement_id = created.id, "Reimbursement submitted");
        Ok(created)
    }

    /// Replaces the date, amount and note of a request.
    pub async fn update(
        &self,
        id: u64,
        date: NaiveDate,
        amount: Decimal,
        note: Option<String>,
    ) -> PayrollResult<Reimbursement> {
        validate_amount(amount)?;
        let current = self.existing(id).await?;
        let lease = self.lock_guard.lock_for_write(&[current.date, date]).await?;

        let updated = self
            .store
            .update(
                id,
                NewReimbursement {
                    user_id: current.user_id,
                    date,
                    amount,
                    note,
                },
            )
            .await?;
        drop(lease);
        self.invalidate(id).await;

        info!(reimbursement_id = id, date = %date, amount = %amount, "Reimbursement updated");
        Ok(updated)
    }

    /// Deletes a request on an unlocked date.
    pub async fn delete(&self, id: u64) -> PayrollResult<()> {
        let current = self.existing(id).await?;
        let lease = self.lock_guard.lock_for_write(&[current.date]).await?;
        self.store.delete(id).await?;
        drop(lease);
        self.invalidate(id).await;
        info!(reimbursement_id = id, "Reimbursement deleted");
        Ok(())
    }

    /// Returns one request.
    pub async fn get(&self, id: u64) -> PayrollResult<Reimbursement> {
        let key = self.cache.item_key(REIMBURSEMENT_CACHE_KIND, id).await;
        self.cache.read_through(&key, || self.existing(id)).await
    }

    /// Lists the user's requests, newest date first.
    pub async fn list(&self, user_id: u64, page: Page) -> PayrollResult<Paginated<Reimbursement>> {
        let key = self
            .cache
            .listing_key(REIMBURSEMENT_CACHE_KIND)
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
            .invalidate(&self.cache.item_key(REIMBURSEMENT_CACHE_KIND, id).await)
            .await;
        self.cache.invalidate_kind(REIMBURSEMENT_CACHE_KIND).await;
    }
}
