//! Period locks and the write gate shared by activity writes and payroll runs.
//!
//! A date is locked once a processed period covers it. While a run is in
//! flight its period is also *closing*: activity writes on its dates are
//! refused so that nothing lands in the period after its payslips were
//! computed. Writes hold a [`WriteLease`] from the lock check until the store
//! write completes, and a run waits for outstanding leases before it starts
//! closing, so a check can never be overtaken by a run.
//!
//! The gate is shared by clones of one guard, i.e. within one engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use crate::models::PayrollPeriod;
use crate::store::PeriodStoreRef;

/// Answers whether a date is frozen by a processed payroll period.
///
/// Always reads the period store directly; a cached period could still show
/// `is_processed = false` after a run completed.
#[derive(Clone)]
pub struct PeriodLockGuard {
    periods: PeriodStoreRef,
    gate: Arc<RwLock<()>>,
    closing: Arc<Mutex<HashMap<u64, PayrollPeriod>>>,
}

/// Permission to write activity records on the dates it was granted for.
///
/// Runs cannot start closing a period while a lease is held.
#[must_use = "the dates are only protected while the lease is held"]
pub struct WriteLease {
    _gate: OwnedRwLockReadGuard<()>,
}

/// Keeps a period closing until dropped.
#[must_use = "the period stops closing as soon as the guard is dropped"]
pub struct ClosingGuard {
    closing: Arc<Mutex<HashMap<u64, PayrollPeriod>>>,
    period_id: u64,
}

impl Drop for ClosingGuard {
    fn drop(&mut self) {
        lock_closing(&self.closing).remove(&self.period_id);
    }
}

fn lock_closing(
    closing: &Mutex<HashMap<u64, PayrollPeriod>>,
) -> MutexGuard<'_, HashMap<u64, PayrollPeriod>> {
    closing
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PeriodLockGuard {
    /// Creates a guard over the given period store.
    pub fn new(periods: PeriodStoreRef) -> Self {
        Self {
            periods,
            gate: Arc::new(RwLock::new(())),
            closing: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// True iff a processed period covers `date`.
    pub async fn is_locked(&self, date: NaiveDate) -> PayrollResult<bool> {
        self.periods.is_date_locked(date).await
    }

    /// True iff a run is currently closing a period that covers `date`.
    pub fn is_closing(&self, date: NaiveDate) -> bool {
        lock_closing(&self.closing)
            .values()
            .any(|period| period.contains_date(date))
    }

    /// Fails with [`PayrollError::DateLocked`] when `date` is locked.
    pub async fn ensure_unlocked(&self, date: NaiveDate) -> PayrollResult<()> {
        if self.is_locked(date).await? {
            debug!(date = %date, "Rejecting write on locked date");
            return Err(PayrollError::DateLocked { date });
        }
        Ok(())
    }

    /// Grants a lease for writing on every date in `dates`.
    ///
    /// # Errors
    ///
    /// `DateLocked` if any date is locked or belongs to a closing period.
    pub async fn lock_for_write(&self, dates: &[NaiveDate]) -> PayrollResult<WriteLease> {
        let lease = WriteLease {
            _gate: Arc::clone(&self.gate).read_owned().await,
        };
        for &date in dates {
            if self.is_closing(date) {
                debug!(date = %date, "Rejecting write on closing period");
                return Err(PayrollError::DateLocked { date });
            }
            self.ensure_unlocked(date).await?;
        }
        Ok(lease)
    }

    /// Marks `period` as closing once every outstanding lease is released.
    pub async fn begin_closing(&self, period: &PayrollPeriod) -> ClosingGuard {
        let _exclusive = self.gate.write().await;
        lock_closing(&self.closing).insert(period.id, period.clone());
        debug!(period_id = period.id, "Period closing");
        ClosingGuard {
            closing: Arc::clone(&self.closing),
            period_id: period.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPayrollPeriod;
    use crate::store::PeriodStore;
    use crate::store::memory::InMemoryPeriodStore;
    use chrono::Utc;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn january(store: &InMemoryPeriodStore) -> PayrollPeriod {
        store
            .create(NewPayrollPeriod::new(date(2024, 1, 1), date(2024, 1, 31)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_locking_follows_processing() {
        let store = InMemoryPeriodStore::new();
        let guard = PeriodLockGuard::new(Arc::new(store.clone()));
        let period = january(&store).await;

        assert!(!guard.is_locked(date(2024, 1, 15)).await.unwrap());
        guard.ensure_unlocked(date(2024, 1, 15)).await.unwrap();

        store.mark_processed(period.id, Utc::now()).await.unwrap();

        assert!(guard.is_locked(date(2024, 1, 15)).await.unwrap());
        assert!(matches!(
            guard.ensure_unlocked(date(2024, 1, 15)).await,
            Err(PayrollError::DateLocked { .. })
        ));
        guard.ensure_unlocked(date(2024, 2, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_unprocessed_overlapping_period_does_not_lock() {
        let store = InMemoryPeriodStore::new();
        let guard = PeriodLockGuard::new(Arc::new(store.clone()));
        january(&store).await;
        store
            .create(NewPayrollPeriod::new(date(2024, 1, 15), date(2024, 2, 15)))
            .await
            .unwrap();

        assert!(!guard.is_locked(date(2024, 1, 20)).await.unwrap());
    }

    #[tokio::test]
    async fn test_closing_period_refuses_leases_until_released() {
        let store = InMemoryPeriodStore::new();
        let guard = PeriodLockGuard::new(Arc::new(store.clone()));
        let period = january(&store).await;

        let closing = guard.begin_closing(&period).await;

        assert!(guard.is_closing(date(2024, 1, 10)));
        assert!(!guard.is_locked(date(2024, 1, 10)).await.unwrap());
        assert!(matches!(
            guard.lock_for_write(&[date(2024, 2, 1), date(2024, 1, 10)]).await,
            Err(PayrollError::DateLocked { date: d }) if d == date(2024, 1, 10)
        ));
        assert!(guard.lock_for_write(&[date(2024, 2, 1)]).await.is_ok());

        drop(closing);
        assert!(!guard.is_closing(date(2024, 1, 10)));
        assert!(guard.lock_for_write(&[date(2024, 1, 10)]).await.is_ok());
    }

    #[tokio::test]
    async fn test_closing_waits_for_outstanding_leases() {
        let store = InMemoryPeriodStore::new();
        let guard = PeriodLockGuard::new(Arc::new(store.clone()));
        let period = january(&store).await;

        let lease = guard.lock_for_write(&[date(2024, 1, 10)]).await.unwrap();

        let closer = guard.clone();
        let closing = tokio::spawn(async move { closer.begin_closing(&period).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!closing.is_finished());
        assert!(!guard.is_closing(date(2024, 1, 10)));

        drop(lease);
        let _closing = closing.await.unwrap();
        assert!(guard.is_closing(date(2024, 1, 10)));
    }
}
