//! Payroll runs: chunked traversal of the employee directory.
//!
//! A run claims its period in a per-process registry and keeps the period
//! closing for its whole duration, so activity writes cannot slip into it
//! after the payslips were computed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::store::{EmployeeDirectoryRef, PeriodStoreRef};

use super::generator::PayslipGenerator;
use super::lock_guard::PeriodLockGuard;

/// The outcome of a successful payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Correlation id attached to every log line of the run.
    pub run_id: Uuid,
    /// The processed period.
    pub period_id: u64,
    /// Size of every directory page visited, including the final empty one.
    pub page_sizes: Vec<usize>,
    /// Payslips created by this run.
    pub generated: usize,
    /// Employees whose payslip already existed.
    pub skipped: usize,
    /// When the period was marked processed.
    pub processed_at: DateTime<Utc>,
}

/// Periods with a run currently in flight in this process.
#[derive(Debug, Default, Clone)]
struct RunRegistry {
    active: Arc<Mutex<HashSet<u64>>>,
}

impl RunRegistry {
    fn lock(&self) -> MutexGuard<'_, HashSet<u64>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn claim(&self, period_id: u64) -> PayrollResult<RunClaim> {
        if !self.lock().insert(period_id) {
            return Err(PayrollError::RunInProgress { period_id });
        }
        Ok(RunClaim {
            registry: self.clone(),
            period_id,
        })
    }
}

/// Releases the period from the registry when dropped.
struct RunClaim {
    registry: RunRegistry,
    period_id: u64,
}

impl Drop for RunClaim {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.period_id);
    }
}

/// Drives a payroll run over the whole employee directory.
#[derive(Clone)]
pub struct PayrollRunner {
    periods: PeriodStoreRef,
    directory: EmployeeDirectoryRef,
    generator: PayslipGenerator,
    lock_guard: PeriodLockGuard,
    chunk_size: usize,
    registry: RunRegistry,
}

impl PayrollRunner {
    /// Creates a runner that reads the directory `chunk_size` employees at a time.
    pub fn new(
        periods: PeriodStoreRef,
        directory: EmployeeDirectoryRef,
        generator: PayslipGenerator,
        lock_guard: PeriodLockGuard,
        chunk_size: usize,
    ) -> Self {
        Self {
            periods,
            directory,
            generator,
            lock_guard,
            chunk_size: chunk_size.max(1),
            registry: RunRegistry::default(),
        }
    }

    /// The directory page size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Generates a payslip for every employee, then marks the period processed.
    ///
    /// Activity writes on the period's dates are refused from the moment the
    /// run starts; they reopen if the run aborts.
    ///
    /// Employees that already have a payslip are skipped, so a run that
    /// aborted part-way can be retried. Any other error aborts the run and is
    /// returned unchanged; payslips committed before it stay.
    ///
    /// # Errors
    ///
    /// - `PeriodNotFound` if the period does not exist.
    /// - `PeriodAlreadyProcessed` if it was processed already, including by a
    ///   concurrent actor between traversal and completion.
    /// - `RunInProgress` if another run for the period is in flight.
    /// - The first generation or collaborator error encountered.
    pub async fn run_payroll(&self, period_id: u64) -> PayrollResult<RunReport> {
        let run_id = Uuid::new_v4();
        let start_time = Instant::now();
        info!(run_id = %run_id, period_id, "Starting payroll run");

        let period = self
            .periods
            .find_by_id(period_id)
            .await?
            .ok_or(PayrollError::PeriodNotFound { period_id })?;
        if period.is_processed {
            return Err(PayrollError::PeriodAlreadyProcessed { period_id });
        }

        let _claim = self.registry.claim(period_id).inspect_err(|_| {
            warn!(run_id = %run_id, period_id, "Payroll run already in progress");
        })?;
        let _closing = self.lock_guard.begin_closing(&period).await;

        let mut page_sizes = Vec::new();
        let mut generated = 0;
        let mut skipped = 0;
        let mut offset = 0;

        loop {
            let employees = self
                .directory
                .list_employees(offset, self.chunk_size)
                .await
                .inspect_err(|err| {
                    warn!(run_id = %run_id, period_id, offset, error = %err, "Employee directory read failed");
                })?;
            page_sizes.push(employees.len());
            if employees.is_empty() {
                break;
            }

            for employee in &employees {
                match self
                    .generator
                    .generate(employee.id, period_id, employee.payroll_salary())
                    .await
                {
                    Ok(_) => generated += 1,
                    Err(PayrollError::PayslipAlreadyGenerated { .. }) => skipped += 1,
                    Err(err) => {
                        warn!(
                            run_id = %run_id,
                            period_id,
                            user_id = employee.id,
                            generated,
                            error = %err,
                            "Payroll run aborted"
                        );
                        return Err(err);
                    }
                }
            }

            offset += employees.len();
        }

        let processed = self.periods.mark_processed(period_id, Utc::now()).await?;
        let processed_at = processed.processed_at.unwrap_or_else(Utc::now);

        info!(
            run_id = %run_id,
            period_id,
            generated,
            skipped,
            pages = page_sizes.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Payroll run completed"
        );

        Ok(RunReport {
            run_id,
            period_id,
            page_sizes,
            generated,
            skipped,
            processed_at,
        })
    }
}
