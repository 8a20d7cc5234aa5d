//! Engine wiring.
//!
//! [`PayrollEngine`] builds every service from a [`PayrollConfig`] and a
//! [`Collaborators`] bundle of injected stores. Nothing is global: two
//! engines built from different collaborators are fully independent.

use std::sync::Arc;

use tracing::info;

use crate::activity::{AttendanceService, OvertimeService, ReimbursementService};
use crate::cache::{Cache, CacheInvalidator, InMemoryCache};
use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::payroll::{
    PayrollPeriodService, PayrollRunner, PayslipGenerator, PayslipService, PeriodLockGuard,
};
use crate::store::memory::{
    InMemoryAttendanceStore, InMemoryEmployeeDirectory, InMemoryOvertimeStore,
    InMemoryPayslipStore, InMemoryPeriodStore, InMemoryReimbursementStore,
};
use crate::store::{
    AttendanceSource, AttendanceStore, EmployeeDirectory, OvertimeSource, OvertimeStore,
    PayslipStore, PeriodStore, ReimbursementSource, ReimbursementStore,
};

/// The stores and cache an engine runs against.
#[derive(Clone)]
pub struct Collaborators {
    /// Payroll periods.
    pub periods: Arc<dyn PeriodStore>,
    /// Payslips.
    pub payslips: Arc<dyn PayslipStore>,
    /// Attendance records.
    pub attendance: Arc<dyn AttendanceStore>,
    /// Overtime claims.
    pub overtime: Arc<dyn OvertimeStore>,
    /// Reimbursement requests.
    pub reimbursements: Arc<dyn ReimbursementStore>,
    /// The employee directory.
    pub directory: Arc<dyn EmployeeDirectory>,
    /// The read-through cache backend.
    pub cache: Arc<dyn Cache>,
}

/// Concrete handles to the in-memory collaborators, for seeding and inspection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCollaborators {
    /// Payroll periods.
    pub periods: InMemoryPeriodStore,
    /// Payslips.
    pub payslips: InMemoryPayslipStore,
    /// Attendance records.
    pub attendance: InMemoryAttendanceStore,
    /// Overtime claims.
    pub overtime: InMemoryOvertimeStore,
    /// Reimbursement requests.
    pub reimbursements: InMemoryReimbursementStore,
    /// The employee directory.
    pub directory: InMemoryEmployeeDirectory,
    /// The cache backend.
    pub cache: InMemoryCache,
}

impl InMemoryCollaborators {
    /// Creates empty stores and an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares these stores as trait objects.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            periods: Arc::new(self.periods.clone()),
            payslips: Arc::new(self.payslips.clone()),
            attendance: Arc::new(self.attendance.clone()),
            overtime: Arc::new(self.overtime.clone()),
            reimbursements: Arc::new(self.reimbursements.clone()),
            directory: Arc::new(self.directory.clone()),
            cache: Arc::new(self.cache.clone()),
        }
    }
}

/// Every payroll service, wired to one set of collaborators.
#[derive(Clone)]
pub struct PayrollEngine {
    config: PayrollConfig,
    lock_guard: PeriodLockGuard,
    generator: PayslipGenerator,
    runner: PayrollRunner,
    periods: PayrollPeriodService,
    payslips: PayslipService,
    overtime: OvertimeService,
    reimbursements: ReimbursementService,
    attendance: AttendanceService,
}

impl PayrollEngine {
    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the configuration fails validation.
    pub fn new(config: PayrollConfig, collaborators: Collaborators) -> PayrollResult<Self> {
        config
            .validate()
            .map_err(|message| PayrollError::invalid("config", message))?;

        let Collaborators {
            periods,
            payslips,
            attendance,
            overtime,
            reimbursements,
            directory,
            cache,
        } = collaborators;

        let cache = CacheInvalidator::new(cache, config.cache.ttl());
        let lock_guard = PeriodLockGuard::new(periods.clone());

        let attendance_source: Arc<dyn AttendanceSource> = attendance.clone();
        let overtime_source: Arc<dyn OvertimeSource> = overtime.clone();
        let reimbursement_source: Arc<dyn ReimbursementSource> = reimbursements.clone();
        let generator = PayslipGenerator::new(
            periods.clone(),
            payslips.clone(),
            attendance_source,
            overtime_source,
            reimbursement_source,
            config.overtime.clone(),
        );
        let runner = PayrollRunner::new(
            periods.clone(),
            directory.clone(),
            generator.clone(),
            lock_guard.clone(),
            config.chunk_size,
        );

        info!(
            chunk_size = config.chunk_size,
            cache_ttl_seconds = config.cache.ttl_seconds,
            "Payroll engine initialized"
        );

        Ok(Self {
            periods: PayrollPeriodService::new(
                periods,
                cache.clone(),
                lock_guard.clone(),
                runner.clone(),
            ),
            payslips: PayslipService::new(payslips, directory, config.chunk_size),
            overtime: OvertimeService::new(
                overtime,
                lock_guard.clone(),
                cache.clone(),
                config.overtime.max_hours_per_day,
            ),
            reimbursements: ReimbursementService::new(reimbursements, lock_guard.clone(), cache),
            attendance: AttendanceService::new(attendance),
            config,
            lock_guard,
            generator,
            runner,
        })
    }

    /// Builds an engine over fresh in-memory collaborators and returns their handles.
    pub fn in_memory(config: PayrollConfig) -> PayrollResult<(Self, InMemoryCollaborators)> {
        let handles = InMemoryCollaborators::new();
        let engine = Self::new(config, handles.collaborators())?;
        Ok((engine, handles))
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Period lock checks.
    pub fn lock_guard(&self) -> &PeriodLockGuard {
        &self.lock_guard
    }

    /// Single-payslip generation.
    pub fn generator(&self) -> &PayslipGenerator {
        &self.generator
    }

    /// Payroll runs, without cache maintenance.
    pub fn runner(&self) -> &PayrollRunner {
        &self.runner
    }

    /// Period administration and cached payroll runs.
    pub fn periods(&self) -> &PayrollPeriodService {
        &self.periods
    }

    /// Payslip queries.
    pub fn payslips(&self) -> &PayslipService {
        &self.payslips
    }

    /// Overtime claims.
    pub fn overtime(&self) -> &OvertimeService {
        &self.overtime
    }

    /// Reimbursement requests.
    pub fn reimbursements(&self) -> &ReimbursementService {
        &self.reimbursements
    }

    /// Attendance.
    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }
}
