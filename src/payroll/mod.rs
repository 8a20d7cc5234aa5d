//! Payroll processing: period locking, payslip generation, payroll runs,
//! period administration and payslip queries.

mod generator;
mod lock_guard;
mod payslips;
mod period_service;
mod runner;

pub use generator::PayslipGenerator;
pub use lock_guard::{ClosingGuard, PeriodLockGuard, WriteLease};
pub use payslips::PayslipService;
pub use period_service::{PERIOD_CACHE_KIND, PayrollPeriodService};
pub use runner::{PayrollRunner, RunReport};
