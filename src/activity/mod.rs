//! Activity records feeding the payroll: attendance, overtime claims and
//! reimbursement requests.
//!
//! Overtime and reimbursement writes are refused for dates inside a
//! processed payroll period.

mod attendance;
mod overtime;
mod reimbursement;

pub use attendance::AttendanceService;
pub use overtime::{OVERTIME_CACHE_KIND, OvertimeService};
pub use reimbursement::{REIMBURSEMENT_CACHE_KIND, ReimbursementService};
