//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions behind a payslip: monetary
//! rounding, workday counting, the take-home pay calculation and the
//! period summary.

mod rounding;
mod summary;
mod take_home;
mod workdays;

pub use rounding::{MONEY_SCALE, round_money};
pub use summary::summarize_payslips;
pub use take_home::{PayslipCalculation, PayslipInputs, calculate_payslip};
pub use workdays::{count_workdays, is_weekend};
