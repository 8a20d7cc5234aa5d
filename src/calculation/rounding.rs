//! Monetary rounding.
//!
//! Payroll applies [`round_money`] at several intermediate steps (daily
//! salary, overtime pay, take-home total), not only at the end. The order is
//! observable: rounding the daily rate before multiplying by attended days
//! gives a different total than rounding the grand total once.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on every currency amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount half-up to two decimal places.
///
/// Midpoints round away from zero and the result always carries exactly two
/// decimal places, so `150000` becomes `150000.00`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(2.675)), dec!(2.68));
/// assert_eq!(round_money(dec!(2.674)), dec!(2.67));
/// assert_eq!(round_money(dec!(150000)).to_string(), "150000.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
