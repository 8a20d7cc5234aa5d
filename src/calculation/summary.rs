//! Period-level aggregation of payslips.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{Payslip, PayslipSummary, PayslipSummaryItem};

use super::rounding::round_money;

/// Builds the take-home summary of a period.
///
/// Items are ordered by user id and carry the name found in `names`, if any.
/// The total is the sum of every payslip's `take_home_pay`, rounded once more
/// at the aggregate level.
pub fn summarize_payslips(
    payroll_period_id: u64,
    payslips: &[Payslip],
    names: &HashMap<u64, String>,
) -> PayslipSummary {
    let mut items: Vec<PayslipSummaryItem> = payslips
        .iter()
        .map(|payslip| PayslipSummaryItem {
            user_id: payslip.user_id,
            name: names.get(&payslip.user_id).cloned(),
            take_home_pay: payslip.take_home_pay,
        })
        .collect();
    items.sort_by_key(|item| item.user_id);

    let total: Decimal = items.iter().map(|item| item.take_home_pay).sum();

    PayslipSummary {
        payroll_period_id,
        items,
        total_take_home_pay: round_money(total),
    }
}
