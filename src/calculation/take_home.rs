//! Take-home pay calculation.
//!
//! This module turns a period's aggregates (workdays, attended days, overtime
//! hours, reimbursements) into the figures written on a payslip, rounding at
//! each step in a fixed order:
//!
//! 1. `daily_salary = round(monthly_salary / workdays)`
//! 2. `attendance_earnings = daily_salary * attended_days`
//! 3. `overtime_pay = round(overtime_hours * (daily_salary / hours_per_workday) * multiplier)`
//! 4. `take_home_pay = round(attendance_earnings + overtime_pay + reimbursements)`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::OvertimeConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::AuditStep;

use super::rounding::round_money;

/// The aggregates a payslip is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipInputs {
    /// The employee's monthly salary.
    pub monthly_salary: Decimal,
    /// Monday to Friday dates in the period.
    pub workdays: u32,
    /// Days with both a check-in and a check-out.
    pub attended_days: u32,
    /// Approved overtime hours in the period.
    pub overtime_hours: Decimal,
    /// Sum of reimbursements in the period.
    pub reimbursements: Decimal,
}

/// The computed payslip figures, with the audit trail that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipCalculation {
    /// Rounded per-workday salary.
    pub daily_salary: Decimal,
    /// Daily salary multiplied by attended days.
    pub attendance_earnings: Decimal,
    /// Rounded overtime pay.
    pub overtime_pay: Decimal,
    /// Rounded total.
    pub take_home_pay: Decimal,
    /// One step per rule applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes the payslip figures for one employee.
///
/// # Errors
///
/// Returns `InvalidInput` if the monthly salary is not positive or the period
/// has no workdays.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_payslip, PayslipInputs};
/// use payroll_engine::config::OvertimeConfig;
/// use rust_decimal_macros::dec;
///
/// let inputs = PayslipInputs {
///     monthly_salary: dec!(4400000),
///     workdays: 22,
///     attended_days: 20,
///     overtime_hours: dec!(4),
///     reimbursements: dec!(150000),
/// };
///
/// let result = calculate_payslip(&inputs, &OvertimeConfig::default()).unwrap();
/// assert_eq!(result.daily_salary, dec!(200000.00));
/// assert_eq!(result.overtime_pay, dec!(200000.00));
/// assert_eq!(result.take_home_pay, dec!(4350000.00));
/// ```
pub fn calculate_payslip(
    inputs: &PayslipInputs,
    overtime: &OvertimeConfig,
) -> PayrollResult<PayslipCalculation> {
    if inputs.monthly_salary <= Decimal::ZERO {
        return Err(PayrollError::invalid(
            "monthly_salary",
            "must be greater than zero",
        ));
    }
    if inputs.workdays == 0 {
        return Err(PayrollError::invalid(
            "workdays",
            "period must contain at least one workday",
        ));
    }

    let workdays = Decimal::from(inputs.workdays);
    let attended_days = Decimal::from(inputs.attended_days);

    let daily_salary = round_money(inputs.monthly_salary / workdays);
    let attendance_earnings = daily_salary * attended_days;

    let hourly_rate = daily_salary / overtime.hours_per_workday;
    let overtime_pay = round_money(inputs.overtime_hours * hourly_rate * overtime.multiplier);

    let take_home_pay = round_money(attendance_earnings + overtime_pay + inputs.reimbursements);

    let audit_steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "daily_salary".to_string(),
            rule_name: "Daily Salary".to_string(),
            input: serde_json::json!({
                "monthly_salary": inputs.monthly_salary.to_string(),
                "workdays": inputs.workdays
            }),
            output: serde_json::json!({ "daily_salary": daily_salary.to_string() }),
            reasoning: format!(
                "{} / {} workdays rounded half-up to {}",
                inputs.monthly_salary, inputs.workdays, daily_salary
            ),
        },
        AuditStep {
            step_number: 2,
            rule_id: "attendance_earnings".to_string(),
            rule_name: "Attendance Earnings".to_string(),
            input: serde_json::json!({
                "daily_salary": daily_salary.to_string(),
                "attended_days": inputs.attended_days
            }),
            output: serde_json::json!({
                "attendance_earnings": attendance_earnings.to_string()
            }),
            reasoning: format!(
                "{} x {} attended days = {}",
                daily_salary, inputs.attended_days, attendance_earnings
            ),
        },
        AuditStep {
            step_number: 3,
            rule_id: "overtime_pay".to_string(),
            rule_name: "Overtime Pay".to_string(),
            input: serde_json::json!({
                "overtime_hours": inputs.overtime_hours.to_string(),
                "hourly_rate": hourly_rate.normalize().to_string(),
                "multiplier": overtime.multiplier.to_string()
            }),
            output: serde_json::json!({ "overtime_pay": overtime_pay.to_string() }),
            reasoning: format!(
                "{} hours x {} per hour x {} rounded half-up to {}",
                inputs.overtime_hours.normalize(),
                hourly_rate.normalize(),
                overtime.multiplier.normalize(),
                overtime_pay
            ),
        },
        AuditStep {
            step_number: 4,
            rule_id: "take_home_pay".to_string(),
            rule_name: "Take-Home Pay".to_string(),
            input: serde_json::json!({
                "attendance_earnings": attendance_earnings.to_string(),
                "overtime_pay": overtime_pay.to_string(),
                "reimbursements": inputs.reimbursements.to_string()
            }),
            output: serde_json::json!({ "take_home_pay": take_home_pay.to_string() }),
            reasoning: format!(
                "{} + {} + {} rounded half-up to {}",
                attendance_earnings, overtime_pay, inputs.reimbursements, take_home_pay
            ),
        },
    ];

    Ok(PayslipCalculation {
        daily_salary,
        attendance_earnings,
        overtime_pay,
        take_home_pay,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs(monthly_salary: Decimal, workdays: u32, attended_days: u32) -> PayslipInputs {
        PayslipInputs {
            monthly_salary,
            workdays,
            attended_days,
            overtime_hours: Decimal::ZERO,
            reimbursements: Decimal::ZERO,
        }
    }

    #[test]
    fn test_daily_salary_has_no_residual_cents() {
        let result =
            calculate_payslip(&inputs(dec!(3000000), 20, 20), &OvertimeConfig::default()).unwrap();
        assert_eq!(result.daily_salary, dec!(150000.00));
        assert_eq!(result.daily_salary.to_string(), "150000.00");
        assert_eq!(result.take_home_pay, dec!(3000000.00));
    }

    #[test]
    fn test_full_month_example() {
        let inputs = PayslipInputs {
            monthly_salary: dec!(4400000),
            workdays: 22,
            attended_days: 20,
            overtime_hours: dec!(4),
            reimbursements: dec!(150000.00),
        };
        let result = calculate_payslip(&inputs, &OvertimeConfig::default()).unwrap();

        assert_eq!(result.daily_salary, dec!(200000.00));
        assert_eq!(result.attendance_earnings, dec!(4000000.00));
        assert_eq!(result.overtime_pay, dec!(200000.00));
        assert_eq!(result.take_home_pay, dec!(4350000.00));
    }

    #[test]
    fn test_daily_salary_is_rounded_before_multiplying() {
        // 5,000,000 / 23 = 217391.304347... -> 217391.30
        let result =
            calculate_payslip(&inputs(dec!(5000000), 23, 23), &OvertimeConfig::default()).unwrap();
        assert_eq!(result.daily_salary, dec!(217391.30));
        assert_eq!(result.attendance_earnings, dec!(4999999.90));
        assert_eq!(result.take_home_pay, dec!(4999999.90));
    }

    #[test]
    fn test_overtime_pay_uses_rounded_daily_salary() {
        // daily = round(1,000,000 / 21) = 47619.05; hourly = 5952.38125
        // overtime = round(3 * 5952.38125 * 2) = round(35714.2875) = 35714.29
        let mut inputs = inputs(dec!(1000000), 21, 0);
        inputs.overtime_hours = dec!(3);
        let result = calculate_payslip(&inputs, &OvertimeConfig::default()).unwrap();

        assert_eq!(result.daily_salary, dec!(47619.05));
        assert_eq!(result.overtime_pay, dec!(35714.29));
        assert_eq!(result.take_home_pay, dec!(35714.29));
    }

    #[test]
    fn test_no_attendance_no_overtime_only_reimbursements() {
        let mut inputs = inputs(dec!(3000000), 20, 0);
        inputs.reimbursements = dec!(75000.505);
        let result = calculate_payslip(&inputs, &OvertimeConfig::default()).unwrap();

        assert_eq!(result.attendance_earnings, Decimal::ZERO);
        assert_eq!(result.overtime_pay, dec!(0.00));
        assert_eq!(result.take_home_pay, dec!(75000.51));
    }

    #[test]
    fn test_custom_overtime_rules() {
        let config = OvertimeConfig {
            multiplier: dec!(1.5),
            hours_per_workday: dec!(7),
            max_hours_per_day: dec!(3),
        };
        let mut inputs = inputs(dec!(2100000), 21, 0);
        inputs.overtime_hours = dec!(2);
        // daily 100000.00, hourly 14285.714285..., x2 x1.5 = 42857.142857... -> 42857.14
        let result = calculate_payslip(&inputs, &config).unwrap();
        assert_eq!(result.overtime_pay, dec!(42857.14));
    }

    #[test]
    fn test_zero_salary_is_rejected() {
        let result = calculate_payslip(&inputs(Decimal::ZERO, 20, 20), &OvertimeConfig::default());
        assert!(matches!(
            result,
            Err(PayrollError::InvalidInput { ref field, .. }) if field == "monthly_salary"
        ));
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let result = calculate_payslip(&inputs(dec!(-1), 20, 20), &OvertimeConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_workdays_is_rejected() {
        let result = calculate_payslip(&inputs(dec!(3000000), 0, 0), &OvertimeConfig::default());
        assert!(matches!(
            result,
            Err(PayrollError::InvalidInput { ref field, .. }) if field == "workdays"
        ));
    }

    #[test]
    fn test_audit_trail_records_each_rule_in_order() {
        let result =
            calculate_payslip(&inputs(dec!(3000000), 20, 18), &OvertimeConfig::default()).unwrap();
        let rule_ids: Vec<&str> = result
            .audit_steps
            .iter()
            .map(|step| step.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "daily_salary",
                "attendance_earnings",
                "overtime_pay",
                "take_home_pay"
            ]
        );
        assert_eq!(result.audit_steps[0].output["daily_salary"], "150000.00");
        assert_eq!(result.audit_steps[3].step_number, 4);
    }
}
