//! Per-employee payslip generation for one payroll period.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculation::{PayslipInputs, calculate_payslip, count_workdays};
use crate::config::OvertimeConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{NewPayslip, Payslip};
use crate::store::{
    AttendanceSource, OvertimeSource, PayslipStoreRef, PeriodStoreRef, ReimbursementSource,
};

/// Computes and persists exactly one payslip for one employee and period.
#[derive(Clone)]
pub struct PayslipGenerator {
    periods: PeriodStoreRef,
    payslips: PayslipStoreRef,
    attendance: Arc<dyn AttendanceSource>,
    overtime: Arc<dyn OvertimeSource>,
    reimbursements: Arc<dyn ReimbursementSource>,
    overtime_config: OvertimeConfig,
}

impl PayslipGenerator {
    /// Creates a generator over the given collaborators.
    pub fn new(
        periods: PeriodStoreRef,
        payslips: PayslipStoreRef,
        attendance: Arc<dyn AttendanceSource>,
        overtime: Arc<dyn OvertimeSource>,
        reimbursements: Arc<dyn ReimbursementSource>,
        overtime_config: OvertimeConfig,
    ) -> Self {
        Self {
            periods,
            payslips,
            attendance,
            overtime,
            reimbursements,
            overtime_config,
        }
    }

    /// Generates the payslip of `user_id` for `period_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `monthly_salary` is not positive.
    /// - `PayslipAlreadyGenerated` if the pair already has a payslip, either
    ///   before computing or when a concurrent insert wins the race.
    /// - `PeriodNotFound` if the period does not exist.
    /// - `NoWorkdays` if the period has no Monday to Friday dates.
    /// - Any collaborator error, unchanged.
    pub async fn generate(
        &self,
        user_id: u64,
        period_id: u64,
        monthly_salary: Decimal,
    ) -> PayrollResult<Payslip> {
        let start_time = Instant::now();

        if monthly_salary <= Decimal::ZERO {
            return Err(PayrollError::invalid(
                "monthly_salary",
                format!("user {user_id} has no positive monthly salary"),
            ));
        }

        if self.payslips.exists(user_id, period_id).await? {
            return Err(PayrollError::PayslipAlreadyGenerated { user_id, period_id });
        }

        let period = self
            .periods
            .find_by_id(period_id)
            .await?
            .ok_or(PayrollError::PeriodNotFound { period_id })?;

        let workdays = count_workdays(period.start_date, period.end_date);
        if workdays == 0 {
            return Err(PayrollError::NoWorkdays {
                period_id,
                start_date: period.start_date,
                end_date: period.end_date,
            });
        }

        let (attended_days, overtime_hours, reimbursements) = tokio::try_join!(
            self.attendance
                .count_working_days(user_id, period.start_date, period.end_date),
            self.overtime
                .count_overtime_hours(user_id, period.start_date, period.end_date),
            self.reimbursements
                .sum_reimbursement(user_id, period.start_date, period.end_date),
        )?;

        let inputs = PayslipInputs {
            monthly_salary,
            workdays,
            attended_days,
            overtime_hours,
            reimbursements,
        };
        let calculation = calculate_payslip(&inputs, &self.overtime_config)?;

        for step in &calculation.audit_steps {
            debug!(
                user_id,
                period_id,
                step = step.step_number,
                rule = %step.rule_id,
                reasoning = %step.reasoning,
                "Payslip rule applied"
            );
        }

        let payslip = self
            .payslips
            .create(NewPayslip {
                user_id,
                payroll_period_id: period_id,
                generated_at: Utc::now(),
                attendance_days: attended_days,
                attendance_earnings: calculation.attendance_earnings,
                overtime_hours,
                overtime_earnings: calculation.overtime_pay,
                total_reimbursement: reimbursements,
                take_home_pay: calculation.take_home_pay,
            })
            .await?;

        info!(
            user_id,
            period_id,
            payslip_id = payslip.id,
            take_home_pay = %payslip.take_home_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Payslip generated"
        );

        Ok(payslip)
    }
}
