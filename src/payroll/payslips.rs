//! Read access to generated payslips and period summaries.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::calculation::summarize_payslips;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Payslip, PayslipSummary};
use crate::store::{EmployeeDirectoryRef, PayslipStoreRef};

/// Read access to generated payslips.
#[derive(Clone)]
pub struct PayslipService {
    payslips: PayslipStoreRef,
    directory: EmployeeDirectoryRef,
    chunk_size: usize,
}

impl PayslipService {
    /// Creates the service. Names are read from `directory`, `chunk_size` at a time.
    pub fn new(payslips: PayslipStoreRef, directory: EmployeeDirectoryRef, chunk_size: usize) -> Self {
        Self {
            payslips,
            directory,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Returns the user's payslip for the period.
    pub async fn get_payslip(&self, user_id: u64, period_id: u64) -> PayrollResult<Payslip> {
        self.payslips
            .get_by_user_and_period(user_id, period_id)
            .await?
            .ok_or(PayrollError::PayslipNotFound { user_id, period_id })
    }

    /// Summarizes take-home pay over every payslip of the period.
    ///
    /// Each item carries the employee's name from the directory. A period
    /// without payslips yields an empty summary with a zero total.
    pub async fn get_summary(&self, period_id: u64) -> PayrollResult<PayslipSummary> {
        let payslips = self.payslips.get_by_period(period_id).await?;
        let names = self.names_of(&payslips).await?;
        debug!(
            period_id,
            payslips = payslips.len(),
            named = names.len(),
            "Summarizing payslips"
        );
        Ok(summarize_payslips(period_id, &payslips, &names))
    }

    async fn names_of(&self, payslips: &[Payslip]) -> PayrollResult<HashMap<u64, String>> {
        let mut wanted: HashSet<u64> = payslips.iter().map(|payslip| payslip.user_id).collect();
        let mut names = HashMap::with_capacity(wanted.len());
        let mut offset = 0;

        while !wanted.is_empty() {
            let employees = self.directory.list_employees(offset, self.chunk_size).await?;
            if employees.is_empty() {
                break;
            }
            offset += employees.len();
            for employee in employees {
                if wanted.remove(&employee.id) {
                    names.insert(employee.id, employee.name);
                }
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, NewPayslip};
    use crate::store::PayslipStore;
    use crate::store::memory::{InMemoryEmployeeDirectory, InMemoryPayslipStore};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn payslip(user_id: u64, take_home_pay: Decimal) -> NewPayslip {
        NewPayslip {
            user_id,
            payroll_period_id: 1,
            generated_at: Utc::now(),
            attendance_days: 0,
            attendance_earnings: dec!(0.00),
            overtime_hours: Decimal::ZERO,
            overtime_earnings: dec!(0.00),
            total_reimbursement: Decimal::ZERO,
            take_home_pay,
        }
    }

    fn service(store: InMemoryPayslipStore, directory: &InMemoryEmployeeDirectory) -> PayslipService {
        PayslipService::new(Arc::new(store), Arc::new(directory.clone()), 2)
    }

    #[tokio::test]
    async fn test_get_payslip_not_found() {
        let service = service(InMemoryPayslipStore::new(), &InMemoryEmployeeDirectory::new());
        assert!(matches!(
            service.get_payslip(1, 1).await,
            Err(PayrollError::PayslipNotFound {
                user_id: 1,
                period_id: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_summary_totals_every_payslip() {
        let store = InMemoryPayslipStore::new();
        store.create(payslip(2, dec!(100.10))).await.unwrap();
        store.create(payslip(1, dec!(200.25))).await.unwrap();
        let service = service(store, &InMemoryEmployeeDirectory::new());

        let summary = service.get_summary(1).await.unwrap();
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.items[0].user_id, 1);
        assert_eq!(summary.total_take_home_pay, dec!(300.35));

        assert_eq!(service.get_payslip(2, 1).await.unwrap().take_home_pay, dec!(100.10));
    }

    #[tokio::test]
    async fn test_summary_joins_names_across_directory_pages() {
        let directory = InMemoryEmployeeDirectory::new();
        for (id, name) in [(1, "Ana"), (2, "Budi"), (3, "Citra"), (4, "Dewi"), (5, "Eko")] {
            directory.insert(Employee::new(id, name, dec!(1000))).await;
        }
        let store = InMemoryPayslipStore::new();
        store.create(payslip(3, dec!(10))).await.unwrap();
        store.create(payslip(1, dec!(10))).await.unwrap();
        store.create(payslip(9, dec!(10))).await.unwrap();
        let service = service(store, &directory);

        let summary = service.get_summary(1).await.unwrap();
        let names: Vec<Option<&str>> = summary.items.iter().map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec![Some("Ana"), Some("Citra"), None]);
    }

    #[tokio::test]
    async fn test_summary_of_empty_period() {
        let directory = InMemoryEmployeeDirectory::new();
        let service = service(InMemoryPayslipStore::new(), &directory);
        let summary = service.get_summary(9).await.unwrap();
        assert!(summary.items.is_empty());
        assert_eq!(summary.total_take_home_pay, Decimal::ZERO);
        assert!(directory.requests().await.is_empty());
    }
}
