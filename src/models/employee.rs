//! Employee model.
//!
//! Employees are owned by an external directory; the payroll engine only
//! reads their id and monthly salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee listed by the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Monthly salary; a payslip can only be generated when this is set and positive.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
}

impl Employee {
    /// Creates an employee with a monthly salary.
    pub fn new(id: u64, name: impl Into<String>, monthly_salary: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            monthly_salary: Some(monthly_salary),
        }
    }

    /// Returns the salary used for payroll, treating a missing salary as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee { id: 1, name: "Ana".to_string(), monthly_salary: None };
    /// assert_eq!(employee.payroll_salary(), Decimal::ZERO);
    /// ```
    pub fn payroll_salary(&self) -> Decimal {
        self.monthly_salary.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_employee_with_salary() {
        let json = r#"{
            "id": 7,
            "name": "Budi",
            "monthly_salary": "4400000"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 7);
        assert_eq!(employee.monthly_salary, Some(dec!(4400000)));
        assert_eq!(employee.payroll_salary(), dec!(4400000));
    }

    #[test]
    fn test_deserialize_employee_without_salary() {
        let json = r#"{ "id": 8, "name": "Citra" }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.monthly_salary.is_none());
        assert_eq!(employee.payroll_salary(), Decimal::ZERO);
    }
}
