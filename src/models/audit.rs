//! Audit trail for payslip calculations.
//!
//! Every rule applied while computing a payslip records an [`AuditStep`]
//! with its inputs, output and a human-readable explanation.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "daily_salary".to_string(),
///     rule_name: "Daily Salary".to_string(),
///     input: serde_json::json!({"monthly_salary": "3000000", "workdays": 20}),
///     output: serde_json::json!({"daily_salary": "150000.00"}),
///     reasoning: "3000000 / 20 workdays = 150000.00".to_string(),
/// };
/// assert_eq!(step.rule_id, "daily_salary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
