//! Error types for the Payroll Run Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can surface. Each variant belongs to one
//! [`ErrorKind`], which callers use to decide how to react (reject the input,
//! report a missing entity, report a conflict, or retry later).

use chrono::NaiveDate;
use thiserror::Error;

use crate::cache::CacheError;

/// The coarse category of a [`PayrollError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input, including periods without workdays.
    Validation,
    /// A referenced period, payslip or record does not exist.
    NotFound,
    /// The operation collides with existing state (duplicates, locks, processed periods).
    Conflict,
    /// A store or cache collaborator failed.
    Dependency,
    /// Configuration could not be loaded.
    Config,
}

/// The main error type for the Payroll Run Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{ErrorKind, PayrollError};
///
/// let error = PayrollError::PeriodAlreadyProcessed { period_id: 7 };
/// assert_eq!(error.to_string(), "Payroll period 7 is already processed");
/// assert_eq!(error.kind(), ErrorKind::Conflict);
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// An input field was missing or out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The period contains no Monday to Friday dates, so no daily rate exists.
    #[error("Payroll period {period_id} ({start_date} to {end_date}) has no workdays")]
    NoWorkdays {
        /// The period being processed.
        period_id: u64,
        /// First day of the period.
        start_date: NaiveDate,
        /// Last day of the period.
        end_date: NaiveDate,
    },

    /// The payroll period does not exist.
    #[error("Payroll period {period_id} not found")]
    PeriodNotFound {
        /// The requested period.
        period_id: u64,
    },

    /// No payslip exists for the user in the period.
    #[error("Payslip not found for user {user_id} in period {period_id}")]
    PayslipNotFound {
        /// The employee.
        user_id: u64,
        /// The period.
        period_id: u64,
    },

    /// An activity record (attendance, overtime, reimbursement) does not exist.
    #[error("{kind} record {id} not found")]
    RecordNotFound {
        /// The record kind, e.g. "overtime".
        kind: String,
        /// The record id (or user id for per-day lookups).
        id: u64,
    },

    /// A payslip already exists for the user in the period.
    #[error("Payslip already generated for user {user_id} in period {period_id}")]
    PayslipAlreadyGenerated {
        /// The employee.
        user_id: u64,
        /// The period.
        period_id: u64,
    },

    /// The period has already been processed and is immutable.
    #[error("Payroll period {period_id} is already processed")]
    PeriodAlreadyProcessed {
        /// The period.
        period_id: u64,
    },

    /// Another payroll run for the same period has not finished yet.
    #[error("Payroll run for period {period_id} is already in progress")]
    RunInProgress {
        /// The period.
        period_id: u64,
    },

    /// The date falls inside a processed payroll period.
    #[error("Date {date} falls inside a processed payroll period")]
    DateLocked {
        /// The locked date.
        date: NaiveDate,
    },

    /// A per-day record already exists for the user.
    #[error("{kind} already exists for user {user_id} on {date}")]
    DuplicateRecord {
        /// The record kind, e.g. "attendance".
        kind: String,
        /// The employee.
        user_id: u64,
        /// The day.
        date: NaiveDate,
    },

    /// The authoritative store failed or returned something unexpected.
    #[error("Store error: {message}")]
    Store {
        /// A description of the failure.
        message: String,
    },

    /// The cache failed. Services recover from this locally.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl PayrollError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollError::InvalidInput { .. } | PayrollError::NoWorkdays { .. } => {
                ErrorKind::Validation
            }
            PayrollError::PeriodNotFound { .. }
            | PayrollError::PayslipNotFound { .. }
            | PayrollError::RecordNotFound { .. } => ErrorKind::NotFound,
            PayrollError::PayslipAlreadyGenerated { .. }
            | PayrollError::PeriodAlreadyProcessed { .. }
            | PayrollError::RunInProgress { .. }
            | PayrollError::DateLocked { .. }
            | PayrollError::DuplicateRecord { .. } => ErrorKind::Conflict,
            PayrollError::Store { .. } | PayrollError::Cache(_) => ErrorKind::Dependency,
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
        }
    }

    /// Shorthand for an [`PayrollError::InvalidInput`] error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        PayrollError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PayrollError::Store`] error.
    pub fn store(message: impl Into<String>) -> Self {
        PayrollError::Store {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = PayrollError::invalid("monthly_salary", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid value for 'monthly_salary': must be greater than zero"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_no_workdays_is_validation() {
        let error = PayrollError::NoWorkdays {
            period_id: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll period 3 (2024-01-06 to 2024-01-07) has no workdays"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_not_found_variants() {
        assert_eq!(
            PayrollError::PeriodNotFound { period_id: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            PayrollError::PayslipNotFound {
                user_id: 1,
                period_id: 2
            }
            .kind(),
            ErrorKind::NotFound
        );
        let error = PayrollError::RecordNotFound {
            kind: "overtime".to_string(),
            id: 9,
        };
        assert_eq!(error.to_string(), "overtime record 9 not found");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_conflict_variants() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let errors = [
            PayrollError::PayslipAlreadyGenerated {
                user_id: 1,
                period_id: 2,
            },
            PayrollError::PeriodAlreadyProcessed { period_id: 2 },
            PayrollError::RunInProgress { period_id: 2 },
            PayrollError::DateLocked { date },
            PayrollError::DuplicateRecord {
                kind: "overtime".to_string(),
                user_id: 1,
                date,
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), ErrorKind::Conflict, "{error}");
        }
    }

    #[test]
    fn test_date_locked_displays_date() {
        let error = PayrollError::DateLocked {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Date 2024-01-15 falls inside a processed payroll period"
        );
    }

    #[test]
    fn test_dependency_variants() {
        assert_eq!(PayrollError::store("db down").kind(), ErrorKind::Dependency);
        let error: PayrollError = CacheError::Unavailable.into();
        assert_eq!(error.kind(), ErrorKind::Dependency);
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> PayrollResult<()> {
            Err(PayrollError::PeriodNotFound { period_id: 4 })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(PayrollError::PeriodNotFound { period_id: 4 })
        ));
    }
}
