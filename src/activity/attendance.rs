//! Weekday check-in and check-out.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::calculation::is_weekend;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Attendance, validate_range};
use crate::store::AttendanceStore;

/// Daily check-in and check-out.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
}

fn workday_of(at: NaiveDateTime) -> PayrollResult<NaiveDate> {
    let date = at.date();
    if is_weekend(date) {
        return Err(PayrollError::invalid(
            "date",
            format!("{date} is a weekend; attendance is only recorded Monday to Friday"),
        ));
    }
    Ok(date)
}

impl AttendanceService {
    /// Creates the service.
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    /// Checks the user in at `at`; at most once per day.
    pub async fn check_in(&self, user_id: u64, at: NaiveDateTime) -> PayrollResult<Attendance> {
        let date = workday_of(at)?;
        let attendance = self.store.check_in(user_id, date, at).await?;
        info!(user_id, date = %date, "Checked in");
        Ok(attendance)
    }

    /// Checks the user out at `at`, completing the day.
    pub async fn check_out(&self, user_id: u64, at: NaiveDateTime) -> PayrollResult<Attendance> {
        let date = workday_of(at)?;
        let attendance = self.store.check_out(user_id, date, at).await?;
        info!(user_id, date = %date, "Checked out");
        Ok(attendance)
    }

    /// Lists the user's attendance in `[start, end]`, oldest first.
    pub async fn list(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Vec<Attendance>> {
        validate_range(start, end)?;
        self.store.list(user_id, start, end).await
    }
}
