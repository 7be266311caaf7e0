//! Month reconciliation output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Crew;

/// Planned versus recorded totals for one employee over one calendar month.
///
/// Produced by [`crate::calculation::reconcile`] and consumed by
/// [`crate::calculation::estimate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStats {
    /// The employee the totals belong to.
    pub employee_id: i64,
    /// The crew used to derive the planned schedule.
    pub crew: Crew,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1 to 12).
    pub month: u32,
    /// First day of the month.
    pub first_day: NaiveDate,
    /// Last day of the month.
    pub last_day: NaiveDate,
    /// Days whose phase is a day or night shift.
    pub planned_work_days: u32,
    /// `planned_work_days` times the shift length.
    pub planned_hours: Decimal,
    /// Ordinary shift records with hours above zero.
    pub work_days: u32,
    /// Hours summed over ordinary shift records.
    pub work_hours: Decimal,
    /// Reinforcement records with hours above zero.
    pub reinforcement_days: u32,
    /// Hours summed over reinforcement records.
    pub reinforcement_hours: Decimal,
    /// `work_hours + reinforcement_hours`.
    pub total_worked_hours: Decimal,
    /// Vacation records.
    pub vacation_days: u32,
    /// Sick records.
    pub sick_days: u32,
    /// Unpaid leave records.
    pub unpaid_days: u32,
}

impl MonthStats {
    /// Returns recorded hours minus planned hours.
    ///
    /// Negative when fewer hours were recorded than the schedule implies.
    pub fn hours_delta(&self) -> Decimal {
        self.total_worked_hours - self.planned_hours
    }

    /// Returns the number of absence records of any kind.
    pub fn absence_days(&self) -> u32 {
        self.vacation_days + self.sick_days + self.unpaid_days
    }
}
