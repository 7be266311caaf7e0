//! Absence period model.
//!
//! This module contains the [`AbsencePeriod`] type, a coarse-grained ledger of
//! multi-day vacations and sick leaves kept alongside the daily records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The kind of a booked absence period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// A vacation (absence type 1).
    Vacation,
    /// A sick leave (absence type 2).
    Sick,
}

impl PeriodKind {
    /// Returns the stable storage code.
    pub fn code(self) -> &'static str {
        match self {
            PeriodKind::Vacation => "vacation",
            PeriodKind::Sick => "sick",
        }
    }

    /// Returns a human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Vacation => "Vacation",
            PeriodKind::Sick => "Sick leave",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PeriodKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacation" => Ok(PeriodKind::Vacation),
            "sick" => Ok(PeriodKind::Sick),
            other => Err(EngineError::DataIntegrity {
                message: format!("unknown absence period kind '{}'", other),
            }),
        }
    }
}

/// A booked absence covering `start..=end`.
///
/// Periods are not expanded into daily records, so the monthly
/// reconciliation does not see them. Only daily records feed the pay estimate.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{AbsencePeriod, PeriodKind};
/// use chrono::NaiveDate;
///
/// let period = AbsencePeriod {
///     id: 1,
///     employee_id: 1001,
///     kind: PeriodKind::Vacation,
///     start: NaiveDate::from_ymd_opt(2024, 10, 28).unwrap(),
///     end: NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
/// };
///
/// assert_eq!(period.days(), 7);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsencePeriod {
    /// Store-assigned identifier, used for deletion.
    pub id: i64,
    /// The employee the period belongs to.
    pub employee_id: i64,
    /// What kind of absence this is.
    pub kind: PeriodKind,
    /// First day of the absence (inclusive).
    pub start: NaiveDate,
    /// Last day of the absence (inclusive).
    pub end: NaiveDate,
}

impl AbsencePeriod {
    /// Returns the number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
