//! Daily record model and related types.
//!
//! A daily record is what actually happened on one date for one employee:
//! a worked shift, a reinforcement shift, or one of three absence kinds.
//! At most one record exists per (employee, date).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// What a daily record represents.
///
/// The serialized form doubles as the storage code.
///
/// # Example
///
/// ```
/// use shift_ledger::models::RecordKind;
///
/// let kind: RecordKind = "reinforce".parse().unwrap();
/// assert_eq!(kind, RecordKind::Reinforcement);
/// assert!(kind.is_shift());
/// assert!("holiday".parse::<RecordKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// An ordinary scheduled shift.
    Work,
    /// An extra shift worked outside the schedule.
    #[serde(rename = "reinforce")]
    Reinforcement,
    /// Paid vacation day (absence type 1).
    Vacation,
    /// Sick day (absence type 2).
    Sick,
    /// Unpaid day off (absence type 3).
    Unpaid,
}

impl RecordKind {
    /// All record kinds in display order.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Work,
        RecordKind::Reinforcement,
        RecordKind::Vacation,
        RecordKind::Sick,
        RecordKind::Unpaid,
    ];

    /// Returns the stable storage code.
    pub fn code(self) -> &'static str {
        match self {
            RecordKind::Work => "work",
            RecordKind::Reinforcement => "reinforce",
            RecordKind::Vacation => "vacation",
            RecordKind::Sick => "sick",
            RecordKind::Unpaid => "unpaid",
        }
    }

    /// Returns a human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Work => "Work shift",
            RecordKind::Reinforcement => "Reinforcement",
            RecordKind::Vacation => "Vacation",
            RecordKind::Sick => "Sick leave",
            RecordKind::Unpaid => "Unpaid leave",
        }
    }

    /// Returns the symbol shown next to the label.
    pub fn symbol(self) -> &'static str {
        match self {
            RecordKind::Work => "✅",
            RecordKind::Reinforcement => "⚡",
            RecordKind::Vacation => "🏖",
            RecordKind::Sick => "🤒",
            RecordKind::Unpaid => "🕐",
        }
    }

    /// Returns true for kinds whose hours count as worked time.
    pub fn is_shift(self) -> bool {
        matches!(self, RecordKind::Work | RecordKind::Reinforcement)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecordKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| EngineError::DataIntegrity {
                message: format!("unknown record kind '{}'", s),
            })
    }
}

/// What was recorded for one employee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Store-assigned identifier, used for deletion.
    pub id: i64,
    /// The employee the record belongs to.
    pub employee_id: i64,
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// What the record represents.
    pub kind: RecordKind,
    /// Hours worked; zero for absence kinds.
    pub hours: Decimal,
}

impl DailyRecord {
    /// Returns the hours that count as worked time.
    ///
    /// Absence kinds always contribute zero, whatever was stored.
    pub fn worked_hours(&self) -> Decimal {
        if self.kind.is_shift() {
            self.hours
        } else {
            Decimal::ZERO
        }
    }
}
