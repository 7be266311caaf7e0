//! Shift cycle calculation.
//!
//! Every crew follows the same 4-day rotation (day shift, night shift,
//! rest day, day off), offset by its crew number. The phase of any crew on
//! any date is derived from the number of days since a fixed epoch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Crew;

/// Length of one scheduled shift in hours.
pub const SHIFT_LENGTH_HOURS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Number of phases in one rotation.
const CYCLE_LENGTH: i64 = 4;

/// The schedule classification of one crew on one date.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::ShiftPhase;
///
/// assert!(ShiftPhase::Night.is_work_day());
/// assert!(!ShiftPhase::Rest.is_work_day());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPhase {
    /// Primary shift (12h day shift).
    Day,
    /// Secondary shift (12h night shift).
    Night,
    /// Rest day after the night shift.
    Rest,
    /// Day off.
    Off,
}

impl ShiftPhase {
    /// The rotation in order, starting with crew 1 on the epoch.
    pub const CYCLE: [ShiftPhase; 4] = [
        ShiftPhase::Day,
        ShiftPhase::Night,
        ShiftPhase::Rest,
        ShiftPhase::Off,
    ];

    /// Returns true for day and night shifts.
    pub fn is_work_day(self) -> bool {
        matches!(self, ShiftPhase::Day | ShiftPhase::Night)
    }

    /// Returns the hours the schedule plans for this phase.
    pub fn planned_hours(self) -> Decimal {
        if self.is_work_day() {
            SHIFT_LENGTH_HOURS
        } else {
            Decimal::ZERO
        }
    }

    /// Returns a human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ShiftPhase::Day => "Day shift",
            ShiftPhase::Night => "Night shift",
            ShiftPhase::Rest => "Rest day",
            ShiftPhase::Off => "Day off",
        }
    }

    /// Returns the symbol shown next to the label.
    pub fn symbol(self) -> &'static str {
        match self {
            ShiftPhase::Day => "🌞",
            ShiftPhase::Night => "🌙",
            ShiftPhase::Rest => "😴",
            ShiftPhase::Off => "🏠",
        }
    }
}

impl std::fmt::Display for ShiftPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The rotation anchored at a specific epoch.
///
/// The epoch is the date on which crew 1 works its day shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCycle {
    /// Day-index 0 of the rotation for crew 1.
    pub epoch: NaiveDate,
}

impl ShiftCycle {
    /// The epoch the shift pattern has used since it was introduced.
    pub const DEFAULT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 10, 1) {
        Some(date) => date,
        None => panic!("invalid default epoch"),
    };

    /// Creates a cycle anchored at `epoch`.
    pub fn new(epoch: NaiveDate) -> Self {
        Self { epoch }
    }

    /// Returns the phase of `crew` on `date`.
    ///
    /// Dates before the epoch extend the rotation backwards: the modulo is
    /// Euclidean so the index is always in `0..4`.
    pub fn phase(&self, crew: Crew, date: NaiveDate) -> ShiftPhase {
        let offset = (date - self.epoch).num_days();
        let index = (offset + crew.cycle_offset()).rem_euclid(CYCLE_LENGTH);
        // rem_euclid with a positive modulus is always in 0..CYCLE_LENGTH
        ShiftPhase::CYCLE[index as usize]
    }
}

impl Default for ShiftCycle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPOCH)
    }
}

/// Returns the phase of `crew` on `date` using the default epoch.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::{phase, ShiftPhase};
/// use shift_ledger::models::Crew;
/// use chrono::NaiveDate;
///
/// let epoch = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
/// assert_eq!(phase(Crew::One, epoch), ShiftPhase::Day);
/// assert_eq!(phase(Crew::Two, epoch), ShiftPhase::Night);
///
/// // One day before the epoch crew 1 was off
/// let before = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
/// assert_eq!(phase(Crew::One, before), ShiftPhase::Off);
/// ```
pub fn phase(crew: Crew, date: NaiveDate) -> ShiftPhase {
    ShiftCycle::default().phase(crew, date)
}
