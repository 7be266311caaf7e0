//! Day and period lookups.
//!
//! Combines the shift cycle with stored records to answer "what is planned
//! and recorded on this date" and "what would this period overlap".

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar::{days_in_range, month_bounds, validate_range};
use super::shift_cycle::{ShiftCycle, ShiftPhase};
use crate::error::EngineResult;
use crate::models::{DailyRecord, Employee};
use crate::store::RecordStore;

/// The planned phase and the stored record of one employee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLookup {
    /// The date looked up.
    pub date: NaiveDate,
    /// The phase the cycle assigns to the employee's crew.
    pub phase: ShiftPhase,
    /// Hours the schedule plans for the phase.
    pub planned_hours: Decimal,
    /// The stored record, if any.
    pub record: Option<DailyRecord>,
}

/// One calendar day in a month listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// The planned phase.
    pub phase: ShiftPhase,
    /// The stored record, if any.
    pub record: Option<DailyRecord>,
}

/// Returns the planned phase and stored record for `date`.
pub fn lookup_day<S>(
    store: &S,
    cycle: &ShiftCycle,
    employee: &Employee,
    date: NaiveDate,
) -> EngineResult<DayLookup>
where
    S: RecordStore + ?Sized,
{
    let phase = cycle.phase(employee.crew, date);
    let record = store.get_record(employee.id, date)?;

    Ok(DayLookup {
        date,
        phase,
        planned_hours: phase.planned_hours(),
        record,
    })
}

/// Returns every record dated within `start..=end`, ascending by date.
///
/// Used before booking an absence period to show what it would cover.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidRange`] when `end < start`.
pub fn check_overlap<S>(
    store: &S,
    employee: &Employee,
    start: NaiveDate,
    end: NaiveDate,
) -> EngineResult<Vec<DailyRecord>>
where
    S: RecordStore + ?Sized,
{
    validate_range(start, end)?;
    store.get_records_in_range(employee.id, start, end)
}

/// Lists every day of a month with its phase and stored record.
pub fn month_schedule<S>(
    store: &S,
    cycle: &ShiftCycle,
    employee: &Employee,
    year: i32,
    month: u32,
) -> EngineResult<Vec<ScheduleDay>>
where
    S: RecordStore + ?Sized,
{
    let (first, last) = month_bounds(year, month)?;
    let mut records = store
        .get_records_in_range(employee.id, first, last)?
        .into_iter()
        .peekable();

    let mut days = Vec::with_capacity(31);
    for date in days_in_range(first, last) {
        // Records arrive sorted by date, at most one per date
        let record = records.next_if(|r| r.date == date);
        days.push(ScheduleDay {
            date,
            phase: cycle.phase(employee.crew, date),
            record,
        });
    }

    Ok(days)
}
