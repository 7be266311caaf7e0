//! Monthly reconciliation of planned versus recorded time.
//!
//! The planned side comes from the shift cycle: every day or night shift in
//! the month is worth one full shift. The recorded side comes from the
//! employee's daily records. Absence periods are not consulted.

use rust_decimal::Decimal;
use tracing::debug;

use super::calendar::{days_in_range, month_bounds};
use super::shift_cycle::{SHIFT_LENGTH_HOURS, ShiftCycle};
use crate::error::EngineResult;
use crate::models::{DailyRecord, Employee, MonthStats, RecordKind};
use crate::store::RecordStore;

/// Reconciles one employee's month using the default shift cycle.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidMonth`] for a month outside
/// `1..=12`, and propagates store failures, including
/// [`crate::error::EngineError::DataIntegrity`] for undecodable records.
pub fn reconcile<S>(store: &S, employee: &Employee, year: i32, month: u32) -> EngineResult<MonthStats>
where
    S: RecordStore + ?Sized,
{
    reconcile_with_cycle(store, &ShiftCycle::default(), employee, year, month)
}

/// Reconciles one employee's month against an explicit shift cycle.
pub fn reconcile_with_cycle<S>(
    store: &S,
    cycle: &ShiftCycle,
    employee: &Employee,
    year: i32,
    month: u32,
) -> EngineResult<MonthStats>
where
    S: RecordStore + ?Sized,
{
    // Validate before touching the store
    month_bounds(year, month)?;
    let records = store.get_records_in_month(employee.id, year, month)?;
    reconcile_records(cycle, employee, year, month, &records)
}

/// Computes month totals over records that were already fetched.
///
/// Records dated outside the month are ignored. A shift record only counts
/// toward its day total when it carries more than zero hours.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::{reconcile_records, ShiftCycle};
/// use shift_ledger::models::{Crew, DailyRecord, Employee, RecordKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: 1,
///     full_name: "Anna".to_string(),
///     crew: Crew::One,
///     vacation_rate: Decimal::ZERO,
///     sick_rate: Decimal::ZERO,
/// };
/// let records = vec![DailyRecord {
///     id: 1,
///     employee_id: 1,
///     date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
///     kind: RecordKind::Work,
///     hours: Decimal::new(12, 0),
/// }];
///
/// let stats = reconcile_records(&ShiftCycle::default(), &employee, 2024, 10, &records).unwrap();
/// assert_eq!(stats.planned_work_days, 16);
/// assert_eq!(stats.work_days, 1);
/// ```
pub fn reconcile_records(
    cycle: &ShiftCycle,
    employee: &Employee,
    year: i32,
    month: u32,
    records: &[DailyRecord],
) -> EngineResult<MonthStats> {
    let (first_day, last_day) = month_bounds(year, month)?;

    let planned_work_days = days_in_range(first_day, last_day)
        .filter(|date| cycle.phase(employee.crew, *date).is_work_day())
        .count() as u32;
    let planned_hours = Decimal::from(planned_work_days) * SHIFT_LENGTH_HOURS;

    let mut stats = MonthStats {
        employee_id: employee.id,
        crew: employee.crew,
        year,
        month,
        first_day,
        last_day,
        planned_work_days,
        planned_hours,
        work_days: 0,
        work_hours: Decimal::ZERO,
        reinforcement_days: 0,
        reinforcement_hours: Decimal::ZERO,
        total_worked_hours: Decimal::ZERO,
        vacation_days: 0,
        sick_days: 0,
        unpaid_days: 0,
    };

    for record in records
        .iter()
        .filter(|r| r.date >= first_day && r.date <= last_day)
    {
        match record.kind {
            RecordKind::Work => {
                stats.work_hours += record.hours;
                if record.hours > Decimal::ZERO {
                    stats.work_days += 1;
                }
            }
            RecordKind::Reinforcement => {
                stats.reinforcement_hours += record.hours;
                if record.hours > Decimal::ZERO {
                    stats.reinforcement_days += 1;
                }
            }
            RecordKind::Vacation => stats.vacation_days += 1,
            RecordKind::Sick => stats.sick_days += 1,
            RecordKind::Unpaid => stats.unpaid_days += 1,
        }
    }

    stats.total_worked_hours = stats.work_hours + stats.reinforcement_hours;
    debug!(
        employee_id = employee.id,
        year,
        month,
        planned_hours = %stats.planned_hours,
        worked_hours = %stats.total_worked_hours,
        "Month reconciled"
    );
    Ok(stats)
}
