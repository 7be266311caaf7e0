//! Calculation logic for the shift ledger.
//!
//! This module contains the shift-cycle calculator, the calendar range
//! helpers, monthly reconciliation of planned versus recorded hours, the
//! approximate pay estimator and the day, period and month lookups.

mod calendar;
mod lookup;
mod payroll;
mod reconciliation;
mod shift_cycle;

pub use calendar::{days_in_range, month_bounds, validate_range};
pub use lookup::{DayLookup, ScheduleDay, check_overlap, lookup_day, month_schedule};
pub use payroll::estimate;
pub use reconciliation::{reconcile, reconcile_records, reconcile_with_cycle};
pub use shift_cycle::{SHIFT_LENGTH_HOURS, ShiftCycle, ShiftPhase, phase};
