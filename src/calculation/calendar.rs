//! Calendar range utilities.
//!
//! Month boundaries and inclusive date ranges, with the month and range
//! validation that keeps bad input away from the cycle calculator.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

/// Returns the first and last day of a month, both inclusive.
///
/// December rolls over to January of the next year; February follows
/// the leap-year rules of the calendar.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMonth`] if `month` is outside `1..=12`
/// or the year is outside the range chrono can represent.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (first, last) = month_bounds(2024, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
///
/// assert!(month_bounds(2024, 13).is_err());
/// ```
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidMonth { year, month };

    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Rejects ranges whose end lies before their start.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(())
}

/// Iterates every date from `start` to `end`, both inclusive.
///
/// Yields nothing when `end < start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}
