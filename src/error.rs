//! Error types for the shift ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing schedules,
//! reconciling months and talking to the record store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the shift ledger.
///
/// All operations in the crate return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shift_ledger::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound { employee_id: 42 };
/// assert_eq!(error.to_string(), "Employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee is registered under the identifier.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        employee_id: i64,
    },

    /// An employee with the identifier is already registered.
    #[error("Employee already exists: {employee_id}")]
    EmployeeExists {
        /// The duplicate identifier.
        employee_id: i64,
    },

    /// No daily record exists with the identifier.
    #[error("Record not found: {record_id}")]
    RecordNotFound {
        /// The record identifier that was looked up.
        record_id: i64,
    },

    /// No absence period exists with the identifier.
    #[error("Absence period not found: {period_id}")]
    PeriodNotFound {
        /// The period identifier that was looked up.
        period_id: i64,
    },

    /// A stored value falls outside a closed enumeration.
    #[error("Data integrity fault: {message}")]
    DataIntegrity {
        /// A description of the offending value.
        message: String,
    },

    /// A write targeted a date that already holds a record.
    #[error("Date {date} already holds a '{existing}' record")]
    Conflict {
        /// The contested date.
        date: NaiveDate,
        /// Code of the kind already recorded on that date.
        existing: String,
    },

    /// The end of a date range lies before its start.
    #[error("Invalid date range: {end} is before {start}")]
    InvalidRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// A month number outside 1..=12, or a year chrono cannot represent.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// Date text that could not be understood.
    #[error("Unrecognised date: '{input}'")]
    InvalidDate {
        /// The rejected text.
        input: String,
    },

    /// A crew number outside 1..=4.
    #[error("Invalid crew number: {value}")]
    InvalidCrew {
        /// The rejected value.
        value: String,
    },

    /// Worked hours outside the accepted range for a shift.
    #[error("Invalid hours: {hours}")]
    InvalidHours {
        /// The rejected number of hours.
        hours: Decimal,
    },

    /// A negative salary or rate.
    #[error("Invalid amount for '{field}': {amount}")]
    InvalidAmount {
        /// The field being set.
        field: String,
        /// The rejected amount.
        amount: Decimal,
    },

    /// An entry session received input it cannot accept in its current state.
    #[error("Cannot accept {input} while {state}")]
    InvalidTransition {
        /// The current session state.
        state: String,
        /// The rejected input.
        input: String,
    },

    /// The caller is not on the administrator allow-list.
    #[error("User {user_id} is not allowed to perform this action")]
    Unauthorized {
        /// The rejected caller.
        user_id: i64,
    },

    /// The underlying storage failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl From<rusqlite::Error> for EngineError {
    fn from(error: rusqlite::Error) -> Self {
        EngineError::Storage {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
