//! Record storage.
//!
//! The [`RecordStore`] trait is the contract the calculation and session
//! layers read and write through. [`SqliteStore`] implements it on SQLite,
//! with the uniqueness and check constraints enforced by the schema.
//!
//! # Example
//!
//! ```
//! use shift_ledger::models::{Crew, NewEmployee, RecordKind};
//! use shift_ledger::store::{RecordStore, SqliteStore};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let store = SqliteStore::open_in_memory()?;
//! store.add_employee(&NewEmployee { id: 1, full_name: "Anna".into(), crew: Crew::One })?;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
//! store.upsert_record(1, date, RecordKind::Work, Decimal::new(12, 0))?;
//! assert!(store.get_record(1, date)?.is_some());
//! # Ok::<(), shift_ledger::error::EngineError>(())
//! ```

mod sqlite;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::month_bounds;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsencePeriod, DailyRecord, Employee, NewEmployee, PeriodKind, RateUpdate, RecordKind,
    SystemSettings,
};

pub use sqlite::SqliteStore;

/// Read/write contract for employees, records, absence periods and settings.
///
/// Every method is a single atomic operation at the storage layer.
pub trait RecordStore {
    /// Registers an employee with zero absence rates.
    ///
    /// Fails with [`EngineError::EmployeeExists`] on a duplicate id.
    fn add_employee(&self, employee: &NewEmployee) -> EngineResult<Employee>;

    /// Looks up an employee.
    fn get_employee(&self, employee_id: i64) -> EngineResult<Option<Employee>>;

    /// Lists all employees ordered by name.
    fn list_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Changes the rates present in `update`, leaving the others untouched.
    fn update_employee_rates(
        &self,
        employee_id: i64,
        update: &RateUpdate,
    ) -> EngineResult<Employee>;

    /// Looks up the record of an employee on a date.
    fn get_record(&self, employee_id: i64, date: NaiveDate) -> EngineResult<Option<DailyRecord>>;

    /// Returns records dated `start..=end`, ascending by date.
    fn get_records_in_range(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<DailyRecord>>;

    /// Returns the records of one calendar month, ascending by date.
    fn get_records_in_month(
        &self,
        employee_id: i64,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<DailyRecord>> {
        let (first, last) = month_bounds(year, month)?;
        self.get_records_in_range(employee_id, first, last)
    }

    /// Returns the most recent records, newest first.
    fn get_last_records(&self, employee_id: i64, limit: usize) -> EngineResult<Vec<DailyRecord>>;

    /// Writes the record for (employee, date) only if that date is free.
    ///
    /// Fails with [`EngineError::Conflict`] naming the kind already stored;
    /// the check and the write are one statement.
    fn insert_record(
        &self,
        employee_id: i64,
        date: NaiveDate,
        kind: RecordKind,
        hours: Decimal,
    ) -> EngineResult<DailyRecord>;

    /// Writes the record for (employee, date), replacing any existing one.
    fn upsert_record(
        &self,
        employee_id: i64,
        date: NaiveDate,
        kind: RecordKind,
        hours: Decimal,
    ) -> EngineResult<DailyRecord>;

    /// Deletes a record by id.
    fn delete_record(&self, record_id: i64) -> EngineResult<()>;

    /// Books an absence period. `end` must not precede `start`.
    fn add_absence_period(
        &self,
        employee_id: i64,
        kind: PeriodKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<AbsencePeriod>;

    /// Returns the employee's periods, optionally of one kind, newest start first.
    fn get_absence_periods(
        &self,
        employee_id: i64,
        kind: Option<PeriodKind>,
    ) -> EngineResult<Vec<AbsencePeriod>>;

    /// Deletes an absence period by id.
    fn delete_absence_period(&self, period_id: i64) -> EngineResult<()>;

    /// Returns the global settings record.
    fn get_settings(&self) -> EngineResult<SystemSettings>;

    /// Returns the global base monthly salary.
    fn get_global_salary(&self) -> EngineResult<Decimal> {
        Ok(self.get_settings()?.base_salary)
    }

    /// Replaces the global base monthly salary.
    fn set_global_salary(&self, amount: Decimal) -> EngineResult<()>;
}

/// Looks up an employee, turning absence into [`EngineError::EmployeeNotFound`].
pub fn require_employee<S>(store: &S, employee_id: i64) -> EngineResult<Employee>
where
    S: RecordStore + ?Sized,
{
    store
        .get_employee(employee_id)?
        .ok_or(EngineError::EmployeeNotFound { employee_id })
}
