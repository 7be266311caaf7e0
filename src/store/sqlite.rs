//! SQLite-backed [`RecordStore`].

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::RecordStore;
use crate::calculation::validate_range;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsencePeriod, Crew, DailyRecord, Employee, NewEmployee, PeriodKind, RateUpdate, RecordKind,
    SystemSettings,
};

const BUSY_TIMEOUT_MS: u64 = 5_000;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    user_id       INTEGER PRIMARY KEY,
    full_name     TEXT    NOT NULL,
    crew          INTEGER NOT NULL CHECK (crew IN (1, 2, 3, 4)),
    vacation_rate TEXT    NOT NULL DEFAULT '0',
    sick_rate     TEXT    NOT NULL DEFAULT '0',
    created_at    TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS records (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES employees (user_id) ON DELETE CASCADE,
    date       TEXT    NOT NULL,
    day_type   TEXT    NOT NULL
               CHECK (day_type IN ('work', 'reinforce', 'vacation', 'sick', 'unpaid')),
    hours      TEXT    NOT NULL DEFAULT '0'
               CHECK (CAST(hours AS REAL) >= 0 AND CAST(hours AS REAL) <= 24),
    created_at TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, date)
);

CREATE INDEX IF NOT EXISTS idx_records_user_date ON records (user_id, date);

CREATE TABLE IF NOT EXISTS absence_periods (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES employees (user_id) ON DELETE CASCADE,
    period_type TEXT    NOT NULL CHECK (period_type IN ('vacation', 'sick')),
    start_date  TEXT    NOT NULL,
    end_date    TEXT    NOT NULL,
    created_at  TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CHECK (end_date >= start_date)
);

CREATE INDEX IF NOT EXISTS idx_periods_user ON absence_periods (user_id, start_date);

CREATE TABLE IF NOT EXISTS system_settings (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    monthly_salary TEXT    NOT NULL,
    updated_at     TEXT
);
"#;

const EMPLOYEE_COLUMNS: &str = "user_id, full_name, crew, vacation_rate, sick_rate";
const RECORD_COLUMNS: &str = "id, user_id, date, day_type, hours";
const PERIOD_COLUMNS: &str = "id, user_id, period_type, start_date, end_date";

/// A [`RecordStore`] over a single SQLite connection.
///
/// The connection sits behind a mutex so the store can be shared across
/// request handlers; each trait method holds the lock for one statement.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened record database");
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> EngineResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> EngineResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO system_settings (id, monthly_salary) VALUES (1, ?1)",
            params![SystemSettings::default().base_salary.to_string()],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_conn(&self) -> EngineResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| EngineError::Storage {
            message: format!("connection lock poisoned: {}", e),
        })
    }
}

impl RecordStore for SqliteStore {
    fn add_employee(&self, employee: &NewEmployee) -> EngineResult<Employee> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            "INSERT INTO employees (user_id, full_name, crew) VALUES (?1, ?2, ?3)",
            params![employee.id, employee.full_name, employee.crew.number()],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(EngineError::EmployeeExists {
                    employee_id: employee.id,
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(employee_id = employee.id, crew = %employee.crew, "Registered employee");
        Ok(Employee {
            id: employee.id,
            full_name: employee.full_name.clone(),
            crew: employee.crew,
            vacation_rate: Decimal::ZERO,
            sick_rate: Decimal::ZERO,
        })
    }

    fn get_employee(&self, employee_id: i64) -> EngineResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE user_id = ?1"),
                params![employee_id],
                EmployeeRow::from_row,
            )
            .optional()?;

        row.map(Employee::try_from).transpose()
    }

    fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY full_name, user_id"
        ))?;
        let rows = stmt
            .query_map([], EmployeeRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    fn update_employee_rates(
        &self,
        employee_id: i64,
        update: &RateUpdate,
    ) -> EngineResult<Employee> {
        update.validate()?;

        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!(
                    "UPDATE employees SET \
                     vacation_rate = COALESCE(?2, vacation_rate), \
                     sick_rate = COALESCE(?3, sick_rate) \
                     WHERE user_id = ?1 RETURNING {EMPLOYEE_COLUMNS}"
                ),
                params![
                    employee_id,
                    update.vacation_rate.map(|r| r.to_string()),
                    update.sick_rate.map(|r| r.to_string()),
                ],
                EmployeeRow::from_row,
            )
            .optional()?
            .ok_or(EngineError::EmployeeNotFound { employee_id })?;

        info!(
            employee_id,
            vacation_rate = %row.vacation_rate,
            sick_rate = %row.sick_rate,
            "Updated employee rates"
        );
        Employee::try_from(row)
    }

    fn get_record(&self, employee_id: i64, date: NaiveDate) -> EngineResult<Option<DailyRecord>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records WHERE user_id = ?1 AND date = ?2"),
                params![employee_id, date.to_string()],
                RecordRow::from_row,
            )
            .optional()?;

        row.map(DailyRecord::try_from).transpose()
    }

    fn get_records_in_range(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<DailyRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records \
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date"
        ))?;
        let rows = stmt
            .query_map(
                params![employee_id, start.to_string(), end.to_string()],
                RecordRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(DailyRecord::try_from).collect()
    }

    fn get_last_records(&self, employee_id: i64, limit: usize) -> EngineResult<Vec<DailyRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records \
             WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![employee_id, limit], RecordRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(DailyRecord::try_from).collect()
    }

    fn insert_record(
        &self,
        employee_id: i64,
        date: NaiveDate,
        kind: RecordKind,
        hours: Decimal,
    ) -> EngineResult<DailyRecord> {
        let stored_hours = storable_hours(hours)?;

        let conn = self.get_conn()?;
        let inserted = conn
            .query_row(
                &format!(
                    "INSERT INTO records (user_id, date, day_type, hours) VALUES (?1, ?2, ?3, ?4) \
                     ON CONFLICT (user_id, date) DO NOTHING \
                     RETURNING {RECORD_COLUMNS}"
                ),
                params![employee_id, date.to_string(), kind.code(), stored_hours],
                RecordRow::from_row,
            )
            .optional()?;

        match inserted {
            Some(row) => {
                debug!(employee_id, %date, kind = kind.code(), %hours, "Inserted daily record");
                DailyRecord::try_from(row)
            }
            None => {
                // Same lock as the insert, so the occupant cannot change in between
                let existing: String = conn.query_row(
                    "SELECT day_type FROM records WHERE user_id = ?1 AND date = ?2",
                    params![employee_id, date.to_string()],
                    |row| row.get(0),
                )?;
                Err(EngineError::Conflict { date, existing })
            }
        }
    }

    fn upsert_record(
        &self,
        employee_id: i64,
        date: NaiveDate,
        kind: RecordKind,
        hours: Decimal,
    ) -> EngineResult<DailyRecord> {
        let stored_hours = storable_hours(hours)?;

        let conn = self.get_conn()?;
        let row = conn.query_row(
            &format!(
                "INSERT INTO records (user_id, date, day_type, hours) VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT (user_id, date) DO UPDATE SET \
                 day_type = excluded.day_type, hours = excluded.hours \
                 RETURNING {RECORD_COLUMNS}"
            ),
            params![employee_id, date.to_string(), kind.code(), stored_hours],
            RecordRow::from_row,
        )?;

        debug!(employee_id, %date, kind = kind.code(), %hours, "Saved daily record");
        DailyRecord::try_from(row)
    }

    fn delete_record(&self, record_id: i64) -> EngineResult<()> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM records WHERE id = ?1", params![record_id])?;
        if deleted == 0 {
            return Err(EngineError::RecordNotFound { record_id });
        }
        debug!(record_id, "Deleted daily record");
        Ok(())
    }

    fn add_absence_period(
        &self,
        employee_id: i64,
        kind: PeriodKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<AbsencePeriod> {
        validate_range(start, end)?;

        let conn = self.get_conn()?;
        let row = conn.query_row(
            &format!(
                "INSERT INTO absence_periods (user_id, period_type, start_date, end_date) \
                 VALUES (?1, ?2, ?3, ?4) RETURNING {PERIOD_COLUMNS}"
            ),
            params![employee_id, kind.code(), start.to_string(), end.to_string()],
            PeriodRow::from_row,
        )?;

        info!(employee_id, kind = kind.code(), %start, %end, "Booked absence period");
        AbsencePeriod::try_from(row)
    }

    fn get_absence_periods(
        &self,
        employee_id: i64,
        kind: Option<PeriodKind>,
    ) -> EngineResult<Vec<AbsencePeriod>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PERIOD_COLUMNS} FROM absence_periods \
             WHERE user_id = ?1 AND (?2 IS NULL OR period_type = ?2) \
             ORDER BY start_date DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map(
                params![employee_id, kind.map(PeriodKind::code)],
                PeriodRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(AbsencePeriod::try_from).collect()
    }

    fn delete_absence_period(&self, period_id: i64) -> EngineResult<()> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM absence_periods WHERE id = ?1",
            params![period_id],
        )?;
        if deleted == 0 {
            return Err(EngineError::PeriodNotFound { period_id });
        }
        debug!(period_id, "Deleted absence period");
        Ok(())
    }

    fn get_settings(&self) -> EngineResult<SystemSettings> {
        let conn = self.get_conn()?;
        let row: Option<(String, Option<String>)> = conn
            .query_row(
                "SELECT monthly_salary, updated_at FROM system_settings WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((salary, updated_at)) = row else {
            return Ok(SystemSettings::default());
        };

        Ok(SystemSettings {
            base_salary: parse_decimal("monthly_salary", &salary)?,
            updated_at: updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    fn set_global_salary(&self, amount: Decimal) -> EngineResult<()> {
        if amount.is_sign_negative() {
            return Err(EngineError::InvalidAmount {
                field: "base_salary".to_string(),
                amount,
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO system_settings (id, monthly_salary, updated_at) \
             VALUES (1, ?1, CURRENT_TIMESTAMP) \
             ON CONFLICT (id) DO UPDATE SET \
             monthly_salary = excluded.monthly_salary, updated_at = excluded.updated_at",
            params![amount.to_string()],
        )?;

        info!(base_salary = %amount, "Updated global base salary");
        Ok(())
    }
}

// Raw column values; conversion into domain types happens after the
// statement so decoding faults surface as DataIntegrity, not rusqlite errors.

struct EmployeeRow {
    user_id: i64,
    full_name: String,
    crew: i64,
    vacation_rate: String,
    sick_rate: String,
}

impl EmployeeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            full_name: row.get(1)?,
            crew: row.get(2)?,
            vacation_rate: row.get(3)?,
            sick_rate: row.get(4)?,
        })
    }
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = EngineError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let crew = u8::try_from(row.crew)
            .ok()
            .and_then(|n| Crew::try_from(n).ok())
            .ok_or_else(|| EngineError::DataIntegrity {
                message: format!("employee {} has invalid crew {}", row.user_id, row.crew),
            })?;

        Ok(Employee {
            id: row.user_id,
            full_name: row.full_name,
            crew,
            vacation_rate: parse_decimal("vacation_rate", &row.vacation_rate)?,
            sick_rate: parse_decimal("sick_rate", &row.sick_rate)?,
        })
    }
}

struct RecordRow {
    id: i64,
    user_id: i64,
    date: String,
    day_type: String,
    hours: String,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            day_type: row.get(3)?,
            hours: row.get(4)?,
        })
    }
}

impl TryFrom<RecordRow> for DailyRecord {
    type Error = EngineError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let hours = parse_decimal("hours", &row.hours)?.normalize();

        Ok(DailyRecord {
            id: row.id,
            employee_id: row.user_id,
            date: parse_date(&row.date)?,
            kind: RecordKind::from_str(&row.day_type)?,
            hours,
        })
    }
}

struct PeriodRow {
    id: i64,
    user_id: i64,
    period_type: String,
    start_date: String,
    end_date: String,
}

impl PeriodRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            period_type: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
        })
    }
}

impl TryFrom<PeriodRow> for AbsencePeriod {
    type Error = EngineError;

    fn try_from(row: PeriodRow) -> Result<Self, Self::Error> {
        Ok(AbsencePeriod {
            id: row.id,
            employee_id: row.user_id,
            kind: PeriodKind::from_str(&row.period_type)?,
            start: parse_date(&row.start_date)?,
            end: parse_date(&row.end_date)?,
        })
    }
}

/// Renders hours for the TEXT column, rejecting values outside 0..=24.
fn storable_hours(hours: Decimal) -> EngineResult<String> {
    if hours.is_sign_negative() || hours > Decimal::from(24) {
        return Err(EngineError::InvalidHours { hours });
    }
    Ok(hours.normalize().to_string())
}

fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| EngineError::DataIntegrity {
        message: format!("invalid stored date '{}': {}", value, e),
    })
}

fn parse_timestamp(value: &str) -> EngineResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map_err(|e| {
        EngineError::DataIntegrity {
            message: format!("invalid stored timestamp '{}': {}", value, e),
        }
    })
}

fn parse_decimal(field: &str, value: &str) -> EngineResult<Decimal> {
    Decimal::from_str(value).map_err(|e| EngineError::DataIntegrity {
        message: format!("invalid stored {} '{}': {}", field, value, e),
    })
}
