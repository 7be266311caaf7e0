//! Core data models for the shift ledger.
//!
//! This module contains all the domain models used throughout the crate.

mod absence_period;
mod employee;
mod month_stats;
mod pay_estimate;
mod record;
mod settings;

pub use absence_period::{AbsencePeriod, PeriodKind};
pub use employee::{Crew, Employee, NewEmployee, RateUpdate};
pub use month_stats::MonthStats;
pub use pay_estimate::{AuditStep, ESTIMATE_DISCLAIMER, PayEstimate};
pub use record::{DailyRecord, RecordKind};
pub use settings::{DEFAULT_BASE_SALARY, SystemSettings};
