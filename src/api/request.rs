//! Request types for the shift ledger API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! HTTP endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PeriodKind, RecordKind};
use crate::session::{EntryKind, SessionInput, resolve_date, validate_shift_hours};

/// Query for `GET /api/v1/phase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseQuery {
    /// Crew number (1 to 4).
    pub crew: u8,
    /// The date to classify.
    pub date: NaiveDate,
}

/// Inclusive date range query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeQuery {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

/// Query for the recent-records listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    /// How many records to return; the configured default when absent.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query for the absence-period listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodListQuery {
    /// Only return periods of this kind.
    #[serde(default)]
    pub kind: Option<PeriodKind>,
}

/// Body of `PUT /api/v1/employees/:id/records/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    /// What to record.
    pub kind: RecordKind,
    /// Hours worked; required for `work`, ignored otherwise.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Replace an existing record on the same date.
    #[serde(default)]
    pub confirm_overwrite: bool,
}

impl RecordRequest {
    /// Returns the hours to store for this request.
    ///
    /// Reinforcement is always a full shift and absences carry no hours.
    pub fn resolved_hours(&self) -> EngineResult<Decimal> {
        match EntryKind::from(self.kind).fixed_hours() {
            Some(hours) => Ok(hours),
            None => {
                let hours = self.hours.ok_or(EngineError::InvalidHours {
                    hours: Decimal::ZERO,
                })?;
                validate_shift_hours(hours)?;
                Ok(hours)
            }
        }
    }
}

/// Body of `POST /api/v1/employees/:id/periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Kind of absence.
    pub kind: PeriodKind,
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

/// Body of `PUT /api/v1/admin/salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRequest {
    /// New global base monthly salary.
    pub base_salary: Decimal,
}

/// Body of `POST /api/v1/employees/:id/session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionStartRequest {
    /// Enter a daily record.
    Record {
        /// What to enter.
        entry: EntryKind,
    },
    /// Enter an absence period.
    Period {
        /// Kind of absence.
        kind: PeriodKind,
    },
}

/// Body of `POST /api/v1/employees/:id/session/input`.
///
/// Dates arrive as free text and go through the flexible date parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionInputRequest {
    /// A date as typed by the user.
    Date {
        /// Text such as `завтра`, `+2`, `15.10` or `2024-10-15`.
        text: String,
    },
    /// Hours worked.
    Hours {
        /// Number of hours.
        hours: Decimal,
    },
    /// Go ahead with the pending write.
    Confirm,
    /// Drop the pending write.
    Decline,
    /// Leave the dialog.
    Abandon,
}

impl SessionInputRequest {
    /// Converts the request into a session input, parsing dates relative to `today`.
    pub fn into_input(self, today: NaiveDate) -> EngineResult<SessionInput> {
        Ok(match self {
            SessionInputRequest::Date { text } => SessionInput::Date(resolve_date(&text, today)?),
            SessionInputRequest::Hours { hours } => SessionInput::Hours(hours),
            SessionInputRequest::Confirm => SessionInput::Confirm,
            SessionInputRequest::Decline => SessionInput::Decline,
            SessionInputRequest::Abandon => SessionInput::Abandon,
        })
    }
}
