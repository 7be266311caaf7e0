//! Response types for the shift ledger API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::ShiftPhase;
use crate::error::EngineError;
use crate::models::{AbsencePeriod, Crew, DailyRecord, MonthStats, PayEstimate};
use crate::session::{SessionEvent, SessionState};

/// Body of `GET /api/v1/phase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResponse {
    /// Crew classified.
    pub crew: Crew,
    /// Date classified.
    pub date: NaiveDate,
    /// The phase on that date.
    pub phase: ShiftPhase,
    /// Human-readable phase label.
    pub label: String,
    /// Symbol shown with the label.
    pub symbol: String,
    /// Hours the phase plans.
    pub planned_hours: Decimal,
}

/// Body of `GET /api/v1/calendar/:year/:month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthBoundsResponse {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// First day, inclusive.
    pub first_day: NaiveDate,
    /// Last day, inclusive.
    pub last_day: NaiveDate,
}

/// Body of `GET /api/v1/employees/:id/estimate/:year/:month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    /// The reconciliation the estimate is based on.
    pub stats: MonthStats,
    /// The approximate pay.
    pub estimate: PayEstimate,
}

/// Body returned when an absence period is booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodCreatedResponse {
    /// The stored period.
    pub period: AbsencePeriod,
    /// Daily records already inside the period. They are left untouched.
    pub overlapping_records: Vec<DailyRecord>,
}

/// Body returned by the entry-session endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The employee the session belongs to.
    pub employee_id: i64,
    /// What the last input produced, if an input was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<SessionEvent>,
    /// The state after the call.
    pub state: SessionState,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a request without a caller identity.
    pub fn unauthenticated(header: &str) -> Self {
        Self::with_details(
            "UNAUTHENTICATED",
            "Caller identity is missing or invalid",
            format!("Send the numeric caller id in the '{}' header", header),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::EmployeeNotFound { .. } => (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_FOUND"),
            EngineError::EmployeeExists { .. } => (StatusCode::CONFLICT, "EMPLOYEE_EXISTS"),
            EngineError::RecordNotFound { .. } => (StatusCode::NOT_FOUND, "RECORD_NOT_FOUND"),
            EngineError::PeriodNotFound { .. } => (StatusCode::NOT_FOUND, "PERIOD_NOT_FOUND"),
            EngineError::DataIntegrity { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY")
            }
            EngineError::Conflict { .. } => (StatusCode::CONFLICT, "RECORD_CONFLICT"),
            EngineError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            EngineError::InvalidMonth { .. } => (StatusCode::BAD_REQUEST, "INVALID_MONTH"),
            EngineError::InvalidDate { .. } => (StatusCode::BAD_REQUEST, "INVALID_DATE"),
            EngineError::InvalidCrew { .. } => (StatusCode::BAD_REQUEST, "INVALID_CREW"),
            EngineError::InvalidHours { .. } => (StatusCode::BAD_REQUEST, "INVALID_HOURS"),
            EngineError::InvalidAmount { .. } => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            EngineError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            EngineError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            EngineError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        let error = match error {
            EngineError::Conflict { date, existing } => ApiError::with_details(
                code,
                message,
                format!(
                    "Resend with confirm_overwrite set to replace the '{}' record on {}",
                    existing, date
                ),
            ),
            EngineError::InvalidHours { .. } => ApiError::with_details(
                code,
                message,
                "Shift hours must be between 0.5 and 12",
            ),
            _ => ApiError::new(code, message),
        };

        ApiErrorResponse { status, error }
    }
}
