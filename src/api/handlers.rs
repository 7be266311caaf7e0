//! HTTP request handlers for the shift ledger API.
//!
//! This module contains the router and the handler functions for the
//! schedule, reconciliation, record and entry-session endpoints. The
//! administrator endpoints live in [`super::admin`].

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    check_overlap, estimate, lookup_day, month_bounds, month_schedule, reconcile_with_cycle,
    validate_range,
};
use crate::error::EngineResult;
use crate::models::{Crew, DailyRecord};
use crate::session::{EntrySession, SessionState, resolve_date};
use crate::store::require_employee;

use super::admin;
use super::request::{
    LimitQuery, PeriodListQuery, PeriodRequest, PhaseQuery, RangeQuery, RecordRequest,
    SessionInputRequest, SessionStartRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, EstimateResponse, MonthBoundsResponse, PeriodCreatedResponse,
    PhaseResponse, SessionResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/phase", get(phase_handler))
        .route("/api/v1/calendar/:year/:month", get(month_bounds_handler))
        .route("/api/v1/employees/:employee_id", get(employee_handler))
        .route(
            "/api/v1/employees/:employee_id/stats/:year/:month",
            get(stats_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/estimate/:year/:month",
            get(estimate_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/schedule/:year/:month",
            get(schedule_handler),
        )
        .route("/api/v1/employees/:employee_id/days/:date", get(day_handler))
        .route(
            "/api/v1/employees/:employee_id/overlaps",
            get(overlaps_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/records",
            get(recent_records_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/records/:date",
            put(put_record_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/periods",
            get(list_periods_handler).post(create_period_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/session",
            get(get_session_handler).post(start_session_handler),
        )
        .route(
            "/api/v1/employees/:employee_id/session/input",
            post(session_input_handler),
        )
        .route("/api/v1/records/:record_id", delete(delete_record_handler))
        .route("/api/v1/periods/:period_id", delete(delete_period_handler))
        .route(
            "/api/v1/admin/employees",
            get(admin::list_employees_handler).post(admin::create_employee_handler),
        )
        .route(
            "/api/v1/admin/employees/:employee_id/rates",
            patch(admin::update_rates_handler),
        )
        .route(
            "/api/v1/admin/salary",
            get(admin::get_salary_handler).put(admin::set_salary_handler),
        )
        .with_state(state)
}

/// Serializes `body` as a JSON response with an explicit content type.
pub(super) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Turns an engine result into a response, logging failures.
pub(super) fn respond<T: Serialize>(
    correlation_id: Uuid,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => json_response(status, body),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

/// Unwraps a JSON body or builds the 400 response for it.
pub(super) fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(json_response(StatusCode::BAD_REQUEST, error))
        }
    }
}

/// Unwraps a query string or builds the 400 response for it.
fn parse_query<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, Response> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "Query string rejected"
            );
            Err(json_response(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_QUERY", body_text),
            ))
        }
    }
}

/// Handler for GET /health.
async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

/// Handler for GET /api/v1/phase?crew=&date=.
async fn phase_handler(
    State(state): State<AppState>,
    query: Result<Query<PhaseQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let result = Crew::try_from(query.crew).map(|crew| {
        let phase = state.cycle().phase(crew, query.date);
        PhaseResponse {
            crew,
            date: query.date,
            phase,
            label: phase.label().to_string(),
            symbol: phase.symbol().to_string(),
            planned_hours: phase.planned_hours(),
        }
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/calendar/:year/:month.
async fn month_bounds_handler(Path((year, month)): Path<(i32, u32)>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = month_bounds(year, month).map(|(first_day, last_day)| MonthBoundsResponse {
        year,
        month,
        first_day,
        last_day,
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id.
async fn employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        StatusCode::OK,
        require_employee(state.store(), employee_id),
    )
}

/// Handler for GET /api/v1/employees/:employee_id/stats/:year/:month.
async fn stats_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(i64, i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id, year, month, "Reconciling month");

    let result = require_employee(state.store(), employee_id).and_then(|employee| {
        reconcile_with_cycle(state.store(), &state.cycle(), &employee, year, month)
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id/estimate/:year/:month.
async fn estimate_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(i64, i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id, year, month, "Estimating pay");

    let result = (|| -> EngineResult<EstimateResponse> {
        let store = state.store();
        let employee = require_employee(store, employee_id)?;
        let stats = reconcile_with_cycle(store, &state.cycle(), &employee, year, month)?;
        let base_salary = store.get_global_salary()?;
        let estimate = estimate(&stats, &employee, base_salary);
        info!(
            correlation_id = %correlation_id,
            employee_id,
            hours_delta = %estimate.hours_delta,
            total = %estimate.total,
            "Estimate completed"
        );
        Ok(EstimateResponse { stats, estimate })
    })();
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id/schedule/:year/:month.
async fn schedule_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(i64, i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = require_employee(state.store(), employee_id).and_then(|employee| {
        month_schedule(state.store(), &state.cycle(), &employee, year, month)
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id/days/:date.
///
/// The date segment is free text (`2024-10-15`, `завтра`, `+30`, `15.10`)
/// resolved against today's date.
async fn day_handler(
    State(state): State<AppState>,
    Path((employee_id, text)): Path<(i64, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = resolve_date(&text, Local::now().date_naive()).and_then(|date| {
        let employee = require_employee(state.store(), employee_id)?;
        lookup_day(state.store(), &state.cycle(), &employee, date)
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id/overlaps?start=&end=.
async fn overlaps_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    range: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let range = match parse_query(correlation_id, range) {
        Ok(range) => range,
        Err(response) => return response,
    };
    let result = require_employee(state.store(), employee_id)
        .and_then(|employee| check_overlap(state.store(), &employee, range.start, range.end));
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/employees/:employee_id/records?limit=.
async fn recent_records_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let history = &state.config().history;
    let limit = query
        .limit
        .unwrap_or(history.recent_limit)
        .clamp(1, history.max_limit);

    let result = require_employee(state.store(), employee_id)
        .and_then(|employee| state.store().get_last_records(employee.id, limit));
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /api/v1/employees/:employee_id/records/:date.
///
/// Answers 409 when the date already holds a record and the request does
/// not confirm the overwrite; 201 for a new record, 200 for a replacement.
/// Without confirmation the occupancy check and the write are one store
/// operation.
async fn put_record_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(i64, NaiveDate)>,
    payload: Result<Json<RecordRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        employee_id,
        %date,
        kind = request.kind.code(),
        "Saving daily record"
    );

    let result = (|| -> EngineResult<(StatusCode, DailyRecord)> {
        let store = state.store();
        require_employee(store, employee_id)?;
        let hours = request.resolved_hours()?;

        if !request.confirm_overwrite {
            let record = store.insert_record(employee_id, date, request.kind, hours)?;
            return Ok((StatusCode::CREATED, record));
        }

        let existed = store.get_record(employee_id, date)?.is_some();
        let record = store.upsert_record(employee_id, date, request.kind, hours)?;
        let status = if existed {
            StatusCode::OK
        } else {
            StatusCode::CREATED
        };
        Ok((status, record))
    })();

    match result {
        Ok((status, record)) => json_response(status, record),
        Err(err) => respond::<()>(correlation_id, StatusCode::OK, Err(err)),
    }
}

/// Handler for DELETE /api/v1/records/:record_id.
async fn delete_record_handler(
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.store().delete_record(record_id) {
        Ok(()) => {
            info!(correlation_id = %correlation_id, record_id, "Deleted daily record");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => respond::<()>(correlation_id, StatusCode::OK, Err(err)),
    }
}

/// Handler for GET /api/v1/employees/:employee_id/periods?kind=.
async fn list_periods_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    query: Result<Query<PeriodListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let result = require_employee(state.store(), employee_id)
        .and_then(|employee| state.store().get_absence_periods(employee.id, query.kind));
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /api/v1/employees/:employee_id/periods.
async fn create_period_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = (|| -> EngineResult<PeriodCreatedResponse> {
        let store = state.store();
        validate_range(request.start, request.end)?;
        let employee = require_employee(store, employee_id)?;
        let overlapping_records = check_overlap(store, &employee, request.start, request.end)?;
        let period = store.add_absence_period(employee_id, request.kind, request.start, request.end)?;
        info!(
            correlation_id = %correlation_id,
            employee_id,
            period_id = period.id,
            overlapping = overlapping_records.len(),
            "Absence period booked"
        );
        Ok(PeriodCreatedResponse {
            period,
            overlapping_records,
        })
    })();
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Handler for DELETE /api/v1/periods/:period_id.
async fn delete_period_handler(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.store().delete_absence_period(period_id) {
        Ok(()) => {
            info!(correlation_id = %correlation_id, period_id, "Deleted absence period");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => respond::<()>(correlation_id, StatusCode::OK, Err(err)),
    }
}

/// Handler for GET /api/v1/employees/:employee_id/session.
async fn get_session_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.sessions().map(|sessions| SessionResponse {
        employee_id,
        event: None,
        state: sessions
            .get(&employee_id)
            .map(|session| session.state().clone())
            .unwrap_or(SessionState::Idle),
    });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /api/v1/employees/:employee_id/session.
///
/// Starts a new dialog, replacing any dialog in progress.
async fn start_session_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    payload: Result<Json<SessionStartRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = (|| -> EngineResult<SessionResponse> {
        require_employee(state.store(), employee_id)?;
        let mut session = EntrySession::new(employee_id);
        match request {
            SessionStartRequest::Record { entry } => session.begin_record(entry),
            SessionStartRequest::Period { kind } => session.begin_period(kind),
        }
        let response = SessionResponse {
            employee_id,
            event: None,
            state: session.state().clone(),
        };
        state.sessions()?.insert(employee_id, session);
        info!(
            correlation_id = %correlation_id,
            employee_id,
            state = response.state.name(),
            "Entry session started"
        );
        Ok(response)
    })();
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /api/v1/employees/:employee_id/session/input.
async fn session_input_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    payload: Result<Json<SessionInputRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = apply_session_input(&state, employee_id, request, Local::now().date_naive());
    if let Ok(response) = &result {
        info!(
            correlation_id = %correlation_id,
            employee_id,
            state = response.state.name(),
            "Entry session input applied"
        );
    }
    respond(correlation_id, StatusCode::OK, result)
}

fn apply_session_input(
    state: &AppState,
    employee_id: i64,
    request: SessionInputRequest,
    today: NaiveDate,
) -> EngineResult<SessionResponse> {
    require_employee(state.store(), employee_id)?;
    let input = request.into_input(today)?;

    let mut sessions = state.sessions()?;
    let session = sessions
        .entry(employee_id)
        .or_insert_with(|| EntrySession::new(employee_id));
    let outcome = session.apply(state.store(), input);
    let current = session.state().clone();

    if current == SessionState::Idle {
        sessions.remove(&employee_id);
    }

    Ok(SessionResponse {
        employee_id,
        event: Some(outcome?),
        state: current,
    })
}
