//! End-to-end tests for the shift ledger HTTP API.
//!
//! This test suite drives the router against an in-memory store:
//! - Schedule phase and calendar lookups
//! - Daily records, overwrites and history
//! - Month reconciliation and the pay estimate
//! - Absence periods and overlap reporting
//! - The entry dialog
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, Days, Local, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use shift_ledger::access::AccessPolicy;
use shift_ledger::api::{AppState, USER_ID_HEADER, create_router};
use shift_ledger::config::AppConfig;
use shift_ledger::store::SqliteStore;

// =============================================================================
// Test Helpers
// =============================================================================

const ADMIN: i64 = 123456789;
const EMPLOYEE: i64 = 1001;

/// Crew 1 planned work days in October 2024 (day and night shifts).
const CREW_ONE_OCTOBER_SHIFTS: [&str; 16] = [
    "2024-10-01", "2024-10-02", "2024-10-05", "2024-10-06", "2024-10-09", "2024-10-10",
    "2024-10-13", "2024-10-14", "2024-10-17", "2024-10-18", "2024-10-21", "2024-10-22",
    "2024-10-25", "2024-10-26", "2024-10-29", "2024-10-30",
];

fn create_router_for_test() -> Router {
    shift_ledger::logging::init_test();
    let config = AppConfig {
        access: AccessPolicy::new([ADMIN]),
        ..AppConfig::default()
    };
    let store = SqliteStore::open_in_memory().expect("Failed to open store");
    create_router(AppState::new(config, Arc::new(store)))
}

fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_decimal(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected decimal string, got {}", value));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    caller: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(USER_ID_HEADER, caller.to_string());
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None, None).await
}

async fn register_employee(router: &Router, crew: u8) {
    let (status, _) = send(
        router,
        "POST",
        "/api/v1/admin/employees",
        Some(ADMIN),
        Some(json!({ "id": EMPLOYEE, "full_name": "Ivan Petrov", "crew": crew })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn put_record(router: &Router, date: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        "PUT",
        &format!("/api/v1/employees/{}/records/{}", EMPLOYEE, date),
        None,
        Some(body),
    )
    .await
}

async fn session_input(router: &Router, body: Value) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        &format!("/api/v1/employees/{}/session/input", EMPLOYEE),
        None,
        Some(body),
    )
    .await
}

// =============================================================================
// SECTION 1: Schedule
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = create_router_for_test();
    let (status, body) = get(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_epoch_phases_for_every_crew() {
    // On the epoch crew 1 works the day shift and each later crew is one
    // step further along the cycle.
    let router = create_router_for_test();
    let expected = [(1, "day", "12"), (2, "night", "12"), (3, "rest", "0"), (4, "off", "0")];

    for (crew, phase, hours) in expected {
        let (status, body) = get(
            &router,
            &format!("/api/v1/phase?crew={}&date=2024-10-01", crew),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], phase, "crew {}", crew);
        assert_decimal(&body["planned_hours"], hours);
    }
}

#[tokio::test]
async fn test_phase_before_epoch() {
    // Four days before the epoch is the same phase as the epoch itself.
    let router = create_router_for_test();
    let (status, body) = get(&router, "/api/v1/phase?crew=1&date=2024-09-27").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "day");
}

#[tokio::test]
async fn test_calendar_bounds_leap_february() {
    let router = create_router_for_test();
    let (status, body) = get(&router, "/api/v1/calendar/2024/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_day"], "2024-02-01");
    assert_eq!(body["last_day"], "2024-02-29");
}

#[tokio::test]
async fn test_calendar_rejects_month_13() {
    let router = create_router_for_test();
    let (status, body) = get(&router, "/api/v1/calendar/2024/13").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_MONTH");
}

#[tokio::test]
async fn test_month_schedule_lists_every_day() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    put_record(&router, "2024-10-03", json!({ "kind": "reinforce" })).await;

    let (status, body) = get(
        &router,
        &format!("/api/v1/employees/{}/schedule/2024/10", EMPLOYEE),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let days = body.as_array().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[0]["phase"], "day");
    assert_eq!(days[2]["phase"], "rest");
    assert_eq!(days[2]["record"]["kind"], "reinforce");
    assert!(days[3]["record"].is_null());
}

// =============================================================================
// SECTION 2: Daily Records
// =============================================================================

#[tokio::test]
async fn test_record_and_look_up_day() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, record) =
        put_record(&router, "2024-10-02", json!({ "kind": "work", "hours": "11.5" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_decimal(&record["hours"], "11.5");

    let (status, day) = get(
        &router,
        &format!("/api/v1/employees/{}/days/2024-10-02", EMPLOYEE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["phase"], "night");
    assert_decimal(&day["planned_hours"], "12");
    assert_eq!(day["record"]["id"], record["id"]);
}

#[tokio::test]
async fn test_look_up_day_by_relative_text() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    let today = Local::now().date_naive();

    let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
    let (status, day) = get(&router, &format!("/api/v1/employees/{}/days/+1", EMPLOYEE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["date"], tomorrow.to_string());

    let (status, day) = get(
        &router,
        &format!("/api/v1/employees/{}/days/%D0%B7%D0%B0%D0%B2%D1%82%D1%80%D0%B0", EMPLOYEE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["date"], tomorrow.to_string());
}

#[tokio::test]
async fn test_look_up_day_by_day_and_month() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    let today = Local::now().date_naive();

    // An already passed 15 October means next year's
    let year = if (today.month(), today.day()) > (10, 15) {
        today.year() + 1
    } else {
        today.year()
    };
    let expected = NaiveDate::from_ymd_opt(year, 10, 15).unwrap();

    let (status, day) = get(&router, &format!("/api/v1/employees/{}/days/15.10", EMPLOYEE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["date"], expected.to_string());
}

#[tokio::test]
async fn test_look_up_day_by_month_name() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    put_record(&router, "2026-10-15", json!({ "kind": "vacation" })).await;

    let (status, day) = get(
        &router,
        &format!(
            "/api/v1/employees/{}/days/15%20%D0%BE%D0%BA%D1%82%D1%8F%D0%B1%D1%80%D1%8F%202026",
            EMPLOYEE
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["date"], "2026-10-15");
    assert_eq!(day["record"]["kind"], "vacation");
}

#[tokio::test]
async fn test_look_up_day_rejects_unreadable_text() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = get(&router, &format!("/api/v1/employees/{}/days/someday", EMPLOYEE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE");

    let (status, body) = get(&router, &format!("/api/v1/employees/{}/days/31.02", EMPLOYEE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_refused_write_leaves_stored_record() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, first) =
        put_record(&router, "2024-10-01", json!({ "kind": "work", "hours": "12" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = put_record(&router, "2024-10-01", json!({ "kind": "sick" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, day) = get(&router, &format!("/api/v1/employees/{}/days/2024-10-01", EMPLOYEE)).await;
    assert_eq!(day["record"]["id"], first["id"]);
    assert_eq!(day["record"]["kind"], "work");
    assert_decimal(&day["record"]["hours"], "12");
}

#[tokio::test]
async fn test_overwrite_keeps_one_record_per_day() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    put_record(&router, "2024-10-01", json!({ "kind": "work", "hours": 12 })).await;

    let (status, body) = put_record(&router, "2024-10-01", json!({ "kind": "sick" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECORD_CONFLICT");

    let (status, body) = put_record(
        &router,
        "2024-10-01",
        json!({ "kind": "sick", "confirm_overwrite": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "sick");

    let (_, records) = get(&router, &format!("/api/v1/employees/{}/records", EMPLOYEE)).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shift_hours_bounds() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    for hours in ["0.4", "12.5"] {
        let (status, body) =
            put_record(&router, "2024-10-01", json!({ "kind": "work", "hours": hours })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "hours {}", hours);
        assert_eq!(body["code"], "INVALID_HOURS");
    }

    for hours in ["0.5", "12"] {
        let (status, _) = put_record(
            &router,
            "2024-10-01",
            json!({ "kind": "work", "hours": hours, "confirm_overwrite": true }),
        )
        .await;
        assert!(status.is_success(), "hours {}", hours);
    }
}

#[tokio::test]
async fn test_recent_records_newest_first() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    for date in ["2024-10-01", "2024-10-05", "2024-10-02"] {
        put_record(&router, date, json!({ "kind": "work", "hours": "12" })).await;
    }

    let (status, body) = get(
        &router,
        &format!("/api/v1/employees/{}/records?limit=2", EMPLOYEE),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-10-05", "2024-10-02"]);
}

#[tokio::test]
async fn test_delete_record() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    let (_, record) = put_record(&router, "2024-10-01", json!({ "kind": "unpaid" })).await;
    let uri = format!("/api/v1/records/{}", record["id"]);

    let (status, _) = send(&router, "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RECORD_NOT_FOUND");
}

// =============================================================================
// SECTION 3: Reconciliation and Estimate
// =============================================================================

#[tokio::test]
async fn test_empty_month_stats() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, stats) = get(
        &router,
        &format!("/api/v1/employees/{}/stats/2024/10", EMPLOYEE),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["planned_work_days"], 16);
    assert_decimal(&stats["planned_hours"], "192");
    assert_eq!(stats["work_days"], 0);
    assert_decimal(&stats["total_worked_hours"], "0");
}

#[tokio::test]
async fn test_full_month_with_overtime_and_vacation() {
    // Every planned shift worked in full, one reinforcement on a rest day
    // and one vacation day.
    // hour rate = 137500 / 192; adjustment = 12 h x rate = 8593.75
    // total = 137500 + 8593.75 + 4500 = 150593.75
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, _) = send(
        &router,
        "PATCH",
        &format!("/api/v1/admin/employees/{}/rates", EMPLOYEE),
        Some(ADMIN),
        Some(json!({ "vacation_rate": "4500" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for date in CREW_ONE_OCTOBER_SHIFTS {
        put_record(&router, date, json!({ "kind": "work", "hours": "12" })).await;
    }
    put_record(&router, "2024-10-03", json!({ "kind": "reinforce" })).await;
    put_record(&router, "2024-10-04", json!({ "kind": "vacation" })).await;
    // Outside the month, must not count
    put_record(&router, "2024-11-01", json!({ "kind": "reinforce" })).await;

    let (status, body) = get(
        &router,
        &format!("/api/v1/employees/{}/estimate/2024/10", EMPLOYEE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["work_days"], 16);
    assert_decimal(&stats["work_hours"], "192");
    assert_eq!(stats["reinforcement_days"], 1);
    assert_decimal(&stats["total_worked_hours"], "204");
    assert_eq!(stats["vacation_days"], 1);

    let estimate = &body["estimate"];
    assert_decimal(&estimate["hour_rate"], "716.15");
    assert_decimal(&estimate["hours_delta"], "12");
    assert_decimal(&estimate["hours_adjustment"], "8593.75");
    assert_decimal(&estimate["vacation_pay"], "4500");
    assert_decimal(&estimate["total"], "150593.75");
    assert_eq!(estimate["approximate"], true);
    assert_eq!(estimate["audit_steps"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_estimate_uses_current_global_salary() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, _) = send(
        &router,
        "PUT",
        "/api/v1/admin/salary",
        Some(ADMIN),
        Some(json!({ "base_salary": "192000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    put_record(&router, "2024-10-01", json!({ "kind": "work", "hours": "6" })).await;

    // 192000 / 192 = 1000 per hour; 6 - 192 = -186 hours
    let (_, body) = get(
        &router,
        &format!("/api/v1/employees/{}/estimate/2024/10", EMPLOYEE),
    )
    .await;
    let estimate = &body["estimate"];
    assert_decimal(&estimate["hour_rate"], "1000");
    assert_decimal(&estimate["hours_adjustment"], "-186000");
    assert_decimal(&estimate["total"], "6000");
}

#[tokio::test]
async fn test_stats_for_unknown_employee() {
    let router = create_router_for_test();
    let (status, body) = get(&router, "/api/v1/employees/42/stats/2024/10").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
}

// =============================================================================
// SECTION 4: Absence Periods
// =============================================================================

#[tokio::test]
async fn test_period_reports_overlapping_records() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    put_record(&router, "2024-10-21", json!({ "kind": "work", "hours": "12" })).await;
    put_record(&router, "2024-10-22", json!({ "kind": "work", "hours": "12" })).await;
    put_record(&router, "2024-10-25", json!({ "kind": "work", "hours": "12" })).await;

    let periods_uri = format!("/api/v1/employees/{}/periods", EMPLOYEE);
    let (status, body) = send(
        &router,
        "POST",
        &periods_uri,
        None,
        Some(json!({ "kind": "vacation", "start": "2024-10-20", "end": "2024-10-23" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["overlapping_records"].as_array().unwrap().len(), 2);

    // Records inside the period stay as they were
    let (_, day) = get(
        &router,
        &format!("/api/v1/employees/{}/days/2024-10-21", EMPLOYEE),
    )
    .await;
    assert_eq!(day["record"]["kind"], "work");

    let (_, overlaps) = get(
        &router,
        &format!(
            "/api/v1/employees/{}/overlaps?start=2024-10-24&end=2024-10-31",
            EMPLOYEE
        ),
    )
    .await;
    assert_eq!(overlaps.as_array().unwrap().len(), 1);

    let (status, periods) = get(&router, &format!("{}?kind=vacation", periods_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(periods.as_array().unwrap().len(), 1);

    let (_, sick) = get(&router, &format!("{}?kind=sick", periods_uri)).await;
    assert!(sick.as_array().unwrap().is_empty());

    let delete_uri = format!("/api/v1/periods/{}", body["period"]["id"]);
    let (status, _) = send(&router, "DELETE", &delete_uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, "DELETE", &delete_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inverted_period_rejected() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/v1/employees/{}/periods", EMPLOYEE),
        None,
        Some(json!({ "kind": "sick", "start": "2024-10-10", "end": "2024-10-09" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RANGE");
}

// =============================================================================
// SECTION 5: Entry Dialog
// =============================================================================

#[tokio::test]
async fn test_shift_entry_dialog() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/v1/employees/{}/session", EMPLOYEE),
        None,
        Some(json!({ "mode": "record", "entry": "shift" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["state"], "awaiting_date");

    let (status, body) = session_input(&router, json!({ "type": "date", "text": "05.11.2024" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["state"], "awaiting_hours");

    let (status, body) = session_input(&router, json!({ "type": "hours", "hours": "20" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_HOURS");

    let (status, body) = session_input(&router, json!({ "type": "hours", "hours": "10" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["event"], "record_saved");
    assert_eq!(body["event"]["record"]["date"], "2024-11-05");
    assert_eq!(body["state"]["state"], "idle");

    let (_, body) = get(&router, &format!("/api/v1/employees/{}/session", EMPLOYEE)).await;
    assert_eq!(body["state"]["state"], "idle");
}

#[tokio::test]
async fn test_entry_dialog_asks_before_overwrite() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;
    put_record(&router, "2024-10-01", json!({ "kind": "work", "hours": "12" })).await;

    send(
        &router,
        "POST",
        &format!("/api/v1/employees/{}/session", EMPLOYEE),
        None,
        Some(json!({ "mode": "record", "entry": "sick" })),
    )
    .await;

    let (_, body) = session_input(&router, json!({ "type": "date", "text": "2024-10-01" })).await;
    assert_eq!(body["state"]["state"], "awaiting_overwrite");
    assert_eq!(body["state"]["existing"]["kind"], "work");

    let (_, body) = session_input(&router, json!({ "type": "decline" })).await;
    assert_eq!(body["event"]["event"], "cancelled");

    let (_, day) = get(
        &router,
        &format!("/api/v1/employees/{}/days/2024-10-01", EMPLOYEE),
    )
    .await;
    assert_eq!(day["record"]["kind"], "work");
}

#[tokio::test]
async fn test_period_entry_dialog() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    send(
        &router,
        "POST",
        &format!("/api/v1/employees/{}/session", EMPLOYEE),
        None,
        Some(json!({ "mode": "period", "kind": "sick" })),
    )
    .await;

    session_input(&router, json!({ "type": "date", "text": "2024-10-10" })).await;
    let (_, body) = session_input(&router, json!({ "type": "date", "text": "2024-10-12" })).await;
    assert_eq!(body["state"]["state"], "awaiting_period_confirm");

    let (status, body) = session_input(&router, json!({ "type": "confirm" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["event"], "period_saved");
    assert_eq!(body["event"]["period"]["end"], "2024-10-12");
}

#[tokio::test]
async fn test_unparseable_date_keeps_dialog_open() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    send(
        &router,
        "POST",
        &format!("/api/v1/employees/{}/session", EMPLOYEE),
        None,
        Some(json!({ "mode": "record", "entry": "vacation" })),
    )
    .await;

    let (status, body) = session_input(&router, json!({ "type": "date", "text": "someday" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE");

    let (_, body) = get(&router, &format!("/api/v1/employees/{}/session", EMPLOYEE)).await;
    assert_eq!(body["state"]["state"], "awaiting_date");
}

#[tokio::test]
async fn test_input_without_dialog_is_invalid_transition() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = session_input(&router, json!({ "type": "confirm" })).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

// =============================================================================
// SECTION 6: Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/employees/{}/records/2024-10-01", EMPLOYEE))
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = put_record(&router, "2024-10-01", json!({ "hours": "12" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let router = create_router_for_test();

    let (status, _) = send(&router, "GET", "/api/v1/admin/employees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, "GET", "/api/v1/admin/employees", Some(EMPLOYEE), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&router, "GET", "/api/v1/admin/employees", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_phase_query_is_json_error() {
    let router = create_router_for_test();

    let (status, body) = get(&router, "/api/v1/phase?crew=300&date=2024-10-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUERY");

    let (status, body) = get(&router, "/api/v1/phase?crew=1&date=01.10.2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_bad_range_query_is_json_error() {
    let router = create_router_for_test();
    register_employee(&router, 1).await;

    let (status, body) = get(
        &router,
        &format!("/api/v1/employees/{}/overlaps?start=2024-10-01", EMPLOYEE),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUERY");
    assert!(body["message"].as_str().unwrap().contains("end"));
}
