//! Administrator endpoints.
//!
//! Every handler here reads the caller's numeric id from the
//! [`USER_ID_HEADER`] header and checks it against the configured
//! [`AccessPolicy`](crate::access::AccessPolicy) before touching the store.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Employee, NewEmployee, RateUpdate, SystemSettings};

use super::handlers::{json_response, parse_body, respond};
use super::request::SalaryRequest;
use super::response::ApiError;
use super::state::AppState;

/// Header carrying the caller's numeric id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Checks that the caller named in `headers` is an administrator.
fn authorize(correlation_id: Uuid, state: &AppState, headers: &HeaderMap) -> Result<i64, Response> {
    let caller = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let Some(caller) = caller else {
        warn!(correlation_id = %correlation_id, "Admin request without caller id");
        return Err(json_response(
            StatusCode::UNAUTHORIZED,
            ApiError::unauthenticated(USER_ID_HEADER),
        ));
    };

    state
        .access()
        .require_admin(caller)
        .map(|()| caller)
        .map_err(|e| respond::<()>(correlation_id, StatusCode::OK, Err(e)))
}

/// Handler for GET /api/v1/admin/employees.
pub(super) async fn list_employees_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(response) = authorize(correlation_id, &state, &headers) {
        return response;
    }
    respond(correlation_id, StatusCode::OK, state.store().list_employees())
}

/// Handler for POST /api/v1/admin/employees.
pub(super) async fn create_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(correlation_id, &state, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let mut employee = match parse_body(correlation_id, payload) {
        Ok(employee) => employee,
        Err(response) => return response,
    };

    employee.full_name = employee.full_name.trim().to_string();
    if employee.full_name.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("full_name must not be empty"),
        );
    }

    let result = state.store().add_employee(&employee);
    if let Ok(created) = &result {
        info!(
            correlation_id = %correlation_id,
            caller,
            employee_id = created.id,
            crew = created.crew.number(),
            "Employee registered"
        );
    }
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Handler for PATCH /api/v1/admin/employees/:employee_id/rates.
pub(super) async fn update_rates_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<i64>,
    payload: Result<Json<RateUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(correlation_id, &state, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let update = match parse_body(correlation_id, payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    if update.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("Provide vacation_rate, sick_rate or both"),
        );
    }

    let result: EngineResult<Employee> = update
        .validate()
        .and_then(|()| state.store().update_employee_rates(employee_id, &update));
    if result.is_ok() {
        info!(correlation_id = %correlation_id, caller, employee_id, "Absence rates updated");
    }
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /api/v1/admin/salary.
pub(super) async fn get_salary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(response) = authorize(correlation_id, &state, &headers) {
        return response;
    }
    respond(correlation_id, StatusCode::OK, state.store().get_settings())
}

/// Handler for PUT /api/v1/admin/salary.
pub(super) async fn set_salary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(correlation_id, &state, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let store = state.store();
    let result: EngineResult<SystemSettings> = store
        .set_global_salary(request.base_salary)
        .and_then(|()| store.get_settings());
    if result.is_ok() {
        info!(
            correlation_id = %correlation_id,
            caller,
            base_salary = %request.base_salary,
            "Global base salary changed"
        );
    }
    respond(correlation_id, StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessPolicy;
    use crate::api::create_router;
    use crate::config::AppConfig;
    use crate::store::SqliteStore;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tower::ServiceExt;

    const ADMIN: i64 = 123456789;

    fn create_test_router() -> Router {
        let config = AppConfig {
            access: AccessPolicy::new([ADMIN]),
            ..AppConfig::default()
        };
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        create_router(AppState::new(config, store))
    }

    fn admin_request(method: &str, uri: &str, caller: Option<i64>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(caller) = caller {
            builder = builder.header(USER_ID_HEADER, caller.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthenticated() {
        let (status, body) = send(
            create_test_router(),
            admin_request("GET", "/api/v1/admin/employees", None, ""),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let (status, body) = send(
            create_test_router(),
            admin_request("GET", "/api/v1/admin/salary", Some(7), ""),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_register_and_update_employee() {
        let router = create_test_router();

        let (status, body) = send(
            router.clone(),
            admin_request(
                "POST",
                "/api/v1/admin/employees",
                Some(ADMIN),
                r#"{"id": 1001, "full_name": "  Ivan Petrov ", "crew": 2}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let employee: Employee = serde_json::from_slice(&body).unwrap();
        assert_eq!(employee.full_name, "Ivan Petrov");
        assert_eq!(employee.vacation_rate, Decimal::ZERO);

        let (status, body) = send(
            router.clone(),
            admin_request(
                "PATCH",
                "/api/v1/admin/employees/1001/rates",
                Some(ADMIN),
                r#"{"sick_rate": "3000"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let employee: Employee = serde_json::from_slice(&body).unwrap();
        assert_eq!(employee.sick_rate, Decimal::new(3000, 0));
        assert_eq!(employee.vacation_rate, Decimal::ZERO);

        let (status, _) = send(
            router,
            admin_request(
                "POST",
                "/api/v1/admin/employees",
                Some(ADMIN),
                r#"{"id": 1001, "full_name": "Someone Else", "crew": 1}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (status, body) = send(
            create_test_router(),
            admin_request(
                "POST",
                "/api/v1/admin/employees",
                Some(ADMIN),
                r#"{"id": 1, "full_name": "   ", "crew": 1}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_salary_update() {
        let router = create_test_router();

        let (status, body) = send(
            router.clone(),
            admin_request(
                "PUT",
                "/api/v1/admin/salary",
                Some(ADMIN),
                r#"{"base_salary": "150000"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let settings: SystemSettings = serde_json::from_slice(&body).unwrap();
        assert_eq!(settings.base_salary, Decimal::new(150000, 0));
        assert!(settings.updated_at.is_some());

        let (status, body) = send(
            router,
            admin_request(
                "PUT",
                "/api/v1/admin/salary",
                Some(ADMIN),
                r#"{"base_salary": "-1"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_AMOUNT");
    }
}
