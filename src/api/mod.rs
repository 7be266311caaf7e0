//! HTTP API for the shift ledger.
//!
//! This module exposes the schedule, reconciliation, estimate, record,
//! absence-period and entry-session operations as REST endpoints, plus the
//! administrator endpoints guarded by the access policy.

mod admin;
mod handlers;
mod request;
mod response;
mod state;

pub use admin::USER_ID_HEADER;
pub use handlers::create_router;
pub use request::{
    LimitQuery, PeriodListQuery, PeriodRequest, PhaseQuery, RangeQuery, RecordRequest,
    SalaryRequest, SessionInputRequest, SessionStartRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, EstimateResponse, MonthBoundsResponse, PeriodCreatedResponse,
    PhaseResponse, SessionResponse,
};
pub use state::{AppState, SharedStore};
