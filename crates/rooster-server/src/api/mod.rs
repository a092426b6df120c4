mod roster;

use std::time::Duration;

use axum::{
    http::{HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rooster_portal::{ErrorClass, ErrorReport, PortalError, RosterClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub roster: RosterClient,
    /// Portal timezone; decides what "today" means for filters.
    pub timezone: Tz,
    /// Upper bound on one login/fetch/parse cycle.
    pub fetch_deadline: Duration,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Error envelope: `{ "error": ErrorReport, "meta": { request_id, timestamp } }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: ErrorReport,
    pub meta: ResponseMeta,
}

impl ApiError {
    pub fn new(request_id: impl Into<String>, status: StatusCode, error: ErrorReport) -> Self {
        Self {
            status,
            error,
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            request_id,
            StatusCode::BAD_REQUEST,
            ErrorReport::other("BAD_REQUEST", message),
        )
    }

    pub fn timeout(request_id: impl Into<String>, deadline: Duration) -> Self {
        Self::new(
            request_id,
            StatusCode::GATEWAY_TIMEOUT,
            ErrorReport::other(
                "TIMEOUT",
                format!("roster fetch exceeded {}s", deadline.as_secs_f64()),
            ),
        )
    }

    /// Maps a portal failure onto an HTTP status by its error class.
    pub fn from_portal(request_id: impl Into<String>, error: &PortalError) -> Self {
        let status = match error.kind().class() {
            ErrorClass::Auth => StatusCode::UNAUTHORIZED,
            ErrorClass::NoData => StatusCode::NOT_FOUND,
            ErrorClass::Server => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %error, kind = error.kind().code(), "roster fetch failed");
        } else {
            tracing::warn!(error = %error, kind = error.kind().code(), "roster fetch rejected");
        }
        Self::new(request_id, status, error.report())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn roster_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/rooster", get(roster::get_rooster))
        .route("/shifts", get(roster::get_shifts))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(roster_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
