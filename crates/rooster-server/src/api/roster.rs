use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use rooster_core::{shift_line, to_date_map, today_in, Day, OutputFormat, RosterFilter};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Default, Deserialize)]
pub(super) struct RosterQuery {
    pub only: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<String>,
    pub format: Option<String>,
}

/// `GET /rooster`: every parsed day, filtered. `format=string` is not offered
/// here and falls back to the date-keyed object.
pub(super) async fn get_rooster(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RosterQuery>,
) -> Result<Response, ApiError> {
    let days = fetch_filtered(&state, req_id.0, &query, false).await?;
    let response = match OutputFormat::parse(query.format.as_deref()) {
        OutputFormat::Array => Json(days).into_response(),
        OutputFormat::Object | OutputFormat::String => Json(to_date_map(&days)).into_response(),
    };
    Ok(response)
}

/// `GET /shifts`: only days with at least one assignment, filtered.
pub(super) async fn get_shifts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RosterQuery>,
) -> Result<Response, ApiError> {
    let days = fetch_filtered(&state, req_id.0, &query, true).await?;
    let response = match OutputFormat::parse(query.format.as_deref()) {
        OutputFormat::Array => Json(days).into_response(),
        OutputFormat::Object => Json(to_date_map(&days)).into_response(),
        OutputFormat::String => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            shift_line(&days),
        )
            .into_response(),
    };
    Ok(response)
}

async fn fetch_filtered(
    state: &AppState,
    request_id: String,
    query: &RosterQuery,
    assigned_only: bool,
) -> Result<Vec<Day>, ApiError> {
    let filter = RosterFilter::from_params(
        query.only.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        query.days.as_deref(),
    )
    .map_err(|e| ApiError::bad_request(request_id.clone(), e.to_string()))?;

    let mut days = match tokio::time::timeout(state.fetch_deadline, state.roster.get_roster()).await
    {
        Ok(Ok(days)) => days,
        Ok(Err(e)) => return Err(ApiError::from_portal(request_id, &e)),
        Err(_) => {
            tracing::error!(
                %request_id,
                deadline_secs = state.fetch_deadline.as_secs_f64(),
                "roster fetch timed out"
            );
            return Err(ApiError::timeout(request_id, state.fetch_deadline));
        }
    };

    if assigned_only {
        days.retain(Day::has_assignment);
    }
    Ok(filter.apply(&days, today_in(state.timezone)))
}
