use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::OpenApi;

use super::{
    dto::{ChartPoint, ChartQuery, ErrorResponse, ManualLogRequest, MessageResponse},
    errors::AppError,
    AppState,
};
use crate::{clock::display_time, db::models::level_from_json, range::RangeSelector};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Readings from the selected trailing window, oldest first, with IST display
/// timestamps.
#[utoipa::path(
    get,
    path = "/api/chart-data",
    params(ChartQuery),
    responses(
        (status = 200, description = "Readings in the selected window", body = Vec<ChartPoint>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    tag = "readings"
)]
pub async fn get_chart_data(
    State(state): State<AppState>,
    params: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    // A query string we cannot read (e.g. `range` given twice) selects the default window.
    let range = match params {
        Ok(Query(params)) => RangeSelector::from_param(params.range.as_deref()),
        Err(e) => {
            debug!(error = %e.body_text(), "Unreadable chart query, using default range");
            RangeSelector::default()
        }
    };
    let since = range.lower_bound(state.clock.now());
    let rows = state.store.readings_since(since).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Record a reading supplied by the caller, timestamped now.
#[utoipa::path(
    post,
    path = "/api/manual-log",
    request_body = ManualLogRequest,
    responses(
        (status = 200, description = "Reading stored", body = MessageResponse),
        (status = 400, description = "Missing or non-numeric level", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    tag = "readings"
)]
pub async fn manual_log(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) =
        body.map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;
    let level = level_from_json(&body)
        .ok_or_else(|| AppError::BadRequest("Invalid level value".to_owned()))?;

    let reading = state.store.insert(level, state.clock.now()).await?;
    let at = display_time(reading.timestamp);
    info!(level = reading.level, at = %at, "Manually logged reading");

    Ok(Json(MessageResponse {
        message: format!("Manually inserted level: {} at {}", reading.level, at),
    }))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_chart_data, manual_log, health),
    components(schemas(ChartPoint, ManualLogRequest, MessageResponse, ErrorResponse)),
    tags(
        (name = "readings", description = "Water level readings"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Water Level Logger API",
        version = "0.1.0",
        description = "Hourly water level readings with manual logging"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
