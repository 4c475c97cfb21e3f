// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and speak JSON to the browser UI.
//
// Status codes:
//   - 400 with `{ "error": ... }` when request parameters fail validation.
//     The provider is never contacted in that case.
//   - 200 with an empty series / null profile plus a `reason` when the
//     provider could not deliver. The UI renders empty charts.
//
// CORS is configured permissively; the UI is served from another origin
// during development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::error::{ProviderError, ValidationError};
use crate::market_data::{EnrichedSeries, LatestReading};
use crate::service::{ComparisonOutcome, ProfileOutcome};
use crate::types::{AlertDirection, Interval, Period};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(err: ValidationError) -> ApiError {
    warn!(error = %err, "rejected request parameters");
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}

fn record_failure(state: &AppState, context: &str, err: &ProviderError) {
    state.push_error(format!("{context}: {err}"), Some(err.code().to_string()));
}

fn record_no_data<T>(state: &AppState, context: &str, outcome: &ComparisonOutcome<T>) {
    if let ComparisonOutcome::NoData { reason, code } = outcome {
        state.push_error(format!("{context}: {reason}"), Some(code.to_string()));
    }
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/symbols", get(symbols))
        .route("/api/v1/series", get(series))
        .route("/api/v1/profile/:symbol", get(profile))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/alert", post(alert))
        .route("/api/v1/status", get(status))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Selector options
// =============================================================================

#[derive(Serialize)]
struct SymbolsResponse<'a> {
    symbols: &'a [String],
    periods: Vec<&'static str>,
    intervals: Vec<&'static str>,
    default_period: Period,
    default_interval: Interval,
}

async fn symbols(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = SymbolsResponse {
        symbols: state.service.symbols(),
        periods: Period::ALL.iter().map(Period::as_str).collect(),
        intervals: Interval::ALL.iter().map(Interval::as_str).collect(),
        default_period: state.config.default_period,
        default_interval: state.config.default_interval,
    };
    Json(serde_json::to_value(body).unwrap_or_default())
}

// =============================================================================
// Enriched series
// =============================================================================

#[derive(Deserialize)]
struct SeriesQuery {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

#[derive(Serialize)]
struct SeriesResponse<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    series: &'a EnrichedSeries,
    latest: Option<LatestReading>,
}

async fn series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Unset selectors fall back to the dashboard defaults.
    let symbol = query
        .symbol
        .or_else(|| state.service.symbols().first().cloned())
        .unwrap_or_default();
    let period = query
        .period
        .unwrap_or_else(|| state.config.default_period.to_string());
    let interval = query
        .interval
        .unwrap_or_else(|| state.config.default_interval.to_string());

    let outcome = state
        .service
        .get_series(&symbol, &period, &interval)
        .await
        .map_err(bad_request)?;

    if let Some(reason) = outcome.reason() {
        record_failure(&state, &outcome.series().key.to_string(), reason);
    }

    let series = outcome.series();
    let body = SeriesResponse {
        status: outcome.status(),
        reason: outcome.reason().map(ToString::to_string),
        code: outcome.reason().map(ProviderError::code),
        series: series.as_ref(),
        latest: series.latest(),
    };
    Ok(Json(serde_json::to_value(body).unwrap_or_default()))
}

// =============================================================================
// Company profile
// =============================================================================

async fn profile(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .service
        .get_company_profile(&symbol)
        .await
        .map_err(bad_request)?;

    let body = match outcome {
        ProfileOutcome::Found(profile) => serde_json::json!({ "profile": profile }),
        ProfileOutcome::Absent(err) => {
            record_failure(&state, &format!("{} profile", symbol.trim().to_uppercase()), &err);
            serde_json::json!({
                "profile": null,
                "reason": err.to_string(),
                "code": err.code(),
            })
        }
    };
    Ok(Json(body))
}

// =============================================================================
// Manual comparison tools
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeRequest {
    symbol: String,
    target_price: f64,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .service
        .analyze_price(&req.symbol, req.target_price)
        .await
        .map_err(bad_request)?;
    record_no_data(
        &state,
        &format!("{} analyze", req.symbol.trim().to_uppercase()),
        &outcome,
    );
    Ok(Json(serde_json::to_value(outcome).unwrap_or_default()))
}

#[derive(Deserialize)]
struct AlertRequest {
    symbol: String,
    target_price: f64,
    direction: AlertDirection,
}

async fn alert(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .service
        .set_price_alert(&req.symbol, req.target_price, req.direction)
        .await
        .map_err(bad_request)?;
    record_no_data(
        &state,
        &format!("{} alert", req.symbol.trim().to_uppercase()),
        &outcome,
    );
    Ok(Json(serde_json::to_value(outcome).unwrap_or_default()))
}

// =============================================================================
// Operational status
// =============================================================================

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "uptime_secs": state.uptime_secs(),
        "cache": state.service.cache_stats(),
        "recent_errors": state.recent_errors(),
    }))
}
