//! HTTP API routes for the analytics dashboard
//!
//! ## Endpoints
//!
//! - `POST /api/query`        - Translate a natural-language question to SQL and run it
//! - `GET  /api/kpis`         - Business KPIs
//! - `GET  /api/chart/:kind`  - Chart aggregate series
//! - `GET  /metrics`          - Prometheus text exposition
//! - `GET  /health`           - Liveness check

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::ai::SqlGenerator;
use crate::analytics::{AnalyticsEngine, ChartKind, Kpis};
use crate::db::Database;
use crate::error::InsightlineError;

// ── Shared state ────────────────────────────────────────────────────────

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<Database>,
    pub analytics: Arc<AnalyticsEngine>,
    pub generator: Arc<SqlGenerator>,
    pub metrics_handle: PrometheusHandle,
}

// ── Request / Response types ────────────────────────────────────────────

/// Request body for `POST /api/query`.
#[derive(Debug, Deserialize)]
pub struct NlQueryRequest {
    /// The natural-language question. Presence is checked in the handler so
    /// an empty body yields a 400 rather than an extractor rejection.
    #[serde(default)]
    pub query: Option<String>,
}

/// Successful response for `POST /api/query`.
#[derive(Debug, Serialize)]
pub struct NlQueryResponse {
    /// The SQL the translator produced.
    pub sql_query: String,
    /// Result rows as objects keyed by column name, in column order.
    pub results: Vec<serde_json::Map<String, serde_json::Value>>,
    /// Number of rows returned.
    pub count: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ── Router creation ─────────────────────────────────────────────────────

/// Build the axum router for the dashboard API.
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/query", post(nl_query_handler))
        .route("/api/kpis", get(kpis_handler))
        .route("/api/chart/:kind", get(chart_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

// ── Handler implementations ─────────────────────────────────────────────

/// `POST /api/query` -- translate a question and execute the generated SQL.
async fn nl_query_handler(
    State(state): State<ApiState>,
    Json(request): Json<NlQueryRequest>,
) -> Result<Json<NlQueryResponse>, ApiError> {
    let question = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("No query provided".to_string()))?;

    info!(question = %question, "Handling natural-language query");

    let sql_query = state.generator.generate_sql(question).await?;

    // The generated statement runs verbatim: it is not parsed or
    // whitelisted to SELECT-only before execution.
    let result = state.db.execute_query(&sql_query)?;
    let results = result.to_objects();
    let count = results.len();

    info!(rows = count, "Natural-language query executed");

    Ok(Json(NlQueryResponse {
        sql_query,
        results,
        count,
    }))
}

/// `GET /api/kpis` -- business KPIs.
async fn kpis_handler(State(state): State<ApiState>) -> Result<Json<Kpis>, ApiError> {
    let kpis = state.analytics.kpis()?;
    Ok(Json(kpis))
}

/// `GET /api/chart/:kind` -- fixed chart aggregates.
async fn chart_handler(
    State(state): State<ApiState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<serde_json::Map<String, serde_json::Value>>>, ApiError> {
    let kind: ChartKind = kind.parse()?;
    let result = state.analytics.chart_data(kind)?;
    Ok(Json(result.to_objects()))
}

/// `GET /metrics` -- Prometheus text exposition.
async fn metrics_handler(State(state): State<ApiState>) -> Response {
    let body = state.metrics_handle.render();
    ([("content-type", "text/plain; version=0.0.4")], body).into_response()
}

/// `GET /health` -- liveness check.
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

// ── Error type ──────────────────────────────────────────────────────────

/// API error type mapping the error taxonomy to HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request input (400).
    Validation(String),
    /// Unknown chart kind or similar closed-set violation (400).
    InvalidArgument(String),
    /// Translation or execution failure (500).
    Internal(String),
}

impl From<InsightlineError> for ApiError {
    fn from(err: InsightlineError) -> Self {
        match err {
            InsightlineError::Validation(msg) => ApiError::Validation(msg),
            InsightlineError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                warn!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
