// HTTP REST API Server Implementation
// JSON API over the suggestion service: prefix reads, frequency writes,
// health and stats.

use anyhow::Result;
use axum::{
    extract::{Query as AxumQuery, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::contracts::Suggestion;
use crate::observability::{counter_snapshot, CounterSnapshot};
use crate::service::{ServiceError, SuggestionService};

// Global server start time for uptime tracking
static SERVER_START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<SuggestionService>,
}

/// Query-string parameters for both search endpoints
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// One suggestion on the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
    pub frequency: u64,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(s: Suggestion) -> Self {
        Self {
            suggestion: s.text,
            frequency: s.frequency,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Pipeline counters for the stats endpoint
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub counters: CounterSnapshot,
}

fn error_status(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(e: &ServiceError) -> ErrorResponse {
    let kind = match e {
        ServiceError::Validation(_) => "invalid_query",
        ServiceError::Store(_) => "store_unavailable",
    };
    ErrorResponse {
        error: kind.to_string(),
        message: e.to_string(),
    }
}

/// Create the HTTP server with all routes configured
pub fn create_server(service: Arc<SuggestionService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(health_check))
        .route("/search/suggestion", get(get_suggestions))
        .route("/search/query", post(update_query_frequency))
        .route("/stats", get(get_stats))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Start the HTTP server on the specified port
pub async fn start_server(service: Arc<SuggestionService>, port: u16) -> Result<()> {
    let app = create_server(service);
    let listener = TcpListener::bind(&format!("0.0.0.0:{port}")).await?;

    info!("Typeahead HTTP server starting on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    let uptime_seconds = SERVER_START_TIME.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}

/// GET /search/suggestion?query=<prefix>
/// Returns the top-K suggestions sharing the prefix, frequency descending.
async fn get_suggestions(
    State(state): State<AppState>,
    AxumQuery(params): AxumQuery<SearchParams>,
) -> Result<Json<Vec<SuggestionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let query = params.query.unwrap_or_default();

    match state.service.get_top_suggestions(&query) {
        Ok(suggestions) => Ok(Json(
            suggestions.into_iter().map(SuggestionResponse::from).collect(),
        )),
        Err(e) => {
            if matches!(e, ServiceError::Store(_)) {
                warn!("Suggestion fetch failed: {}", e);
            }
            Err((error_status(&e), Json(error_body(&e))))
        }
    }
}

/// POST /search/query?query=<text>
/// Increments the persisted frequency; visible to reads after the next
/// reload cycle.
async fn update_query_frequency(
    State(state): State<AppState>,
    AxumQuery(params): AxumQuery<SearchParams>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let query = params.query.unwrap_or_default();

    match state.service.update_query_frequency(&query).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            if matches!(e, ServiceError::Store(_)) {
                warn!("Frequency update failed: {}", e);
            }
            Err((error_status(&e), Json(error_body(&e))))
        }
    }
}

/// Pipeline counters
async fn get_stats() -> Json<StatsResponse> {
    Json(StatsResponse {
        counters: counter_snapshot(),
    })
}
