//! JSON API — the web-handler seam around the scan service
//!
//! Serves scan submission, dashboard statistics and threat/intel listings.
//! Authentication, HTML and pagination UI live outside this binary.

use crate::dashboard::DashboardReport;
use crate::scanner::ScanService;
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use phishlens_core::types::ThreatStatus;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ScanService>,
    pub start_time: i64,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/scan/url", post(scan_url))
        .route("/api/scan/email", post(scan_email))
        .route("/api/dashboard", get(dashboard))
        .route("/api/threats", get(list_threats))
        .route("/api/threats/:id/status", post(set_threat_status))
        .route("/api/intel", get(list_indicators))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(state: ApiState, bind_addr: &str) -> Result<(), String> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| format!("failed to bind API to {}: {}", bind_addr, e))?;

    info!(addr = %bind_addr, "API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| format!("API server error: {}", e))
}

// ── Requests ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UrlScanRequest {
    url: String,
    actor: Option<String>,
}

#[derive(Deserialize)]
struct EmailScanRequest {
    subject: String,
    body: String,
    actor: Option<String>,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct StatusRequest {
    status: ThreatStatus,
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn scan_url(
    State(state): State<ApiState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(req): Json<UrlScanRequest>,
) -> impl IntoResponse {
    let report = state.service.scan_url(
        &req.url,
        req.actor.as_deref(),
        Some(&peer.ip().to_string()),
    );
    Json(report)
}

async fn scan_email(
    State(state): State<ApiState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(req): Json<EmailScanRequest>,
) -> impl IntoResponse {
    let report = state.service.scan_email(
        &req.subject,
        &req.body,
        req.actor.as_deref(),
        Some(&peer.ip().to_string()),
    );
    Json(report)
}

async fn dashboard(State(state): State<ApiState>) -> impl IntoResponse {
    let service = &state.service;
    Json(DashboardReport::build(
        &service.intel,
        &service.scans,
        &service.threats,
        state.start_time,
    ))
}

async fn list_threats(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    Json(state.service.threats.recent(query.limit.unwrap_or(20)))
}

async fn set_threat_status(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
    Json(req): Json<StatusRequest>,
) -> impl IntoResponse {
    match state.service.threats.set_status(id, req.status) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn list_indicators(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    Json(state.service.intel.recent(query.limit.unwrap_or(20)))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "healthy": true })))
}
