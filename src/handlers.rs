// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the telemetry gate.
//!
//! `/collect` runs admission control before the body is even decoded, so a
//! client flooding malformed payloads spends its budget like anyone else.

use crate::client_ip::resolve_client_key;
use crate::config::{Config, MetricsConfig};
use crate::error::CollectError;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::Metrics;
use crate::telemetry::TelemetryRecord;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub metrics: Metrics,
    pub config: Config,
}

/// Envelope for every `/collect` response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TelemetryRecord>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: TelemetryRecord) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: None,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
///
/// Every `OPTIONS` request, preflight or not, is answered by the CORS layer.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app: Router<Arc<AppState>> = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/collect", post(collect).fallback(method_not_allowed));

    let metrics_config = &state.config.metrics;
    if metrics_config.enabled {
        if MetricsConfig::is_valid_path(&metrics_config.path) {
            app = app.route(&metrics_config.path, get(metrics));
        } else {
            warn!(
                path = %metrics_config.path,
                "Metrics path collides with a service route, metrics not served"
            );
        }
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "telemetry-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept a device telemetry submission.
///
/// The peer address is optional so the router can be driven in-process
/// without connect info; the key then comes from forwarding headers alone.
pub async fn collect(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CollectError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let client = resolve_client_key(&headers, peer);

    let remaining = match state.limiter.check(&client) {
        RateLimitResult::Allowed { remaining, .. } => {
            state.metrics.record_admission(true);
            remaining
        }
        RateLimitResult::Limited { retry_after } => {
            state.metrics.record_admission(false);
            info!(
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "Request rate limited"
            );
            return Err(CollectError::RateLimited { retry_after });
        }
    };

    debug!(
        client = %client,
        content_type = ?headers.get(header::CONTENT_TYPE),
        content_length = body.len(),
        remaining,
        "Processing telemetry submission"
    );

    let record = TelemetryRecord::decode(&body).map_err(|err| {
        state.metrics.record_malformed();
        warn!(client = %client, error = %err, "Malformed telemetry payload");
        CollectError::from(err)
    })?;
    let record = record.finalize(&client, Local::now());

    info!(
        timestamp = %record.timestamp,
        client = %record.ip_address,
        user_agent = %record.user_agent,
        "Collected device information"
    );

    Ok((
        StatusCode::OK,
        [("X-RateLimit-Remaining", remaining.to_string())],
        Json(ApiResponse::success(
            "Device information collected successfully",
            record,
        )),
    )
        .into_response())
}

async fn method_not_allowed(method: Method) -> impl IntoResponse {
    debug!(%method, "Rejected non-POST request to /collect");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error("Only POST method is allowed")),
    )
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
