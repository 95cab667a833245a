// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the telemetry gate.

use crate::handlers::ApiResponse;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;

/// Reasons a submission to `/collect` is turned away.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Too many requests, please try again later")]
    RateLimited { retry_after: Duration },

    #[error("Invalid JSON format: {0}")]
    MalformedInput(#[from] serde_json::Error),
}

impl CollectError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for CollectError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ApiResponse::error(self.to_string()));
        match self {
            Self::RateLimited { retry_after } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs(retry_after).to_string())],
                body,
            )
                .into_response(),
            Self::MalformedInput(_) => (status, body).into_response(),
        }
    }
}

/// Failures rendering the metrics exposition.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Whole seconds, rounded up so clients never retry early.
fn retry_after_secs(retry_after: Duration) -> u64 {
    retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0)
}
