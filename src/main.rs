// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Telemetry Gate Service
//!
//! Accepts device telemetry on `POST /collect`, rate limited per client, and
//! echoes each admitted record back stamped with the receive time and the
//! resolved client address.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:`PORT`)
//! - `PORT`: Listen port when `BIND_ADDR` is unset (default: 8080)
//! - `MAX_REQUESTS`: Max admissions per client per window (default: 30)
//! - `WINDOW_SECS`: Admission window length in seconds (default: 60)
//! - `CLEANUP_INTERVAL_SECS`: Idle client eviction interval, 0 disables (default: 0)
//! - `METRICS_ENABLED`: Serve Prometheus metrics (default: true)
//! - `METRICS_PATH`: Metrics endpoint path (default: /metrics)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use telemetry_gate::{
    config::{Config, MetricsConfig, RateLimitConfig},
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        cleanup_interval_secs = config.rate_limit.cleanup_interval_secs,
        metrics_enabled = config.metrics.enabled,
        "Starting telemetry gate"
    );

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Idle client keys are kept forever unless the sweep is enabled
    if let Some(every) = config.rate_limit.cleanup_interval() {
        let cleanup_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let evicted = cleanup_state.limiter.cleanup();
                debug!(evicted, "Evicted idle client keys");
            }
        });
    }

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        format!("0.0.0.0:{port}")
    });

    let defaults = MetricsConfig::default();
    let metrics_path = std::env::var("METRICS_PATH")
        .ok()
        .filter(|p| MetricsConfig::is_valid_path(p))
        .unwrap_or(defaults.path);

    Config {
        bind_addr,
        rate_limit: RateLimitConfig {
            max_requests: env_or("MAX_REQUESTS", 30),
            window_secs: env_or("WINDOW_SECS", 60),
            cleanup_interval_secs: env_or("CLEANUP_INTERVAL_SECS", 0),
        },
        metrics: MetricsConfig {
            enabled: env_or("METRICS_ENABLED", defaults.enabled),
            path: metrics_path,
        },
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
