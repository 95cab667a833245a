// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the telemetry gate.
//!
//! Defaults reproduce the limits the collection endpoint has always run
//! with: 30 accepted submissions per client per rolling minute.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the telemetry gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Admission control configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window admission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admissions per client within one window (default: 30)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Length of the trailing window in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps evicting idle client keys, in seconds.
    /// Zero disables the sweep (default: 0)
    #[serde(default)]
    pub cleanup_interval_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Routes the service always serves; the metrics endpoint may not shadow them.
pub const RESERVED_PATHS: &[&str] = &["/collect", "/health", "/healthz"];

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    30
}

fn default_window_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: 0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl MetricsConfig {
    /// Whether `path` can be mounted as the metrics endpoint
    pub fn is_valid_path(path: &str) -> bool {
        path.starts_with('/') && !RESERVED_PATHS.contains(&path)
    }
}

impl RateLimitConfig {
    /// Get the admission window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the idle-key sweep interval, if the sweep is enabled
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_secs > 0).then(|| Duration::from_secs(self.cleanup_interval_secs))
    }
}
