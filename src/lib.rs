// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Telemetry Gate
//!
//! This crate provides the ingestion side of a device telemetry collector:
//!
//! - Per-client sliding-window admission control (30 per rolling minute default)
//! - Client key resolution from forwarding headers or the peer address
//! - Server-stamped telemetry records echoed back to the submitter
//! - Fingerprint digests matching the ones computed in the browser

pub mod client_ip;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod telemetry;

pub use config::Config;
pub use error::CollectError;
pub use fingerprint::reduce;
pub use limiter::{RateLimitResult, RateLimiter};
pub use telemetry::TelemetryRecord;
