// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client key resolution.
//!
//! The key is only a rate-limit bucket. Forwarding headers are trusted as
//! sent, so a client talking to the service directly can pick its own key.

use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Key used when neither headers nor the transport supply an address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client key for a request.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the peer
/// address without its port.
pub fn resolve_client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = header_value(headers, X_FORWARDED_FOR) {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header_value(headers, X_REAL_IP) {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
