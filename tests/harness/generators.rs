// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for flood simulation.

use serde_json::json;
use std::net::{Ipv4Addr, Ipv6Addr};
use telemetry_gate::fingerprint::{canvas_digest, font_digest, webgl_digest};

/// Generate a pool of client keys. Every tenth key is IPv6.
pub fn generate_client_keys(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            if i % 10 == 9 {
                Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, (i >> 16) as u16, i as u16).to_string()
            } else {
                let a = ((i >> 16) & 0xFF) as u8;
                let b = ((i >> 8) & 0xFF) as u8;
                let c = (i & 0xFF) as u8;
                Ipv4Addr::new(10, a, b, c).to_string()
            }
        })
        .collect()
}

/// Raw signals a browser would have collected, before reduction.
pub struct RawSignals {
    pub canvas_data_url: String,
    pub webgl_parts: Vec<String>,
    pub fonts: Vec<String>,
}

pub fn generate_raw_signals(seed: usize) -> RawSignals {
    RawSignals {
        canvas_data_url: format!("data:image/png;base64,iVBORw0KGgoAAAANSUhEUg{seed:08x}"),
        webgl_parts: vec![
            "WebKit".to_string(),
            format!("ANGLE (GPU {seed})"),
            "WebGL 1.0 (OpenGL ES 2.0 Chromium)".to_string(),
            "OES_texture_float,WEBGL_debug_renderer_info".to_string(),
        ],
        fonts: ["Verdana", "Arial", "Georgia", "Courier New"]
            .iter()
            .take(1 + seed % 4)
            .map(|f| f.to_string())
            .collect(),
    }
}

/// A well-formed submission with digests reduced from `signals`.
pub fn generate_payload(seed: usize, signals: &RawSignals) -> String {
    json!({
        "userAgent": format!("Mozilla/5.0 (X11; Linux x86_64) flood/{seed}"),
        "screen": "1920x1080",
        "language": "en-US",
        "cpuCores": (2 + seed % 14).to_string(),
        "timestamp": "client-supplied",
        "ipAddress": "client-supplied",
        "canvasFingerprint": canvas_digest(&signals.canvas_data_url),
        "webglFingerprint": webgl_digest(&signals.webgl_parts),
        "fontFingerprint": font_digest(&signals.fonts),
    })
    .to_string()
}

/// Bodies the decoder must reject.
pub fn generate_malformed_payloads() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "{",
        "not json",
        "[]",
        "\"userAgent\"",
        r#"{"userAgent": 42}"#,
        r#"{"cpuCores": ["8"]}"#,
        r#"{"userAgent": "ua",}"#,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_client_keys() {
        let keys = generate_client_keys(256);
        assert_eq!(keys.len(), 256);
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), 256);
        assert!(keys[9].contains(':'));
    }

    #[test]
    fn test_payload_is_json() {
        let payload = generate_payload(3, &generate_raw_signals(3));
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["screen"], "1920x1080");
    }
}
