// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Device telemetry records.
//!
//! Every field is a best-effort string reported by the browser. Missing or
//! `null` fields decode as empty strings and unknown fields are ignored;
//! only a structurally invalid body is rejected. The first JSON value in the
//! body is used, and field names match case-insensitively when no exact key
//! exists.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Server-side timestamp layout, e.g. `2026-10-19 14:03:27`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A device telemetry submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryRecord {
    /// Server-assigned receive time
    pub timestamp: String,
    pub user_agent: String,
    /// Server-assigned client key
    pub ip_address: String,
    pub screen: String,
    pub color_depth: String,
    pub timezone: String,
    pub language: String,
    pub platform: String,
    pub cpu_cores: String,
    pub device_memory: String,
    pub connection: String,
    pub touch_support: String,
    pub pixel_ratio: String,
    pub available_screen: String,
    pub cookies_enabled: String,
    pub java_enabled: String,
    pub do_not_track: String,
    pub hardware_concurrency: String,
    pub vendor: String,
    pub product: String,

    // Capability checks
    pub battery: String,
    pub online_status: String,
    pub max_touch_points: String,
    pub pdf_viewer: String,
    pub webgl: String,
    pub canvas: String,
    pub audio_context: String,
    pub local_storage: String,
    pub session_storage: String,
    #[serde(rename = "indexedDB")]
    pub indexed_db: String,
    pub geolocation: String,
    pub location_details: String,
    pub notifications: String,
    pub service_worker: String,
    pub webrtc: String,
    pub media_devices: String,
    pub device_orientation: String,
    pub vibration: String,
    pub bluetooth: String,
    pub usb: String,
    pub clipboard: String,
    pub share: String,
    pub payment_request: String,
    pub accelerometer: String,
    pub gyroscope: String,
    pub magnetometer: String,
    #[serde(rename = "gamepadAPI")]
    pub gamepad_api: String,
    pub vr_display: String,
    pub web_assembly: String,
    pub css_features: String,
    pub font_list: String,
    pub plugins: String,
    pub mime_types: String,
    pub viewport_size: String,
    pub device_type: String,
    pub os_version: String,
    pub browser_version: String,
    pub referrer_policy: String,
    pub https_support: String,

    // Digests produced by `fingerprint::reduce` on the client
    pub canvas_fingerprint: String,
    pub webgl_fingerprint: String,
    pub font_fingerprint: String,
}

impl TelemetryRecord {
    /// Decode a JSON request body.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        // Anything after the first value is left unread.
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        let value = Value::deserialize(&mut deserializer)?;

        let fields = match value {
            Value::Object(fields) => canonicalize(fields),
            Value::Null => Map::new(),
            other => return serde_json::from_value(other),
        };
        serde_json::from_value(Value::Object(fields))
    }

    /// Stamp the record with the receive time and the resolved client key,
    /// replacing whatever the client sent for those fields.
    pub fn finalize(self, client_key: &str, received_at: DateTime<Local>) -> Self {
        Self {
            timestamp: received_at.format(TIMESTAMP_FORMAT).to_string(),
            ip_address: client_key.to_string(),
            ..self
        }
    }
}

/// Lowercased wire name to wire name, for every record field.
fn wire_names() -> &'static HashMap<String, String> {
    static NAMES: OnceLock<HashMap<String, String>> = OnceLock::new();
    NAMES.get_or_init(|| match serde_json::to_value(TelemetryRecord::default()) {
        Ok(Value::Object(fields)) => fields
            .into_iter()
            .map(|(name, _)| (name.to_lowercase(), name))
            .collect(),
        _ => HashMap::new(),
    })
}

/// Drop `null` members and rename case-insensitive matches to their wire
/// names. An exact key wins over a case-folded one.
fn canonicalize(fields: Map<String, Value>) -> Map<String, Value> {
    let names = wire_names();
    let mut exact = Map::new();
    let mut folded = Vec::new();

    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        match names.get(&key.to_lowercase()) {
            Some(name) if *name != key => folded.push((name.clone(), value)),
            _ => {
                exact.insert(key, value);
            }
        }
    }

    for (name, value) in folded {
        exact.entry(name).or_insert(value);
    }
    exact
}
