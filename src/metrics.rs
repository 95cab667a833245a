// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the collection endpoint.

use crate::error::MetricsError;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    admissions: IntCounterVec,
    malformed: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let admissions = IntCounterVec::new(
            Opts::new(
                "telemetry_gate_admissions_total",
                "Admission decisions on /collect by outcome",
            ),
            &["outcome"],
        )?;
        let malformed = IntCounter::new(
            "telemetry_gate_malformed_total",
            "Admitted submissions rejected as malformed JSON",
        )?;

        registry.register(Box::new(admissions.clone()))?;
        registry.register(Box::new(malformed.clone()))?;

        Ok(Self {
            registry,
            admissions,
            malformed,
        })
    }

    pub fn record_admission(&self, allowed: bool) {
        let outcome = if allowed { "allowed" } else { "limited" };
        self.admissions.with_label_values(&[outcome]).inc();
    }

    pub fn record_malformed(&self) {
        self.malformed.inc();
    }

    pub fn admissions(&self, outcome: &str) -> u64 {
        self.admissions.with_label_values(&[outcome]).get()
    }

    pub fn malformed(&self) -> u64 {
        self.malformed.get()
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
