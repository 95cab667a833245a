// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for flood simulation against the telemetry gate.
//!
//! Floods run against a simulated clock, so a ten-minute drip finishes in
//! milliseconds and every outcome is deterministic.

pub mod attacks;
pub mod generators;
