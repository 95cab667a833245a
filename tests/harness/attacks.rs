// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood patterns for security testing.

use std::time::Duration;

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated time between consecutive submissions
    pub interval: Duration,
    /// Number of distinct client keys, used round-robin
    pub unique_clients: usize,
    /// Share of submissions carrying a malformed body (0.0-1.0)
    pub malformed_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(100),
            unique_clients: 1,
            malformed_ratio: 0.0,
        }
    }
}

/// Predefined flood patterns.
impl AttackConfig {
    /// One client hammering the endpoint for two seconds.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    /// Many clients, each well under the limit.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            interval: Duration::from_millis(10),
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// One client at 24 per minute, under the 30 per minute limit.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(2500),
            ..Default::default()
        }
    }

    /// One client at one per second for two minutes, straddling window edges.
    pub fn steady_overload() -> Self {
        Self {
            total_requests: 120,
            interval: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// One client sending nothing but garbage.
    pub fn malformed_flood() -> Self {
        Self {
            total_requests: 60,
            interval: Duration::from_millis(10),
            malformed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Simulated length of the flood.
    pub fn simulated_duration(&self) -> Duration {
        self.interval * self.total_requests.saturating_sub(1) as u32
    }

    /// Upper bound on admissions the limiter may grant across the flood.
    pub fn max_admissions(&self, max_requests: u32, window: Duration) -> usize {
        let clients = self.unique_clients.min(self.total_requests);
        let windows = (self.simulated_duration().as_nanos() / window.as_nanos()) as usize + 1;
        clients * max_requests as usize * windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_duration() {
        assert_eq!(
            AttackConfig::steady_overload().simulated_duration(),
            Duration::from_secs(119)
        );
    }

    #[test]
    fn test_max_admissions() {
        let bound = AttackConfig::steady_overload().max_admissions(30, Duration::from_secs(60));
        assert_eq!(bound, 60);
    }
}
