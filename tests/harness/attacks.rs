// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

use lead_intake::RateLimitPolicy;
use std::collections::HashMap;
use std::time::Duration;

/// Which rate-limited form the pattern targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetForm {
    Contact,
    Gdpr,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated time between consecutive submissions
    pub step: Duration,
    /// Number of distinct clients, used round-robin
    pub unique_clients: usize,
    /// Share of submissions carrying an invalid form (0.0-1.0)
    pub invalid_ratio: f64,
    /// Form under attack
    pub form: TargetForm,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            step: Duration::from_secs(1),
            unique_clients: 1,
            invalid_ratio: 0.0,
            form: TargetForm::Contact,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the contact form.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            step: Duration::from_millis(100),
            ..Default::default()
        }
    }

    /// Many clients, each staying a little above its quota.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 600,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Garbage submissions; they still spend quota.
    pub fn invalid_payload_flood() -> Self {
        Self {
            total_requests: 50,
            invalid_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Mixed valid and invalid traffic from a handful of clients.
    pub fn mixed_traffic() -> Self {
        Self {
            total_requests: 120,
            step: Duration::from_secs(30),
            unique_clients: 4,
            invalid_ratio: 0.3,
            ..Default::default()
        }
    }

    /// Repeated GDPR requests from one client over a few hours.
    pub fn gdpr_flood() -> Self {
        Self {
            total_requests: 100,
            step: Duration::from_secs(60),
            form: TargetForm::Gdpr,
            ..Default::default()
        }
    }

    /// One submission every 13 minutes: never more than 5 per hour.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 20,
            step: Duration::from_secs(13 * 60),
            ..Default::default()
        }
    }

    /// Simulated wall time covered by the attack.
    pub fn simulated_duration(&self) -> Duration {
        self.step * self.total_requests as u32
    }

    /// Submissions that should get past the limiter, valid or not.
    ///
    /// Replays the traffic through a plain fixed-window model per client.
    pub fn expected_admitted(&self, policy: &RateLimitPolicy) -> usize {
        let step_ms = self.step.as_millis() as u64;
        let mut windows: HashMap<usize, (u32, u64)> = HashMap::new();
        let mut admitted = 0;

        for i in 0..self.total_requests {
            let now = i as u64 * step_ms;
            let client = i % self.unique_clients;

            match windows.get_mut(&client) {
                Some((count, reset_at)) if now <= *reset_at => {
                    if *count < policy.max_requests {
                        *count += 1;
                        admitted += 1;
                    }
                }
                _ => {
                    windows.insert(client, (1, now + policy.window_ms));
                    admitted += 1;
                }
            }
        }

        admitted
    }
}

/// Deterministic pseudo-random choice from the index and a ratio.
pub fn pick(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_drip_fits_the_contact_quota() {
        let config = AttackConfig::slow_drip();
        let policy = RateLimitPolicy::new(5, 3_600_000, "contact");
        assert_eq!(config.expected_admitted(&policy), config.total_requests);
    }

    #[test]
    fn test_pick_extremes() {
        assert!(pick(1.0, 7));
        assert!(!pick(0.0, 7));
    }
}
