// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use std::collections::HashMap;
use std::time::Duration;

/// Collects metrics during an abuse simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of submissions by client
    requests_per_client: HashMap<String, usize>,
    /// Admitted submissions by client
    admitted_per_client: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
    /// Simulated time covered
    simulated: Duration,
}

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    RateLimited,
    Invalid,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .requests_per_client
            .entry(client.to_string())
            .or_insert(0) += 1;
        if outcome != Outcome::RateLimited {
            *self
                .admitted_per_client
                .entry(client.to_string())
                .or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    pub fn set_simulated_duration(&mut self, duration: Duration) {
        self.simulated = duration;
    }

    /// Get total submission count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Submissions that got past the limiter.
    pub fn admitted(&self) -> usize {
        self.total_requests() - self.count(Outcome::RateLimited)
    }

    /// Largest number of admitted submissions for any one client.
    pub fn max_admitted_per_client(&self) -> usize {
        self.admitted_per_client.values().copied().max().unwrap_or(0)
    }

    /// Get block rate (ratio of blocked to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let allowed = self.count(Outcome::Allowed);
        (total - allowed) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Get p99 latency in microseconds.
    pub fn p99_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        let idx = (sorted.len() as f64 * 0.99) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Get number of unique clients that submitted.
    pub fn unique_clients(&self) -> usize {
        self.requests_per_client.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            allowed: self.count(Outcome::Allowed),
            rate_limited: self.count(Outcome::RateLimited),
            invalid: self.count(Outcome::Invalid),
            simulated_secs: self.simulated.as_secs(),
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            p99_latency_us: self.p99_latency_us(),
            unique_clients: self.unique_clients(),
            max_admitted_per_client: self.max_admitted_per_client(),
        }
    }
}

/// Summary report of simulation metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub allowed: usize,
    pub rate_limited: usize,
    pub invalid: usize,
    pub simulated_secs: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub p99_latency_us: u64,
    pub unique_clients: usize,
    pub max_admitted_per_client: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Abuse Simulation Report ===")?;
        writeln!(f, "Simulated time:    {} s", self.simulated_secs)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(
            f,
            "Allowed:           {} ({:.1}%)",
            self.allowed,
            self.allowed as f64 / self.total_requests.max(1) as f64 * 100.0
        )?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Latency ---")?;
        writeln!(f, "Median:            {} us", self.median_latency_us)?;
        writeln!(f, "P99:               {} us", self.p99_latency_us)?;
        writeln!(f)?;
        writeln!(f, "--- Distribution ---")?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        writeln!(f, "Max per Client:    {}", self.max_admitted_per_client)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();

        metrics.record(Outcome::Allowed, "10.0.0.1", Duration::from_micros(100));
        metrics.record(Outcome::Invalid, "10.0.0.1", Duration::from_micros(150));
        metrics.record(Outcome::RateLimited, "10.0.0.1", Duration::from_micros(50));
        metrics.record(Outcome::Allowed, "10.0.0.2", Duration::from_micros(80));

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.count(Outcome::Allowed), 2);
        assert_eq!(metrics.admitted(), 3);
        assert_eq!(metrics.max_admitted_per_client(), 2);
        assert_eq!(metrics.unique_clients(), 2);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Allowed, "10.0.0.1", Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(Outcome::RateLimited, "10.0.0.1", Duration::ZERO);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
