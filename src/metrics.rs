// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for form submissions.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Form names used as the `form` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Contact,
    Quote,
    Gdpr,
}

impl Form {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Quote => "quote",
            Self::Gdpr => "gdpr",
        }
    }
}

/// Submission outcomes used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Invalid,
    RateLimited,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Invalid => "invalid",
            Self::RateLimited => "rate_limited",
            Self::Failed => "failed",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    delivery_failures: IntCounterVec,
    rate_limit_records: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "lead_intake_submissions_total",
                "Form submissions by form and outcome",
            ),
            &["form", "outcome"],
        )?;
        let delivery_failures = IntCounterVec::new(
            Opts::new(
                "lead_intake_delivery_failures_total",
                "Failed email or webhook deliveries",
            ),
            &["channel"],
        )?;
        let rate_limit_records = IntGauge::new(
            "lead_intake_rate_limit_records",
            "Rate limit records held in memory",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(delivery_failures.clone()))?;
        registry.register(Box::new(rate_limit_records.clone()))?;

        Ok(Self {
            registry,
            submissions,
            delivery_failures,
            rate_limit_records,
        })
    }

    pub fn record_submission(&self, form: Form, outcome: Outcome) {
        self.submissions
            .with_label_values(&[form.as_str(), outcome.as_str()])
            .inc();
    }

    /// `channel` is "email" or "webhook".
    pub fn record_delivery_failure(&self, channel: &str) {
        self.delivery_failures.with_label_values(&[channel]).inc();
    }

    pub fn set_rate_limit_records(&self, count: usize) {
        self.rate_limit_records.set(count as i64);
    }

    pub fn submissions(&self, form: Form, outcome: Outcome) -> u64 {
        self.submissions
            .with_label_values(&[form.as_str(), outcome.as_str()])
            .get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
