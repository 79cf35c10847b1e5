// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the lead intake service.
//!
//! Every value has a default; `Config::from_env` overrides them from
//! environment variables and `Config::validate` rejects settings the
//! service cannot run with.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Longest accepted rate limit window: 365 days.
pub const MAX_WINDOW_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Configuration errors, reported at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("Rate limit policy {prefix:?} must allow at least one request")]
    ZeroMaxRequests { prefix: String },

    #[error("Rate limit policy {prefix:?} must have a non-zero window")]
    ZeroWindow { prefix: String },

    #[error("Rate limit policy {prefix:?} window exceeds {max_ms} ms")]
    WindowTooLong { prefix: String, max_ms: u64 },

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("Bind address {0:?} is not a socket address")]
    InvalidBindAddr(String),

    #[error("Metrics path {0:?} must start with '/'")]
    InvalidMetricsPath(String),
}

/// Configuration for the lead intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Per-form rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Form validation limits
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Transactional email delivery
    #[serde(default)]
    pub mail: MailConfig,

    /// Automation webhook for quote requests
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Timeout for outbound HTTP calls in milliseconds (default: 10000)
    #[serde(default = "default_outbound_timeout_ms")]
    pub outbound_timeout_ms: u64,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window quota for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Requests admitted per window
    pub max_requests: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Key namespace, e.g. "contact"
    pub prefix: String,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window_ms: u64, prefix: impl Into<String>) -> Self {
        Self {
            max_requests,
            window_ms,
            prefix: prefix.into(),
        }
    }
}

/// Rate limiting configuration for the form endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Contact form quota (default: 5 per hour)
    #[serde(default = "default_contact_policy")]
    pub contact: RateLimitPolicy,

    /// GDPR request quota (default: 3 per 24 hours)
    #[serde(default = "default_gdpr_policy")]
    pub gdpr: RateLimitPolicy,

    /// Record count above which expired records are swept (default: 10000)
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Key clients by `X-Forwarded-For` / `X-Real-IP` instead of the socket
    /// peer. Only safe behind a proxy that overwrites them (default: false)
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

/// Form validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum contact message length in characters (default: 10)
    #[serde(default = "default_min_message_chars")]
    pub min_message_chars: usize,

    /// Maximum length of free-text fields in characters (default: 5000)
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Reject submissions without privacy consent (default: true)
    #[serde(default = "default_true")]
    pub require_privacy_consent: bool,
}

/// Email delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Email API endpoint
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,

    /// Email API key; without one, emails are only logged
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sender address
    #[serde(default = "default_mail_from")]
    pub from: String,

    /// Agency inbox for contact and quote notifications
    #[serde(default = "default_mail_to")]
    pub to: String,

    /// Inbox handling GDPR requests
    #[serde(default = "default_gdpr_mail_to")]
    pub gdpr_to: String,
}

/// Automation webhook configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint receiving quote requests; disabled when absent
    #[serde(default)]
    pub quote_url: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_contact_policy() -> RateLimitPolicy {
    RateLimitPolicy::new(5, 60 * 60 * 1000, "contact")
}

fn default_gdpr_policy() -> RateLimitPolicy {
    RateLimitPolicy::new(3, 24 * 60 * 60 * 1000, "gdpr")
}

fn default_capacity() -> usize {
    10_000
}

fn default_min_message_chars() -> usize {
    10
}

fn default_max_message_chars() -> usize {
    5000
}

fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_mail_from() -> String {
    "Studio <noreply@example.com>".to_string()
}

fn default_mail_to() -> String {
    "info@example.com".to_string()
}

fn default_gdpr_mail_to() -> String {
    "privacy@example.com".to_string()
}

fn default_outbound_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            mail: MailConfig::default(),
            webhook: WebhookConfig::default(),
            outbound_timeout_ms: default_outbound_timeout_ms(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            contact: default_contact_policy(),
            gdpr: default_gdpr_policy(),
            capacity: default_capacity(),
            trust_proxy_headers: false,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_message_chars: default_min_message_chars(),
            max_message_chars: default_max_message_chars(),
            require_privacy_consent: default_true(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key: None,
            from: default_mail_from(),
            to: default_mail_to(),
            gdpr_to: default_gdpr_mail_to(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Build configuration from defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        let rl = &mut config.rate_limit;
        rl.contact.max_requests =
            parse_var(&lookup, "CONTACT_MAX_REQUESTS", rl.contact.max_requests)?;
        rl.contact.window_ms = parse_var(&lookup, "CONTACT_WINDOW_MS", rl.contact.window_ms)?;
        rl.gdpr.max_requests = parse_var(&lookup, "GDPR_MAX_REQUESTS", rl.gdpr.max_requests)?;
        rl.gdpr.window_ms = parse_var(&lookup, "GDPR_WINDOW_MS", rl.gdpr.window_ms)?;
        rl.capacity = parse_var(&lookup, "RATE_LIMIT_CAPACITY", rl.capacity)?;
        rl.trust_proxy_headers =
            parse_var(&lookup, "TRUST_PROXY_HEADERS", rl.trust_proxy_headers)?;

        if let Some(url) = lookup("MAIL_API_URL") {
            config.mail.api_url = url;
        }
        config.mail.api_key = lookup("MAIL_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(from) = lookup("MAIL_FROM") {
            config.mail.from = from;
        }
        if let Some(to) = lookup("MAIL_TO") {
            config.mail.to = to;
        }
        if let Some(to) = lookup("GDPR_MAIL_TO") {
            config.mail.gdpr_to = to;
        }

        config.webhook.quote_url = lookup("QUOTE_WEBHOOK_URL").filter(|u| !u.trim().is_empty());
        config.outbound_timeout_ms =
            parse_var(&lookup, "OUTBOUND_TIMEOUT_MS", config.outbound_timeout_ms)?;

        config.metrics.enabled = parse_var(&lookup, "METRICS_ENABLED", config.metrics.enabled)?;
        if let Some(path) = lookup("METRICS_PATH") {
            config.metrics.path = path;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(self.bind_addr.clone()))?;

        for policy in [&self.rate_limit.contact, &self.rate_limit.gdpr] {
            if policy.max_requests == 0 {
                return Err(ConfigError::ZeroMaxRequests {
                    prefix: policy.prefix.clone(),
                });
            }
            if policy.window_ms == 0 {
                return Err(ConfigError::ZeroWindow {
                    prefix: policy.prefix.clone(),
                });
            }
            if policy.window_ms > MAX_WINDOW_MS {
                return Err(ConfigError::WindowTooLong {
                    prefix: policy.prefix.clone(),
                    max_ms: MAX_WINDOW_MS,
                });
            }
        }

        Url::parse(&self.mail.api_url).map_err(|_| ConfigError::InvalidUrl {
            field: "mail.api_url",
            url: self.mail.api_url.clone(),
        })?;

        if let Some(url) = &self.webhook.quote_url {
            Url::parse(url).map_err(|_| ConfigError::InvalidUrl {
                field: "webhook.quote_url",
                url: url.clone(),
            })?;
        }

        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }

        Ok(())
    }

    /// Get the outbound request timeout
    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_millis(self.outbound_timeout_ms)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
    }
}
