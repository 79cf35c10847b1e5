// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lead Intake
//!
//! Form-submission backend for the studio website:
//!
//! - Contact and GDPR forms, rate limited per client (fixed window)
//! - Quote wizard priced by a deterministic rule set with a lead score
//! - Plain-text email notifications and confirmations
//! - Forwarding of priced quotes to an automation webhook
//! - Prometheus metrics

pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod headers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod pricing;
pub mod validator;
pub mod webhook;

pub use config::{Config, RateLimitPolicy};
pub use limiter::{FixedWindowLimiter, RateLimitResult};
pub use pricing::{calculate_quote_price, QuoteEstimate, QuoteRequest};
pub use validator::{FormValidator, ValidationResult};
