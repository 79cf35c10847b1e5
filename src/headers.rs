// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Standard rate limit response headers.

use crate::limiter::RateLimitResult;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Build the rate limit headers for a check result.
///
/// `X-RateLimit-Reset` and `Retry-After` are whole seconds, rounded up.
/// `Retry-After` is only present when the request was rejected.
pub fn rate_limit_headers(result: &RateLimitResult, max_requests: u32) -> HeaderMap {
    let reset_secs = result.reset_in.div_ceil(1000);

    let mut headers = HeaderMap::new();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(max_requests));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(result.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_secs));

    if !result.allowed {
        headers.insert(header::RETRY_AFTER, HeaderValue::from(reset_secs));
    }

    headers
}
