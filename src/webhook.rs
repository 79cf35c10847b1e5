// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Forwarding of priced quote requests to the automation webhook.

use crate::pricing::{QuoteEstimate, QuoteRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook responded with status {0}")]
    Status(u16),
}

/// Body posted to the webhook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload<'a> {
    pub quote_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub request: &'a QuoteRequest,
    pub estimate: &'a QuoteEstimate,
}

/// Client for the quote automation webhook. Disabled when no URL is set.
pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookClient {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Post the quote. Returns `Ok(false)` without sending when disabled.
    pub async fn forward_quote(
        &self,
        quote_id: Uuid,
        request: &QuoteRequest,
        estimate: &QuoteEstimate,
    ) -> Result<bool, WebhookError> {
        let Some(url) = &self.url else {
            return Ok(false);
        };

        let payload = QuotePayload {
            quote_id,
            submitted_at: Utc::now(),
            request,
            estimate,
        };

        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        debug!(%quote_id, "Quote forwarded to webhook");
        Ok(true)
    }
}
