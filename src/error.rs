// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the HTTP layer and service startup.

use crate::config::ConfigError;
use crate::mailer::MailError;
use crate::metrics::Outcome;
use crate::validator::{FieldErrors, ValidationError};
use crate::webhook::WebhookError;
use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the form endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid form data")]
    Validation(FieldErrors),

    #[error("Too many requests. Please try again later.")]
    RateLimited(HeaderMap),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure body shared by all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    /// Submission outcome recorded in metrics for this error.
    pub fn outcome(&self) -> Outcome {
        match self {
            ApiError::Validation(_) => Outcome::Invalid,
            ApiError::RateLimited(_) => Outcome::RateLimited,
            ApiError::Internal(_) => Outcome::Failed,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    success: false,
                    message,
                    errors: Some(errors),
                }),
            )
                .into_response(),
            ApiError::RateLimited(headers) => (
                StatusCode::TOO_MANY_REQUESTS,
                headers,
                Json(ErrorResponse {
                    success: false,
                    message,
                    errors: None,
                }),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        success: false,
                        message: "Internal server error".to_string(),
                        errors: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),
}
