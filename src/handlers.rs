// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the form endpoints.
//!
//! Contact and GDPR submissions are rate limited per client before anything
//! else happens. Quote submissions are validated, priced and forwarded to
//! the automation webhook. Email and webhook failures are logged and do not
//! change the response.

use crate::config::{Config, RateLimitPolicy};
use crate::error::{ApiError, StartupError};
use crate::forms::{ContactRequest, GdprRequest};
use crate::headers::rate_limit_headers;
use crate::limiter::FixedWindowLimiter;
use crate::mailer::{self, Email, Mailer};
use crate::metrics::{Form, Metrics, Outcome};
use crate::pricing::{calculate_quote_price, QuoteRequest};
use crate::validator::{FormValidator, ValidationResult};
use crate::webhook::WebhookClient;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    pub limiter: FixedWindowLimiter,
    pub validator: FormValidator,
    pub mailer: Arc<dyn Mailer>,
    pub webhook: WebhookClient,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    /// Build state from configuration, choosing the mailer from the API key.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let mailer = mailer::from_config(&config.mail, config.outbound_timeout())?;
        Self::with_mailer(config, mailer)
    }

    /// Build state with an explicit mailer.
    pub fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> Result<Self, StartupError> {
        config.validate()?;
        Ok(Self {
            limiter: FixedWindowLimiter::new(config.rate_limit.capacity),
            validator: FormValidator::new(config.validation.clone()),
            mailer,
            webhook: WebhookClient::new(config.webhook.quote_url.clone(), config.outbound_timeout())?,
            metrics: Metrics::new()?,
            config,
        })
    }

    /// Replace the limiter, e.g. with one driven by a manual clock.
    pub fn with_limiter(mut self, limiter: FixedWindowLimiter) -> Self {
        self.limiter = limiter;
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Success body of the contact and GDPR endpoints.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Success body of the quote endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub quote_id: Uuid,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(contact))
        .route("/api/quote", post(quote))
        .route("/api/gdpr", post(gdpr));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "lead-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    state.metrics.set_rate_limit_records(state.limiter.len().await);

    match state.metrics.render() {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            body,
        )
            .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

/// Contact form submission.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let client = client_identifier(&headers, addr, state.config.rate_limit.trust_proxy_headers);
    let policy = &state.config.rate_limit.contact;

    let limit_headers = match admit(&state, &client, policy, Form::Contact).await {
        Ok(h) => h,
        Err(e) => return e.into_response(),
    };

    let result = submit_contact(&state, payload).await;
    record(&state, Form::Contact, &result);
    (limit_headers, result).into_response()
}

/// GDPR data subject request.
pub async fn gdpr(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<GdprRequest>, JsonRejection>,
) -> Response {
    let client = client_identifier(&headers, addr, state.config.rate_limit.trust_proxy_headers);
    let policy = &state.config.rate_limit.gdpr;

    let limit_headers = match admit(&state, &client, policy, Form::Gdpr).await {
        Ok(h) => h,
        Err(e) => return e.into_response(),
    };

    let result = submit_gdpr(&state, payload).await;
    record(&state, Form::Gdpr, &result);
    (limit_headers, result).into_response()
}

/// Quote wizard submission.
pub async fn quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response {
    let result = submit_quote(&state, payload).await;
    record(&state, Form::Quote, &result);
    result.into_response()
}

/// Consult the limiter; on rejection return the ready-made 429.
async fn admit(
    state: &AppState,
    client: &str,
    policy: &RateLimitPolicy,
    form: Form,
) -> Result<HeaderMap, ApiError> {
    let decision = state.limiter.check(client, policy).await;
    let headers = rate_limit_headers(&decision, policy.max_requests);

    if decision.allowed {
        debug!(form = form.as_str(), %client, remaining = decision.remaining, "Submission admitted");
        Ok(headers)
    } else {
        info!(
            form = form.as_str(),
            %client,
            retry_after_ms = decision.reset_in,
            "Submission rate limited"
        );
        let err = ApiError::RateLimited(headers);
        state.metrics.record_submission(form, err.outcome());
        Err(err)
    }
}

async fn submit_contact(
    state: &AppState,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(form) = payload?;
    if let ValidationResult::Invalid(errors) = state.validator.validate_contact(&form) {
        return Err(ApiError::Validation(errors));
    }

    let mail = &state.config.mail;
    deliver(
        state,
        mailer::contact_notification(&form, &mail.to),
        mailer::contact_confirmation(&form),
    )
    .await;

    info!(email_domain = %email_domain(&form.email), "Contact request received");
    Ok(Json(SubmitResponse {
        success: true,
        message: "Message sent successfully",
    }))
}

async fn submit_gdpr(
    state: &AppState,
    payload: Result<Json<GdprRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(form) = payload?;
    if let ValidationResult::Invalid(errors) = state.validator.validate_gdpr(&form) {
        return Err(ApiError::Validation(errors));
    }

    let mail = &state.config.mail;
    deliver(
        state,
        mailer::gdpr_notification(&form, &mail.gdpr_to),
        mailer::gdpr_confirmation(&form),
    )
    .await;

    info!(request_type = ?form.request_type, "GDPR request received");
    Ok(Json(SubmitResponse {
        success: true,
        message: "Request submitted successfully",
    }))
}

async fn submit_quote(
    state: &AppState,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Json(form) = payload?;
    if let ValidationResult::Invalid(errors) = state.validator.validate_quote(&form) {
        return Err(ApiError::Validation(errors));
    }

    let estimate = calculate_quote_price(&form);
    let quote_id = Uuid::new_v4();

    info!(
        %quote_id,
        min = estimate.min,
        max = estimate.max,
        lead_score = ?estimate.lead_score,
        "Quote request priced"
    );

    if let Err(e) = state.webhook.forward_quote(quote_id, &form, &estimate).await {
        warn!(%quote_id, error = %e, "Quote webhook delivery failed");
        state.metrics.record_delivery_failure("webhook");
    }

    Ok(Json(QuoteResponse {
        success: true,
        quote_id,
    }))
}

/// Send the notification and the confirmation concurrently, logging failures.
async fn deliver(state: &AppState, notification: Email, confirmation: Email) {
    let (sent_notification, sent_confirmation) = tokio::join!(
        state.mailer.send(&notification),
        state.mailer.send(&confirmation),
    );

    for (email, result) in [
        (&notification, sent_notification),
        (&confirmation, sent_confirmation),
    ] {
        if let Err(e) = result {
            warn!(subject = %email.subject, error = %e, "Email delivery failed");
            state.metrics.record_delivery_failure("email");
        }
    }
}

fn record<T>(state: &AppState, form: Form, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => Outcome::Accepted,
        Err(e) => e.outcome(),
    };
    state.metrics.record_submission(form, outcome);
}

/// Identify the client by its socket peer address.
///
/// With `trust_proxy_headers`, the first `X-Forwarded-For` hop wins, then
/// `X-Real-IP`, then the peer.
pub fn client_identifier(headers: &HeaderMap, peer: SocketAddr, trust_proxy_headers: bool) -> String {
    if !trust_proxy_headers {
        return peer.ip().to_string();
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Domain part of an address, for logs that should not carry the full email.
fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map_or("", |(_, domain)| domain.trim())
}
