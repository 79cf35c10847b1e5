// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Transactional email delivery.
//!
//! `HttpMailer` posts plain-text messages to an email API. `LogMailer`
//! writes them to the log instead and is used when no API key is set.
//! Callers treat delivery as best effort.

use crate::config::MailConfig;
use crate::forms::{ContactRequest, GdprRequest};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Email delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email API rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Mailer that only logs.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "Email delivery disabled, message logged");
        debug!(text = %email.text, "Email body");
        Ok(())
    }
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    text: &'a str,
}

/// Mailer backed by an HTTP email API (bearer-authenticated JSON POST).
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let body = SendEmailBody {
            from: &self.from,
            to: [email.to.as_str()],
            reply_to: email.reply_to.as_deref(),
            subject: &email.subject,
            text: &email.text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %email.to, subject = %email.subject, "Email accepted by API");
        Ok(())
    }
}

/// Pick the mailer implementation from configuration.
pub fn from_config(config: &MailConfig, timeout: Duration) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.api_key {
        Some(key) => Ok(Arc::new(HttpMailer::new(
            config.api_url.clone(),
            key.clone(),
            config.from.clone(),
            timeout,
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

fn optional_line(label: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("{label}: {v}\n"),
        None => String::new(),
    }
}

/// Notification to the agency inbox for a contact form submission.
pub fn contact_notification(form: &ContactRequest, agency_inbox: &str) -> Email {
    let subject = match form.subject.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => format!("New contact request: {s}"),
        _ => format!("New contact request from {}", form.name.trim()),
    };

    let text = format!(
        "Name: {}\nEmail: {}\n{}{}\n{}\n",
        form.name.trim(),
        form.email.trim(),
        optional_line("Phone", form.phone.as_deref()),
        optional_line("Company", form.company.as_deref()),
        form.message.trim(),
    );

    Email {
        to: agency_inbox.to_string(),
        reply_to: Some(form.email.trim().to_string()),
        subject,
        text,
    }
}

/// Acknowledgement sent to the person who used the contact form.
pub fn contact_confirmation(form: &ContactRequest) -> Email {
    Email {
        to: form.email.trim().to_string(),
        reply_to: None,
        subject: "Abbiamo ricevuto il tuo messaggio".to_string(),
        text: format!(
            "Ciao {},\n\ngrazie per averci scritto. Ti risponderemo entro 24 ore lavorative.\n\n\
             Il tuo messaggio:\n{}\n",
            form.name.trim(),
            form.message.trim(),
        ),
    }
}

/// Notification to the privacy inbox for a GDPR request.
pub fn gdpr_notification(form: &GdprRequest, privacy_inbox: &str) -> Email {
    Email {
        to: privacy_inbox.to_string(),
        reply_to: Some(form.email.trim().to_string()),
        subject: format!("GDPR request: {}", form.request_type.label()),
        text: format!(
            "Request: {}\nName: {}\nEmail: {}\n{}\nThe request must be answered within 30 days.\n",
            form.request_type.label(),
            form.name.trim(),
            form.email.trim(),
            optional_line("Details", form.details.as_deref()),
        ),
    }
}

/// Acknowledgement sent to the data subject.
pub fn gdpr_confirmation(form: &GdprRequest) -> Email {
    Email {
        to: form.email.trim().to_string(),
        reply_to: None,
        subject: "Richiesta GDPR ricevuta".to_string(),
        text: format!(
            "Ciao {},\n\nabbiamo ricevuto la tua richiesta ({}). \
             Ti risponderemo entro 30 giorni, come previsto dal GDPR.\n",
            form.name.trim(),
            form.request_type.label(),
        ),
    }
}
