// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Form validation.
//!
//! Enum fields are checked by serde while the body is parsed. Everything
//! else is checked here, and every failing field is reported at once in a
//! flattened `field -> [messages]` map.

use crate::config::ValidationConfig;
use crate::forms::{ContactRequest, GdprRequest};
use crate::pricing::QuoteRequest;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// A single field failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required")]
    Required(&'static str),

    #[error("Must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("Must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("You must accept the privacy policy")]
    ConsentRequired,

    #[error("{0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required(field) => field,
            Self::TooShort { field, .. } | Self::TooLong { field, .. } => field,
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::ConsentRequired => "privacy",
            Self::MalformedBody(_) => "body",
        }
    }
}

/// Field errors grouped by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0
            .entry(error.field())
            .or_default()
            .push(error.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(error);
        errors
    }
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Form is valid
    Valid,
    /// Form has at least one field error
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }

    fn from_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

/// Validator for the contact, quote and GDPR forms.
pub struct FormValidator {
    config: ValidationConfig,
}

impl FormValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_contact(&self, form: &ContactRequest) -> ValidationResult {
        let mut errors = FieldErrors::default();

        self.check_name(&form.name, &mut errors);
        check_email(&form.email, &mut errors);
        check_phone(form.phone.as_deref(), &mut errors);
        self.check_optional_text("company", form.company.as_deref(), 200, &mut errors);
        self.check_optional_text("subject", form.subject.as_deref(), 200, &mut errors);

        let message = form.message.trim();
        if message.is_empty() {
            errors.push(ValidationError::Required("message"));
        } else {
            let len = message.chars().count();
            if len < self.config.min_message_chars {
                errors.push(ValidationError::TooShort {
                    field: "message",
                    min: self.config.min_message_chars,
                });
            } else if len > self.config.max_message_chars {
                errors.push(ValidationError::TooLong {
                    field: "message",
                    max: self.config.max_message_chars,
                });
            }
        }

        self.check_consent(form.privacy, &mut errors);
        self.finish("contact", errors)
    }

    pub fn validate_quote(&self, form: &QuoteRequest) -> ValidationResult {
        let mut errors = FieldErrors::default();

        if form.project_type.is_none() {
            errors.push(ValidationError::Required("projectType"));
        }
        if form.pages.is_none() {
            errors.push(ValidationError::Required("pages"));
        }
        if form.design.is_none() {
            errors.push(ValidationError::Required("design"));
        }
        if form.cms.is_none() {
            errors.push(ValidationError::Required("cms"));
        }
        if form.timeline.is_none() {
            errors.push(ValidationError::Required("timeline"));
        }

        self.check_name(&form.name, &mut errors);
        check_email(&form.email, &mut errors);
        check_phone(form.phone.as_deref(), &mut errors);
        self.check_optional_text("company", form.company.as_deref(), 200, &mut errors);
        self.check_optional_text(
            "message",
            form.message.as_deref(),
            self.config.max_message_chars,
            &mut errors,
        );

        self.check_consent(form.privacy, &mut errors);
        self.finish("quote", errors)
    }

    pub fn validate_gdpr(&self, form: &GdprRequest) -> ValidationResult {
        let mut errors = FieldErrors::default();

        self.check_name(&form.name, &mut errors);
        check_email(&form.email, &mut errors);
        self.check_optional_text(
            "details",
            form.details.as_deref(),
            self.config.max_message_chars,
            &mut errors,
        );

        self.check_consent(form.privacy, &mut errors);
        self.finish("gdpr", errors)
    }

    fn check_name(&self, name: &str, errors: &mut FieldErrors) {
        let len = name.trim().chars().count();
        if len == 0 {
            errors.push(ValidationError::Required("name"));
        } else if len < 2 {
            errors.push(ValidationError::TooShort { field: "name", min: 2 });
        } else if len > 100 {
            errors.push(ValidationError::TooLong { field: "name", max: 100 });
        }
    }

    fn check_optional_text(
        &self,
        field: &'static str,
        value: Option<&str>,
        max: usize,
        errors: &mut FieldErrors,
    ) {
        if let Some(value) = value {
            if value.trim().chars().count() > max {
                errors.push(ValidationError::TooLong { field, max });
            }
        }
    }

    fn check_consent(&self, privacy: bool, errors: &mut FieldErrors) {
        if self.config.require_privacy_consent && !privacy {
            errors.push(ValidationError::ConsentRequired);
        }
    }

    fn finish(&self, form: &'static str, errors: FieldErrors) -> ValidationResult {
        if !errors.is_empty() {
            debug!(form, fields = ?errors.fields().collect::<Vec<_>>(), "Form invalid");
        }
        ValidationResult::from_errors(errors)
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(ValidationError::Required("email"));
    } else if email.len() > EMAIL_MAX_LENGTH {
        errors.push(ValidationError::TooLong {
            field: "email",
            max: EMAIL_MAX_LENGTH,
        });
    } else if !is_valid_email(email) {
        errors.push(ValidationError::InvalidEmail);
    }
}

/// Basic shape check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    if domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }

    domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
}

fn check_phone(phone: Option<&str>, errors: &mut FieldErrors) {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return;
    };

    let len = phone.chars().count();
    let charset_ok = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.' | '/'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if !(6..=20).contains(&len) || !charset_ok || digits < 6 {
        errors.push(ValidationError::InvalidPhone);
    }
}
