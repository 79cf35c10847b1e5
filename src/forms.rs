// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request bodies of the contact and GDPR forms.
//!
//! The quote form lives in [`crate::pricing`] next to the engine that
//! prices it.

use serde::{Deserialize, Serialize};

/// Contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub privacy: bool,
}

/// Data subject rights under GDPR articles 15-21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GdprRequestType {
    Access,
    Rectification,
    Erasure,
    Portability,
    Restriction,
    Objection,
}

impl GdprRequestType {
    /// Human-readable label used in emails.
    pub fn label(self) -> &'static str {
        match self {
            Self::Access => "Access to personal data (Art. 15)",
            Self::Rectification => "Rectification (Art. 16)",
            Self::Erasure => "Erasure (Art. 17)",
            Self::Restriction => "Restriction of processing (Art. 18)",
            Self::Portability => "Data portability (Art. 20)",
            Self::Objection => "Objection to processing (Art. 21)",
        }
    }
}

/// GDPR data subject request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub request_type: GdprRequestType,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub privacy: bool,
}
