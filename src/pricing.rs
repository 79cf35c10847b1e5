// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Quote pricing.
//!
//! `calculate_quote_price` turns the answers of the quote wizard into a
//! price range, a delivery estimate and a lead score. It is a pure function:
//! same input, same output, no I/O.
//!
//! Order of application: base range by project type, then page and design
//! multipliers, then flat feature and CMS surcharges, then the timeline
//! multiplier, then rounding to the nearest 50.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Landing,
    Website,
    Ecommerce,
    Webapp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageCount {
    #[serde(rename = "1-3")]
    UpTo3,
    #[serde(rename = "4-7")]
    UpTo7,
    #[serde(rename = "8-15")]
    UpTo15,
    #[serde(rename = "15+")]
    Over15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Design {
    Template,
    Custom,
    /// Reuses a design the client already has
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ContactForm,
    Booking,
    Blog,
    Multilang,
    Auth,
    Payments,
    Seo,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cms {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    Standard,
    Urgent,
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadScore {
    Low,
    Medium,
    High,
}

/// Answers of the quote wizard plus the contact details of the prospect.
///
/// Pricing fields are optional so that a partially filled wizard can still
/// be priced; the endpoint requires all of them before pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub pages: Option<PageCount>,
    #[serde(default)]
    pub design: Option<Design>,
    #[serde(default)]
    pub features: BTreeSet<Feature>,
    #[serde(default)]
    pub cms: Option<Cms>,
    #[serde(default)]
    pub timeline: Option<Timeline>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub privacy: bool,
}

/// Price range and delivery estimate for one quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEstimate {
    pub min: u32,
    pub max: u32,
    pub timeline: String,
    pub lead_score: LeadScore,
}

impl QuoteEstimate {
    fn empty() -> Self {
        Self {
            min: 0,
            max: 0,
            timeline: String::new(),
            lead_score: LeadScore::Low,
        }
    }
}

impl ProjectType {
    /// Base price range in euros.
    pub fn base_range(self) -> (f64, f64) {
        match self {
            Self::Landing => (800.0, 1500.0),
            Self::Website => (1500.0, 3500.0),
            Self::Ecommerce => (3000.0, 8000.0),
            Self::Webapp => (5000.0, 15000.0),
        }
    }
}

impl PageCount {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::UpTo3 => 1.0,
            Self::UpTo7 => 1.3,
            Self::UpTo15 => 1.6,
            Self::Over15 => 2.0,
        }
    }
}

impl Design {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Template => 1.0,
            Self::Custom => 1.3,
            Self::Existing => 0.8,
        }
    }
}

impl Feature {
    /// Flat surcharge in euros, added to both bounds.
    ///
    /// `Multilang` is a single flat amount whatever the number of languages.
    pub fn surcharge(self) -> f64 {
        match self {
            Self::ContactForm => 0.0,
            Self::Booking => 600.0,
            Self::Blog => 400.0,
            Self::Multilang => 500.0,
            Self::Auth => 800.0,
            Self::Payments => 1000.0,
            Self::Seo => 500.0,
            Self::Analytics => 300.0,
        }
    }
}

impl Cms {
    pub fn surcharge(self) -> f64 {
        match self {
            Self::Yes => 400.0,
            Self::No => 0.0,
        }
    }
}

impl Timeline {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Urgent => 1.3,
            Self::Standard => 1.0,
            Self::Flexible => 0.95,
        }
    }
}

/// Price a quote request.
///
/// Without a project type there is nothing to price, and the result is a
/// zeroed estimate with a low lead score.
pub fn calculate_quote_price(request: &QuoteRequest) -> QuoteEstimate {
    let Some(project_type) = request.project_type else {
        return QuoteEstimate::empty();
    };

    let (mut min, mut max) = project_type.base_range();

    let mut scale = |factor: f64| {
        min *= factor;
        max *= factor;
    };
    if let Some(pages) = request.pages {
        scale(pages.multiplier());
    }
    if let Some(design) = request.design {
        scale(design.multiplier());
    }

    let surcharge: f64 = request.features.iter().map(|f| f.surcharge()).sum::<f64>()
        + request.cms.map_or(0.0, Cms::surcharge);
    min += surcharge;
    max += surcharge;

    if let Some(timeline) = request.timeline {
        min *= timeline.multiplier();
        max *= timeline.multiplier();
    }

    QuoteEstimate {
        min: round_to_50(min),
        max: round_to_50(max),
        timeline: delivery_estimate(project_type, request.timeline).to_string(),
        lead_score: lead_score(request),
    }
}

/// Round to the nearest multiple of 50, halves going up.
fn round_to_50(value: f64) -> u32 {
    ((value / 50.0).round() * 50.0).max(0.0) as u32
}

fn delivery_estimate(project_type: ProjectType, timeline: Option<Timeline>) -> &'static str {
    // Landing pages ship fast whatever timeline was asked for.
    if project_type == ProjectType::Landing {
        return "1-2 settimane";
    }
    match timeline {
        Some(Timeline::Urgent) => "2-3 settimane",
        Some(Timeline::Flexible) => "Flessibile",
        _ => "4-6 settimane",
    }
}

fn lead_score(request: &QuoteRequest) -> LeadScore {
    let mut score = 0;

    match request.project_type {
        Some(ProjectType::Webapp | ProjectType::Ecommerce) => score += 3,
        Some(ProjectType::Website) => score += 2,
        _ => {}
    }
    if matches!(request.pages, Some(PageCount::Over15 | PageCount::UpTo15)) {
        score += 2;
    }
    if request.timeline == Some(Timeline::Urgent) {
        score += 2;
    }
    if request.features.len() > 3 {
        score += 2;
    }

    match score {
        s if s >= 6 => LeadScore::High,
        s if s >= 3 => LeadScore::Medium,
        _ => LeadScore::Low,
    }
}
