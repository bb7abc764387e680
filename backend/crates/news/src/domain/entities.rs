//! Domain Entities
//!
//! Search hits as returned by the provider, classifier verdicts, and the
//! scored article served to the UI.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{Category, CredibilityLevel};

/// One result from the search provider
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub content: String,
    pub raw_content: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    /// Provider relevance, 0.0..=1.0
    pub score: f64,
}

/// Signals the classifier reports about an article's sourcing and tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CredibilitySignals {
    /// Cites named people, agencies or documents
    pub has_named_sources: bool,
    /// Editorial or opinion piece rather than reporting
    pub is_opinion: bool,
    /// Clickbait or sensational framing
    pub is_sensational: bool,
}

/// Classifier verdict for one search hit
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub translated_title: String,
    pub summary: String,
    pub signals: CredibilitySignals,
}

/// Heuristic credibility verdict
#[derive(Debug, Clone, PartialEq)]
pub struct CredibilityAssessment {
    pub score: u8,
    pub level: CredibilityLevel,
    pub reasons: Vec<String>,
}

/// A classified, scored article
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub source: String,
    pub original_title: String,
    pub title: String,
    pub summary: String,
    pub category: Category,
    pub published_at: Option<DateTime<Utc>>,
    pub relevance: f64,
    pub credibility: CredibilityAssessment,
}
