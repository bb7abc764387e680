//! Provider Traits
//!
//! Interfaces to the external search and classification services.
//! Implementations live in the infrastructure layer.

use crate::domain::entities::{Classification, SearchHit};
use crate::domain::value_objects::Language;
use crate::error::NewsResult;

/// Search request options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: u8,
    /// Only articles published within this many days
    pub days: u16,
    pub include_raw_content: bool,
}

/// What the classifier sees of one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInput {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Classification request options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub language: Language,
    pub model: String,
}

/// News search provider
#[trait_variant::make(NewsSearchProvider: Send)]
pub trait LocalNewsSearchProvider {
    async fn search(&self, query: &str, options: &SearchOptions) -> NewsResult<Vec<SearchHit>>;
}

/// Classification / translation provider
///
/// Replies are expected to be the same length and order as `items`;
/// callers must check.
#[trait_variant::make(ArticleClassifier: Send)]
pub trait LocalArticleClassifier {
    async fn classify(
        &self,
        items: &[ClassificationInput],
        options: &ClassifyOptions,
    ) -> NewsResult<Vec<Classification>>;
}
