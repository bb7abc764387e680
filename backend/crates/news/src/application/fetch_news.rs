//! Fetch News Use Case

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::config::NewsConfig;
use crate::domain::entities::{Article, Classification, SearchHit};
use crate::domain::provider::{
    ArticleClassifier, ClassificationInput, ClassifyOptions, NewsSearchProvider, SearchOptions,
};
use crate::domain::services::{
    article_id, assess_credibility, fallback_classification, source_host, truncate_chars,
};
use crate::domain::value_objects::{CategoryFilter, Language, SortOrder};
use crate::error::NewsResult;

/// Characters of article body sent to the classifier
const CLASSIFIER_CONTENT_CHARS: usize = 1_500;

/// Input DTO for fetch news
#[derive(Debug, Clone, Default)]
pub struct FetchNewsInput {
    pub category: CategoryFilter,
    pub language: Language,
    pub sort: SortOrder,
    pub max_results: Option<u8>,
}

/// Fetch News Use Case
pub struct FetchNewsUseCase<S, C>
where
    S: NewsSearchProvider,
    C: ArticleClassifier,
{
    search: Arc<S>,
    classifier: Arc<C>,
    config: Arc<NewsConfig>,
}

impl<S, C> FetchNewsUseCase<S, C>
where
    S: NewsSearchProvider,
    C: ArticleClassifier,
{
    pub fn new(search: Arc<S>, classifier: Arc<C>, config: Arc<NewsConfig>) -> Self {
        Self {
            search,
            classifier,
            config,
        }
    }

    pub async fn execute(&self, input: FetchNewsInput) -> NewsResult<Vec<Article>> {
        let query = self.build_query(input.category);
        let options = SearchOptions {
            max_results: input
                .max_results
                .unwrap_or(self.config.max_results)
                .clamp(1, NewsConfig::MAX_RESULTS_CAP),
            days: self.config.search_days,
            include_raw_content: true,
        };

        let hits = dedupe_hits(self.search.search(&query, &options).await?);
        tracing::info!(query = %query, hits = hits.len(), "News search completed");

        let classify_options = ClassifyOptions {
            language: input.language,
            model: self.config.llm_model.clone(),
        };

        let mut articles = Vec::with_capacity(hits.len());
        for batch in hits.chunks(self.config.classify_batch_size.max(1)) {
            let verdicts = self.classify_batch(batch, &classify_options).await?;
            articles.extend(
                batch
                    .iter()
                    .zip(verdicts)
                    .map(|(hit, verdict)| build_article(hit, verdict)),
            );
        }

        articles.retain(|a| input.category.matches(a.category));
        sort_articles(&mut articles, input.sort);

        tracing::info!(
            articles = articles.len(),
            language = input.language.code(),
            "News fetch completed"
        );

        Ok(articles)
    }

    fn build_query(&self, category: CategoryFilter) -> String {
        match category {
            CategoryFilter::Only(c) if !c.search_terms().is_empty() => {
                format!("{} {} news", self.config.base_query, c.search_terms())
            }
            _ => format!("{} news", self.config.base_query),
        }
    }

    /// Classify one batch; a reply of the wrong length is replaced by
    /// fallback verdicts rather than misaligned with the hits.
    async fn classify_batch(
        &self,
        batch: &[SearchHit],
        options: &ClassifyOptions,
    ) -> NewsResult<Vec<Classification>> {
        let items: Vec<ClassificationInput> = batch
            .iter()
            .map(|hit| ClassificationInput {
                title: hit.title.clone(),
                content: truncate_chars(
                    hit.raw_content.as_deref().unwrap_or(&hit.content),
                    CLASSIFIER_CONTENT_CHARS,
                ),
                url: hit.url.clone(),
            })
            .collect();

        let verdicts = self.classifier.classify(&items, options).await?;
        if verdicts.len() == batch.len() {
            return Ok(verdicts);
        }

        tracing::warn!(
            expected = batch.len(),
            received = verdicts.len(),
            "Classifier reply length mismatch, using untranslated fallback"
        );
        Ok(batch.iter().map(fallback_classification).collect())
    }
}

/// Drop hits without a title or URL and keep the first hit per URL
fn dedupe_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|h| !h.url.trim().is_empty() && !h.title.trim().is_empty())
        .filter(|h| seen.insert(h.url.clone()))
        .collect()
}

fn build_article(hit: &SearchHit, verdict: Classification) -> Article {
    let credibility = assess_credibility(hit, &verdict.signals);
    let title = if verdict.translated_title.trim().is_empty() {
        hit.title.clone()
    } else {
        verdict.translated_title
    };

    Article {
        id: article_id(&hit.url),
        url: hit.url.clone(),
        source: source_host(&hit.url).unwrap_or_default(),
        original_title: hit.title.clone(),
        title,
        summary: verdict.summary,
        category: verdict.category,
        published_at: hit.published_date,
        relevance: hit.score,
        credibility,
    }
}

fn sort_articles(articles: &mut [Article], order: SortOrder) {
    match order {
        // Option orders None first; reverse puts dated articles first, newest on top
        SortOrder::Newest => articles.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortOrder::Credibility => articles.sort_by(|a, b| {
            b.credibility
                .score
                .cmp(&a.credibility.score)
                .then_with(|| b.published_at.cmp(&a.published_at))
        }),
        SortOrder::Relevance => articles.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(Ordering::Equal)
        }),
    }
}
