//! News Router

use crate::application::config::NewsConfig;
use crate::domain::provider::{ArticleClassifier, NewsSearchProvider};
use crate::infra::openai::OpenAiClassifier;
use crate::infra::tavily::TavilyClient;
use crate::presentation::handlers::{self, NewsAppState};
use axum::{Router, routing::post};
use platform::rate_limit::{DailyQuota, RateLimitConfig, RedisDailyQuota};
use std::sync::Arc;

/// Create the news router with the HTTP provider clients and the Redis quota
pub fn news_router(
    search: TavilyClient,
    classifier: OpenAiClassifier,
    config: NewsConfig,
    rate_limit: RateLimitConfig,
) -> Router {
    news_router_generic(search, classifier, RedisDailyQuota::new(rate_limit), config)
}

/// Create a news router for any provider and quota implementations
pub fn news_router_generic<S, C, Q>(search: S, classifier: C, quota: Q, config: NewsConfig) -> Router
where
    S: NewsSearchProvider + Send + Sync + 'static,
    C: ArticleClassifier + Send + Sync + 'static,
    Q: DailyQuota + Send + Sync + 'static,
{
    let state = NewsAppState {
        search: Arc::new(search),
        classifier: Arc::new(classifier),
        config: Arc::new(config),
        quota: Arc::new(quota),
    };

    Router::new()
        .route("/fetch", post(handlers::fetch_news::<S, C, Q>))
        .with_state(state)
}
