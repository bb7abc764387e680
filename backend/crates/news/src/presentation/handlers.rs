//! HTTP Handlers

use crate::application::config::NewsConfig;
use crate::application::fetch_news::FetchNewsUseCase;
use crate::domain::provider::{ArticleClassifier, NewsSearchProvider};
use crate::error::{NewsError, NewsResult};
use crate::presentation::dto::{FetchNewsRequest, FetchNewsResponse};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use kernel::error::app_error::AppError;
use platform::client::get_client_identifier;
use platform::rate_limit::DailyQuota;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for news handlers
pub struct NewsAppState<S, C, Q> {
    pub search: Arc<S>,
    pub classifier: Arc<C>,
    pub config: Arc<NewsConfig>,
    pub quota: Arc<Q>,
}

impl<S, C, Q> Clone for NewsAppState<S, C, Q> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            classifier: self.classifier.clone(),
            config: self.config.clone(),
            quota: self.quota.clone(),
        }
    }
}

/// POST /api/news/fetch
///
/// The body is validated before the quota is touched, so a malformed
/// request never consumes one of the client's daily fetches.
pub async fn fetch_news<S, C, Q>(
    State(state): State<NewsAppState<S, C, Q>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<FetchNewsRequest>, JsonRejection>,
) -> NewsResult<Json<FetchNewsResponse>>
where
    S: NewsSearchProvider + Send + Sync + 'static,
    C: ArticleClassifier + Send + Sync + 'static,
    Q: DailyQuota + Send + Sync + 'static,
{
    let Json(req) = body.map_err(AppError::from)?;
    let input = req.validate()?;

    let identifier = get_client_identifier(&headers, Some(addr.ip()));
    let quota = state.quota.consume(&identifier).await?;
    if !quota.allowed {
        return Err(NewsError::QuotaExceeded {
            limit: quota.limit,
            reset_at_ms: quota.reset_at_ms,
        });
    }

    let use_case = FetchNewsUseCase::new(
        state.search.clone(),
        state.classifier.clone(),
        state.config.clone(),
    );
    let articles = use_case.execute(input).await?;

    tracing::info!(
        identifier = %identifier,
        articles = articles.len(),
        remaining = quota.remaining,
        "News fetch served"
    );

    Ok(Json(FetchNewsResponse::new(articles, &quota)))
}
