//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, SecondsFormat, Utc};
use platform::rate_limit::{RateLimitResult, WINDOW_SECS};
use serde::{Deserialize, Serialize};

use crate::application::config::NewsConfig;
use crate::application::fetch_news::FetchNewsInput;
use crate::domain::entities::Article;
use crate::domain::value_objects::{Category, CategoryFilter, CredibilityLevel, Language, SortOrder};
use crate::error::{NewsError, NewsResult};

/// Millisecond timestamp as `2025-01-01T00:00:00.000Z`
pub fn iso8601_from_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Request for POST /api/news/fetch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNewsRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl FetchNewsRequest {
    /// Validate into use case input
    pub fn validate(self) -> NewsResult<FetchNewsInput> {
        let category = match self.category.as_deref() {
            None => CategoryFilter::All,
            Some(raw) => raw.parse().map_err(NewsError::InvalidRequest)?,
        };

        let language = match self.language.as_deref().map(str::trim) {
            None => Language::default(),
            Some(l) if l.eq_ignore_ascii_case("en") => Language::En,
            Some(l) if l.eq_ignore_ascii_case("ja") => Language::Ja,
            Some(other) => {
                return Err(NewsError::InvalidRequest(format!(
                    "unsupported language: {other}"
                )));
            }
        };

        let sort = match self.sort.as_deref().map(str::trim) {
            None => SortOrder::default(),
            Some(s) if s.eq_ignore_ascii_case("newest") => SortOrder::Newest,
            Some(s) if s.eq_ignore_ascii_case("credibility") => SortOrder::Credibility,
            Some(s) if s.eq_ignore_ascii_case("relevance") => SortOrder::Relevance,
            Some(other) => {
                return Err(NewsError::InvalidRequest(format!(
                    "unsupported sort order: {other}"
                )));
            }
        };

        let max_results = match self.max_results {
            None => None,
            Some(n) if (1..=u32::from(NewsConfig::MAX_RESULTS_CAP)).contains(&n) => Some(n as u8),
            Some(n) => {
                return Err(NewsError::InvalidRequest(format!(
                    "maxResults must be between 1 and {}, got {n}",
                    NewsConfig::MAX_RESULTS_CAP
                )));
            }
        };

        Ok(FetchNewsInput {
            category,
            language,
            sort,
            max_results,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CredibilityDto {
    pub score: u8,
    pub level: CredibilityLevel,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub id: String,
    pub url: String,
    pub source: String,
    pub original_title: String,
    pub title: String,
    pub summary: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub relevance: f64,
    pub credibility: CredibilityDto,
}

impl From<Article> for ArticleDto {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            url: a.url,
            source: a.source,
            original_title: a.original_title,
            title: a.title,
            summary: a.summary,
            category: a.category,
            published_at: a.published_at.map(iso8601),
            relevance: a.relevance,
            credibility: CredibilityDto {
                score: a.credibility.score,
                level: a.credibility.level,
                reasons: a.credibility.reasons,
            },
        }
    }
}

/// Quota state after the current request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDto {
    pub limit: u32,
    pub remaining: u32,
    pub reset_time: String,
}

impl From<&RateLimitResult> for QuotaDto {
    fn from(r: &RateLimitResult) -> Self {
        Self {
            limit: r.limit,
            remaining: r.remaining,
            reset_time: iso8601_from_ms(r.reset_at_ms),
        }
    }
}

/// Response for POST /api/news/fetch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNewsResponse {
    pub articles: Vec<ArticleDto>,
    pub total: usize,
    pub fetched_at: String,
    pub quota: QuotaDto,
}

impl FetchNewsResponse {
    pub fn new(articles: Vec<Article>, quota: &RateLimitResult) -> Self {
        let articles: Vec<ArticleDto> = articles.into_iter().map(ArticleDto::from).collect();
        Self {
            total: articles.len(),
            articles,
            fetched_at: iso8601(Utc::now()),
            quota: quota.into(),
        }
    }
}

/// 429 body when the daily quota is used up
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitExceededResponse {
    pub error: String,
    pub retry_after: u64,
    pub reset_time: String,
    pub limit: u32,
}

impl RateLimitExceededResponse {
    pub fn new(limit: u32, reset_at_ms: i64) -> Self {
        Self {
            error: format!(
                "Daily rate limit exceeded ({limit} request/day). Please try again tomorrow."
            ),
            retry_after: WINDOW_SECS,
            reset_time: iso8601_from_ms(reset_at_ms),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_uses_defaults() {
        let input = FetchNewsRequest::default().validate().unwrap();
        assert_eq!(input.category, CategoryFilter::All);
        assert_eq!(input.language, Language::En);
        assert_eq!(input.sort, SortOrder::Newest);
        assert_eq!(input.max_results, None);
    }

    #[test]
    fn test_request_parses_camel_case() {
        let req: FetchNewsRequest = serde_json::from_str(
            r#"{"category":"Economy","language":"ja","sort":"credibility","maxResults":10}"#,
        )
        .unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.category, CategoryFilter::Only(Category::Economy));
        assert_eq!(input.language, Language::Ja);
        assert_eq!(input.sort, SortOrder::Credibility);
        assert_eq!(input.max_results, Some(10));
    }

    #[test]
    fn test_request_rejects_out_of_range_values() {
        for req in [
            FetchNewsRequest {
                max_results: Some(0),
                ..Default::default()
            },
            FetchNewsRequest {
                max_results: Some(51),
                ..Default::default()
            },
            FetchNewsRequest {
                category: Some("weather".into()),
                ..Default::default()
            },
            FetchNewsRequest {
                language: Some("fr".into()),
                ..Default::default()
            },
            FetchNewsRequest {
                sort: Some("oldest".into()),
                ..Default::default()
            },
        ] {
            assert!(matches!(req.validate(), Err(NewsError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_rate_limit_exceeded_body() {
        let body = serde_json::to_value(RateLimitExceededResponse::new(3, 86_400_000)).unwrap();
        assert_eq!(
            body["error"],
            "Daily rate limit exceeded (3 request/day). Please try again tomorrow."
        );
        assert_eq!(body["retryAfter"], 86_400);
        assert_eq!(body["resetTime"], "1970-01-02T00:00:00.000Z");
        assert_eq!(body["limit"], 3);
    }

    #[test]
    fn test_quota_dto() {
        let result = RateLimitResult {
            allowed: true,
            remaining: 2,
            reset_at_ms: 0,
            limit: 3,
        };
        let body = serde_json::to_value(QuotaDto::from(&result)).unwrap();
        assert_eq!(body["remaining"], 2);
        assert_eq!(body["resetTime"], "1970-01-01T00:00:00.000Z");
    }
}
