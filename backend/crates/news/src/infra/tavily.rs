//! Tavily search client

use chrono::{DateTime, Utc};
use kernel::error::app_error::ResultExt;
use kernel::error::kind::ErrorKind;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::config::{NewsConfig, SEARCH_API_KEY_VAR};
use crate::domain::entities::SearchHit;
use crate::domain::provider::{NewsSearchProvider, SearchOptions};
use crate::error::{NewsError, NewsResult};

const PROVIDER: &str = "Tavily";

/// News search over the Tavily `/search` endpoint
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    topic: &'static str,
    days: u16,
    max_results: u8,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    score: f64,
}

impl From<SearchResult> for SearchHit {
    fn from(r: SearchResult) -> Self {
        SearchHit {
            published_date: r.published_date.as_deref().and_then(parse_published_date),
            url: r.url.trim().to_string(),
            title: r.title.trim().to_string(),
            content: r.content,
            raw_content: r.raw_content.filter(|c| !c.trim().is_empty()),
            score: r.score,
        }
    }
}

/// Tavily reports dates as RFC 2822 for news and RFC 3339 elsewhere
fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

impl TavilyClient {
    pub fn new(config: &NewsConfig) -> NewsResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_app_err(ErrorKind::InternalServerError, "HTTP client build failed")?;

        Ok(Self {
            client,
            base_url: config.search_base_url.trim_end_matches('/').to_string(),
            api_key: config.search_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl NewsSearchProvider for TavilyClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> NewsResult<Vec<SearchHit>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(NewsError::NotConfigured {
                provider: PROVIDER,
                var: SEARCH_API_KEY_VAR,
            });
        };

        let body = SearchRequest {
            query,
            topic: "news",
            days: options.days,
            max_results: options.max_results,
            include_raw_content: options.include_raw_content,
        };

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsError::from_reqwest(PROVIDER, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NewsError::Upstream {
                provider: PROVIDER,
                message: format!("HTTP {status}"),
            });
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| NewsError::from_reqwest(PROVIDER, e))?;

        tracing::debug!(results = parsed.results.len(), "Tavily search returned");

        Ok(parsed.results.into_iter().map(SearchHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "query": "Japan news",
            "results": [
                {
                    "title": " Diet passes budget ",
                    "url": "https://www.japantimes.co.jp/news/1",
                    "content": "The Diet passed the budget.",
                    "raw_content": "",
                    "published_date": "Mon, 13 Jan 2025 08:15:00 GMT",
                    "score": 0.82
                },
                {
                    "title": "Undated",
                    "url": "https://example.com/2",
                    "content": "c"
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let hits: Vec<SearchHit> = parsed.results.into_iter().map(SearchHit::from).collect();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Diet passes budget");
        assert!(hits[0].raw_content.is_none());
        assert_eq!(
            hits[0].published_date.map(|d| d.to_rfc3339()),
            Some("2025-01-13T08:15:00+00:00".to_string())
        );
        assert_eq!(hits[1].published_date, None);
        assert_eq!(hits[1].score, 0.0);
    }

    #[test]
    fn test_parse_published_date_formats() {
        assert!(parse_published_date("2025-01-13T08:15:00Z").is_some());
        assert!(parse_published_date("Mon, 13 Jan 2025 08:15:00 +0900").is_some());
        assert!(parse_published_date("yesterday").is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = SearchRequest {
            query: "Japan sports news",
            topic: "news",
            days: 3,
            max_results: 20,
            include_raw_content: true,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["topic"], "news");
        assert_eq!(value["max_results"], 20);
        assert_eq!(value["include_raw_content"], true);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = TavilyClient::new(&NewsConfig::default()).unwrap();
        assert!(!client.is_configured());

        let options = SearchOptions {
            max_results: 5,
            days: 3,
            include_raw_content: false,
        };
        let err = client.search("Japan news", &options).await.unwrap_err();
        assert!(matches!(
            err,
            NewsError::NotConfigured {
                var: "TAVILY_API_KEY",
                ..
            }
        ));
    }
}
