//! Application Configuration
//!
//! Configuration for the news fetch pipeline and its providers.

use std::str::FromStr;
use std::time::Duration;

pub const SEARCH_API_KEY_VAR: &str = "TAVILY_API_KEY";
pub const LLM_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// News application configuration
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Search provider API key
    pub search_api_key: Option<String>,
    /// Search provider base URL
    pub search_base_url: String,
    /// LLM provider API key
    pub llm_api_key: Option<String>,
    /// LLM provider base URL (OpenAI-compatible)
    pub llm_base_url: String,
    /// Chat model used for classification and translation
    pub llm_model: String,
    /// Leading term of every search query
    pub base_query: String,
    /// Default number of search results per fetch
    pub max_results: u8,
    /// Only search articles published in the last N days
    pub search_days: u16,
    /// Articles per classifier call
    pub classify_batch_size: usize,
    /// Timeout for each provider HTTP call
    pub request_timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            search_api_key: None,
            search_base_url: "https://api.tavily.com".to_string(),
            llm_api_key: None,
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            base_query: "Japan".to_string(),
            max_results: 20,
            search_days: 3,
            classify_batch_size: 5,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl NewsConfig {
    /// Upper bound accepted for `maxResults` in a request
    pub const MAX_RESULTS_CAP: u8 = 50;

    /// Load from the environment, falling back to defaults per field
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            search_api_key: get(SEARCH_API_KEY_VAR),
            search_base_url: get("TAVILY_BASE_URL").unwrap_or(defaults.search_base_url),
            llm_api_key: get(LLM_API_KEY_VAR),
            llm_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: get("OPENAI_MODEL").unwrap_or(defaults.llm_model),
            base_query: get("NEWS_BASE_QUERY").unwrap_or(defaults.base_query),
            max_results: parse_var(&get, "NEWS_MAX_RESULTS")
                .map(|n: u8| n.clamp(1, Self::MAX_RESULTS_CAP))
                .unwrap_or(defaults.max_results),
            search_days: parse_var(&get, "NEWS_SEARCH_DAYS")
                .filter(|&n: &u16| n > 0)
                .unwrap_or(defaults.search_days),
            classify_batch_size: parse_var(&get, "NEWS_CLASSIFY_BATCH_SIZE")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.classify_batch_size),
            request_timeout: parse_var(&get, "NEWS_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

fn parse_var<T: FromStr>(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    get(name).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = NewsConfig::default();
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.max_results, 20);
        assert_eq!(config.search_days, 3);
        assert_eq!(config.classify_batch_size, 5);
        assert!(config.search_api_key.is_none());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TAVILY_API_KEY", "tvly-test"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("NEWS_MAX_RESULTS", "200"),
            ("NEWS_CLASSIFY_BATCH_SIZE", "0"),
            ("NEWS_SEARCH_DAYS", "7"),
        ]);
        let config = NewsConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.search_api_key.as_deref(), Some("tvly-test"));
        assert_eq!(config.llm_model, "gpt-4.1-mini");
        assert_eq!(config.max_results, NewsConfig::MAX_RESULTS_CAP);
        assert_eq!(config.classify_batch_size, 5);
        assert_eq!(config.search_days, 7);
        assert!(config.llm_api_key.is_none());
    }
}
