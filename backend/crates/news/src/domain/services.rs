//! Domain Services
//!
//! Pure functions: source credibility heuristics, article identity and
//! the fallback used when the classifier cannot be trusted for a batch.

use sha2::{Digest, Sha256};
use url::Url;

use crate::domain::entities::{
    Classification, CredibilityAssessment, CredibilitySignals, SearchHit,
};
use crate::domain::value_objects::{Category, CredibilityLevel};

/// Wire services, public broadcasters and national dailies
const ESTABLISHED_OUTLETS: &[&str] = &[
    "nhk.or.jp",
    "japantimes.co.jp",
    "asahi.com",
    "mainichi.jp",
    "yomiuri.co.jp",
    "nikkei.com",
    "kyodonews.net",
    "jiji.com",
    "japannews.yomiuri.co.jp",
    "sankei.com",
    "tokyo-np.co.jp",
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "bbc.co.uk",
    "bloomberg.com",
    "ft.com",
    "nytimes.com",
    "theguardian.com",
];

/// Press release wires and aggregators: real, but not independent reporting
const SECONDARY_OUTLETS: &[&str] = &[
    "prtimes.jp",
    "prnewswire.com",
    "businesswire.com",
    "news.yahoo.co.jp",
    "news.livedoor.com",
    "msn.com",
];

/// Self-publishing platforms
const BLOG_PLATFORMS: &[&str] = &[
    "note.com",
    "ameblo.jp",
    "hatenablog.com",
    "medium.com",
    "substack.com",
    "blogspot.com",
    "livedoor.blog",
    "fc2.com",
];

const BASE_SCORE: i32 = 50;
const SUMMARY_FALLBACK_CHARS: usize = 280;

/// Host name of `url`, without a leading `www.`
pub fn source_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// `host` is `domain` or one of its subdomains
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn host_in(host: &str, list: &[&str]) -> bool {
    list.iter().any(|domain| host_matches(host, domain))
}

/// Stable id: first 16 hex chars of SHA-256 over the URL
pub fn article_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..8])
}

/// Score a hit's credibility from its source and the classifier's signals
pub fn assess_credibility(hit: &SearchHit, signals: &CredibilitySignals) -> CredibilityAssessment {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();
    let mut adjust = |delta: i32, reason: &str| {
        score += delta;
        reasons.push(reason.to_string());
    };

    match source_host(&hit.url) {
        Some(host) if host_in(&host, ESTABLISHED_OUTLETS) => {
            adjust(25, "Established news organization")
        }
        Some(host) if host_in(&host, SECONDARY_OUTLETS) => {
            adjust(5, "Press release or aggregator source")
        }
        Some(host) if host_in(&host, BLOG_PLATFORMS) => adjust(-15, "Self-published platform"),
        Some(_) => {}
        None => adjust(-10, "Unparseable source URL"),
    }

    if hit.url.starts_with("https://") {
        adjust(5, "Served over HTTPS");
    }
    if hit.published_date.is_some() {
        adjust(5, "Publication date available");
    } else {
        adjust(0, "No publication date");
    }

    if signals.has_named_sources {
        adjust(10, "Cites named sources");
    }
    if signals.is_opinion {
        adjust(-10, "Opinion or editorial content");
    }
    if signals.is_sensational {
        adjust(-15, "Sensational language");
    }
    if hit.score >= 0.7 {
        adjust(5, "Highly relevant search match");
    }

    let score = score.clamp(0, 100) as u8;
    CredibilityAssessment {
        score,
        level: CredibilityLevel::from_score(score),
        reasons,
    }
}

/// Verdict used when the classifier's reply for a batch is unusable
pub fn fallback_classification(hit: &SearchHit) -> Classification {
    Classification {
        category: Category::Other,
        translated_title: hit.title.clone(),
        summary: truncate_chars(hit.content.trim(), SUMMARY_FALLBACK_CHARS),
        signals: CredibilitySignals::default(),
    }
}

/// Cut `text` to at most `max` characters, appending `…` when shortened
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            title: "Bank of Japan holds rates".to_string(),
            content: "The Bank of Japan kept its policy rate unchanged.".to_string(),
            raw_content: None,
            published_date: Some(Utc::now()),
            score: 0.5,
        }
    }

    #[test]
    fn test_source_host_strips_www() {
        assert_eq!(
            source_host("https://www.japantimes.co.jp/news/2025/"),
            Some("japantimes.co.jp".to_string())
        );
        assert_eq!(source_host("not a url"), None);
    }

    #[test]
    fn test_host_matching_requires_label_boundary() {
        assert!(host_matches("www3.nhk.or.jp", "nhk.or.jp"));
        assert!(host_matches("nhk.or.jp", "nhk.or.jp"));
        assert!(!host_matches("fakenhk.or.jp", "nhk.or.jp"));
    }

    #[test]
    fn test_established_outlet_scores_high() {
        let signals = CredibilitySignals {
            has_named_sources: true,
            ..Default::default()
        };
        let result = assess_credibility(&hit("https://www3.nhk.or.jp/news/html/1.html"), &signals);
        // 50 + 25 + 5 + 5 + 10
        assert_eq!(result.score, 95);
        assert_eq!(result.level, CredibilityLevel::High);
        assert!(result.reasons.iter().any(|r| r.contains("Established")));
    }

    #[test]
    fn test_sensational_blog_scores_low() {
        let signals = CredibilitySignals {
            is_opinion: true,
            is_sensational: true,
            ..Default::default()
        };
        let mut blog = hit("http://someone.hatenablog.com/entry/1");
        blog.published_date = None;
        let result = assess_credibility(&blog, &signals);
        // 50 - 15 - 10 - 15
        assert_eq!(result.score, 10);
        assert_eq!(result.level, CredibilityLevel::Low);
        assert!(result.reasons.iter().any(|r| r == "No publication date"));
    }

    #[test]
    fn test_score_is_clamped() {
        let signals = CredibilitySignals {
            is_opinion: true,
            is_sensational: true,
            has_named_sources: false,
        };
        let mut bad = hit("ftp://");
        bad.published_date = None;
        let result = assess_credibility(&bad, &signals);
        assert!(result.score <= 100);
        assert_eq!(result.level, CredibilityLevel::Low);
    }

    #[test]
    fn test_article_id_is_stable() {
        let a = article_id("https://mainichi.jp/english/articles/1");
        let b = article_id("https://mainichi.jp/english/articles/1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, article_id("https://mainichi.jp/english/articles/2"));
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("日本銀行", 2), "日本…");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_fallback_keeps_original_title() {
        let h = hit("https://example.com/a");
        let c = fallback_classification(&h);
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.translated_title, h.title);
        assert_eq!(c.signals, CredibilitySignals::default());
    }
}
