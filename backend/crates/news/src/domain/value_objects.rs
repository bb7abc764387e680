//! Domain Value Objects
//!
//! Small closed vocabularies used by requests, the classifier and scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// News category assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Politics,
    Economy,
    Society,
    Technology,
    Culture,
    Sports,
    International,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Politics,
        Category::Economy,
        Category::Society,
        Category::Technology,
        Category::Culture,
        Category::Sports,
        Category::International,
        Category::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Politics => "politics",
            Category::Economy => "economy",
            Category::Society => "society",
            Category::Technology => "technology",
            Category::Culture => "culture",
            Category::Sports => "sports",
            Category::International => "international",
            Category::Other => "other",
        }
    }

    /// Extra search terms that steer the provider towards this category
    pub const fn search_terms(&self) -> &'static str {
        match self {
            Category::Politics => "politics government Diet",
            Category::Economy => "economy business markets yen",
            Category::Society => "society",
            Category::Technology => "technology science",
            Category::Culture => "culture entertainment",
            Category::Sports => "sports",
            Category::International => "international relations diplomacy",
            Category::Other => "",
        }
    }

    /// Lenient parse for classifier output; anything unknown is `Other`
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Category::Other)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter of a fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// Target language for translated titles and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub const fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    pub const fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "Japanese",
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently published first, undated last
    #[default]
    Newest,
    /// Highest credibility score first
    Credibility,
    /// Search provider's relevance score
    Relevance,
}

/// Coarse credibility bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityLevel {
    Low,
    Medium,
    High,
}

impl CredibilityLevel {
    pub const HIGH_THRESHOLD: u8 = 75;
    pub const MEDIUM_THRESHOLD: u8 = 50;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            CredibilityLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            CredibilityLevel::Medium
        } else {
            CredibilityLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Politics".parse::<Category>(), Ok(Category::Politics));
        assert_eq!(" ECONOMY ".parse::<Category>(), Ok(Category::Economy));
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_from_label_defaults_to_other() {
        assert_eq!(Category::from_label("technology"), Category::Technology);
        assert_eq!(Category::from_label("gossip"), Category::Other);
    }

    #[test]
    fn test_category_filter() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        let sports: CategoryFilter = "sports".parse().unwrap();
        assert!(sports.matches(Category::Sports));
        assert!(!sports.matches(Category::Culture));
        assert!(CategoryFilter::All.matches(Category::Other));
    }

    #[test]
    fn test_credibility_level_thresholds() {
        assert_eq!(CredibilityLevel::from_score(100), CredibilityLevel::High);
        assert_eq!(CredibilityLevel::from_score(75), CredibilityLevel::High);
        assert_eq!(CredibilityLevel::from_score(74), CredibilityLevel::Medium);
        assert_eq!(CredibilityLevel::from_score(50), CredibilityLevel::Medium);
        assert_eq!(CredibilityLevel::from_score(49), CredibilityLevel::Low);
    }

    #[test]
    fn test_language_serde() {
        let lang: Language = serde_json::from_str(r#""ja""#).unwrap();
        assert_eq!(lang, Language::Ja);
        assert_eq!(lang.code(), "ja");
    }
}
