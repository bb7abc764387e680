//! OpenAI-compatible chat completions classifier
//!
//! One request per batch. The model answers with a JSON object holding an
//! `articles` array in the same order as the input.

use kernel::error::app_error::ResultExt;
use kernel::error::kind::ErrorKind;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::config::{LLM_API_KEY_VAR, NewsConfig};
use crate::domain::entities::{Classification, CredibilitySignals};
use crate::domain::provider::{ArticleClassifier, ClassificationInput, ClassifyOptions};
use crate::domain::value_objects::{Category, Language};
use crate::error::{NewsError, NewsResult};

const PROVIDER: &str = "OpenAI";

#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    #[serde(default)]
    articles: Vec<ClassifiedArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifiedArticle {
    #[serde(default)]
    category: String,
    #[serde(default)]
    translated_title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    credibility: ReplySignals,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReplySignals {
    has_named_sources: bool,
    is_opinion: bool,
    sensational: bool,
}

impl From<ClassifiedArticle> for Classification {
    fn from(a: ClassifiedArticle) -> Self {
        Classification {
            category: Category::from_label(&a.category),
            translated_title: a.translated_title.trim().to_string(),
            summary: a.summary.trim().to_string(),
            signals: CredibilitySignals {
                has_named_sources: a.credibility.has_named_sources,
                is_opinion: a.credibility.is_opinion,
                is_sensational: a.credibility.sensational,
            },
        }
    }
}

fn system_prompt(language: Language) -> String {
    let categories = Category::ALL.map(|c| c.as_str()).join(", ");
    format!(
        "You classify news articles about Japan. For each input article, in order, return:\n\
         - category: one of {categories}\n\
         - translatedTitle: the title in {lang}\n\
         - summary: two or three sentences in {lang}\n\
         - credibility: {{ \"hasNamedSources\": bool, \"isOpinion\": bool, \"sensational\": bool }}\n\
         Respond with a JSON object {{ \"articles\": [...] }} containing exactly one entry per input article.",
        lang = language.english_name(),
    )
}

fn user_prompt(items: &[ClassificationInput]) -> String {
    let payload: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "index": i,
                "title": item.title,
                "url": item.url,
                "content": item.content,
            })
        })
        .collect();
    json!({ "articles": payload }).to_string()
}

/// Pull the classifications out of a chat completion reply
fn parse_reply(resp: ChatResponse) -> NewsResult<Vec<Classification>> {
    let content = resp
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| NewsError::Upstream {
            provider: PROVIDER,
            message: "empty choices".to_string(),
        })?;

    let reply: ClassifierReply =
        serde_json::from_str(&content).map_err(|e| NewsError::Upstream {
            provider: PROVIDER,
            message: format!("unreadable classifier reply: {e}"),
        })?;

    Ok(reply.articles.into_iter().map(Classification::from).collect())
}

impl OpenAiClassifier {
    pub fn new(config: &NewsConfig) -> NewsResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_app_err(ErrorKind::InternalServerError, "HTTP client build failed")?;

        Ok(Self {
            client,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            api_key: config.llm_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl ArticleClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        items: &[ClassificationInput],
        options: &ClassifyOptions,
    ) -> NewsResult<Vec<Classification>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(NewsError::NotConfigured {
                provider: PROVIDER,
                var: LLM_API_KEY_VAR,
            });
        };

        let body = ChatRequest {
            model: &options.model,
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(options.language),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(items),
                },
            ],
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
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

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| NewsError::from_reqwest(PROVIDER, e))?;

        let classifications = parse_reply(parsed)?;
        tracing::debug!(
            requested = items.len(),
            received = classifications.len(),
            model = %options.model,
            "Classifier batch completed"
        );
        Ok(classifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: content.to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_parse_reply() {
        let content = r#"{"articles":[
            {"category":"Economy","translatedTitle":" 日銀、金利据え置き ","summary":"要約",
             "credibility":{"hasNamedSources":true,"isOpinion":false,"sensational":false}},
            {"category":"weather","translatedTitle":"t","summary":"s"}
        ]}"#;
        let result = parse_reply(reply(content)).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, Category::Economy);
        assert_eq!(result[0].translated_title, "日銀、金利据え置き");
        assert!(result[0].signals.has_named_sources);
        assert_eq!(result[1].category, Category::Other);
        assert_eq!(result[1].signals, CredibilitySignals::default());
    }

    #[test]
    fn test_parse_reply_rejects_non_json() {
        let err = parse_reply(reply("Sure! Here are the articles")).unwrap_err();
        assert!(matches!(err, NewsError::Upstream { provider: "OpenAI", .. }));

        let err = parse_reply(ChatResponse { choices: vec![] }).unwrap_err();
        assert!(matches!(err, NewsError::Upstream { .. }));
    }

    #[test]
    fn test_prompts() {
        let system = system_prompt(Language::Ja);
        assert!(system.contains("Japanese"));
        assert!(system.contains("international"));

        let user = user_prompt(&[ClassificationInput {
            title: "t".into(),
            content: "c".into(),
            url: "https://example.com".into(),
        }]);
        let value: serde_json::Value = serde_json::from_str(&user).unwrap();
        assert_eq!(value["articles"][0]["index"], 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let classifier = OpenAiClassifier::new(&NewsConfig::default()).unwrap();
        let options = ClassifyOptions {
            language: Language::En,
            model: "gpt-4o-mini".into(),
        };
        let items = [ClassificationInput {
            title: "t".into(),
            content: "c".into(),
            url: "https://example.com".into(),
        }];
        let err = classifier.classify(&items, &options).await.unwrap_err();
        assert!(matches!(
            err,
            NewsError::NotConfigured {
                var: "OPENAI_API_KEY",
                ..
            }
        ));
    }
}
