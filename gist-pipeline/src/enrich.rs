//! Insights, sentiment and translation on top of chat completion.
//!
//! Every operation asks the model for a JSON object, formats it when the
//! shape matches and otherwise hands back the model's raw answer. None of
//! them fail: missing credentials and provider errors become fixed text.

use crate::prompts;
use gist_common::language_name;
use gist_llm::normalize::extract_embedded_json;
use gist_llm::traits::{ChatClient, ProviderError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const INSIGHTS_NEED_KEY: &str =
    "Insights feature requires a RapidAPI key. Please add your API key to enable AI-powered insights.";
pub const SENTIMENT_NEED_KEY: &str = "Sentiment analysis requires a RapidAPI key.";
pub const TRANSLATION_NEED_KEY: &str = "Translation feature requires a RapidAPI key.";

pub const INSIGHTS_FAILED: &str = "Unable to generate insights at this time.";
pub const SENTIMENT_FAILED: &str = "Unable to analyze sentiment at this time.";
pub const TRANSLATION_FAILED: &str = "Unable to translate at this time.";

// Models drift on field types, so every field stays a raw JSON value and is
// rendered loosely. Only the headline field has to be present and non-empty.
#[derive(Debug, Deserialize)]
struct InsightsWire {
    insights: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SentimentWire {
    #[serde(default)]
    sentiment: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    explanation: Option<Value>,
    #[serde(default)]
    key_emotions: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TranslationWire {
    #[serde(default)]
    translation: Option<Value>,
    #[serde(default)]
    target_language: Option<Value>,
    #[serde(default)]
    original_language: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
}

/// Strings verbatim, other scalars and containers as JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rendered value, or `None` for missing, null, `false` or an empty string.
fn present(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::Null | Value::Bool(false) => None,
        v => Some(render(v)).filter(|s| !s.trim().is_empty()),
    }
}

fn or_unknown(value: &Option<Value>) -> String {
    present(value).unwrap_or_else(|| "Unknown".to_string())
}

/// Parse `answer` into `T` if it carries a JSON object of that shape.
fn parse_answer<T: DeserializeOwned>(answer: &str) -> Option<T> {
    extract_embedded_json(answer)
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok())
}

#[derive(Clone)]
pub struct EnrichmentGenerator {
    chat: Vec<Arc<dyn ChatClient>>,
}

impl EnrichmentGenerator {
    /// `chat` in preference order; empty disables enrichment.
    pub fn new(chat: Vec<Arc<dyn ChatClient>>) -> Self {
        Self { chat }
    }

    pub fn is_enabled(&self) -> bool {
        !self.chat.is_empty()
    }

    async fn complete(&self, op: &'static str, prompt: &str) -> Result<String, ProviderError> {
        let mut last = ProviderError::MissingCredential;
        for client in &self.chat {
            match client.chat_complete(prompt).await {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    tracing::warn!(op, provider = client.provider_name(), error = %e, "enrich.provider_failed");
                    last = e;
                }
            }
        }
        Err(last)
    }

    pub async fn generate_insights(&self, content: &str) -> String {
        if !self.is_enabled() {
            return INSIGHTS_NEED_KEY.to_string();
        }
        let answer = match self.complete("insights", &prompts::insights(content)).await {
            Ok(a) => a,
            Err(_) => return INSIGHTS_FAILED.to_string(),
        };
        match parse_answer::<InsightsWire>(&answer) {
            Some(wire) => format_insights(&wire.insights),
            None => answer,
        }
    }

    pub async fn analyze_sentiment(&self, content: &str) -> String {
        if !self.is_enabled() {
            return SENTIMENT_NEED_KEY.to_string();
        }
        let answer = match self.complete("sentiment", &prompts::sentiment(content)).await {
            Ok(a) => a,
            Err(_) => return SENTIMENT_FAILED.to_string(),
        };
        parse_answer::<SentimentWire>(&answer)
            .and_then(|wire| format_sentiment(&wire))
            .unwrap_or(answer)
    }

    /// Translate `text` into the language with code `target`.
    pub async fn translate_text(&self, text: &str, target: &str) -> String {
        if !self.is_enabled() {
            return TRANSLATION_NEED_KEY.to_string();
        }
        let target_name = language_name(target);
        let prompt = prompts::translation(text, target_name);
        let answer = match self.complete("translation", &prompt).await {
            Ok(a) => a,
            Err(_) => return TRANSLATION_FAILED.to_string(),
        };
        parse_answer::<TranslationWire>(&answer)
            .and_then(|wire| format_translation(&wire, target_name))
            .unwrap_or(answer)
    }
}

fn format_insights(insights: &[Value]) -> String {
    insights
        .iter()
        .filter(|i| !i.is_null())
        .map(|i| format!("• {}", render(i)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_sentiment(wire: &SentimentWire) -> Option<String> {
    let sentiment = present(&wire.sentiment)?;
    let emotions = match &wire.key_emotions {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|e| !e.is_null())
            .map(render)
            .collect::<Vec<_>>()
            .join(", "),
        other => present(other).unwrap_or_default(),
    };
    let emotions = if emotions.is_empty() { "N/A".to_string() } else { emotions };
    Some(format!(
        "**Sentiment:** {} ({} confidence)\n\n**Analysis:** {}\n\n**Key Emotions:** {}",
        sentiment,
        or_unknown(&wire.confidence),
        or_unknown(&wire.explanation),
        emotions
    ))
}

fn format_translation(wire: &TranslationWire, target_name: &str) -> Option<String> {
    let translation = present(&wire.translation)?;
    Some(format!(
        "**Translation to {}:**\n\n{}\n\n*Original language: {} | Confidence: {}*",
        present(&wire.target_language).unwrap_or_else(|| target_name.to_string()),
        translation,
        or_unknown(&wire.original_language),
        or_unknown(&wire.confidence)
    ))
}
