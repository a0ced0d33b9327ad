//! Turning loosely shaped provider JSON into plain strings and typed values.
//!
//! Providers disagree on field names (`content` vs `text`, `summary` vs
//! `text`) and chat models like to wrap JSON answers in prose or markdown
//! fences. Everything untyped stops here.

use regex::Regex;
use serde_json::Value;

pub const NO_RESPONSE: &str = "No response received";
pub const NO_SUMMARY: &str = "Unable to generate summary";

/// First present, non-empty string among `keys`, else an empty string.
///
/// ```
/// use gist_llm::normalize::extract_field;
/// use serde_json::json;
///
/// let payload = json!({"content": "", "text": "body", "title": 3});
/// assert_eq!(extract_field(&payload, &["content", "text"]), "body");
/// assert_eq!(extract_field(&payload, &["title"]), "");
/// ```
pub fn extract_field(payload: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| payload.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Find a JSON object or array in a model answer.
///
/// Tries the whole text first, then the body of a ```` ```json ```` fence,
/// then an untagged fence. Only the first fence that matches is parsed.
pub fn extract_embedded_json(text: &str) -> Option<Value> {
    let structured = |v: &Value| v.is_object() || v.is_array();

    if let Ok(v) = serde_json::from_str::<Value>(text.trim()) {
        return Some(v).filter(structured);
    }

    let tagged = Regex::new(r"(?s)```json\s*(.*?)\s*```").ok()?;
    let plain = Regex::new(r"(?s)```\s*(.*?)\s*```").ok()?;
    let caps = tagged.captures(text).or_else(|| plain.captures(text))?;
    let inner = caps.get(1)?.as_str();

    serde_json::from_str::<Value>(inner)
        .ok()
        .filter(structured)
}

/// Typed view of an extraction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// `content`, else `text`, else empty.
    pub content: String,
    pub title: Option<String>,
}

impl ExtractedArticle {
    pub fn from_payload(payload: &Value) -> Self {
        let title = extract_field(payload, &["title"]);
        Self {
            content: extract_field(payload, &["content", "text"]),
            title: (!title.is_empty()).then_some(title),
        }
    }
}

/// Summary text from a plain summarizer payload.
pub fn summary_text(payload: &Value) -> String {
    let s = extract_field(payload, &["summary", "text"]);
    if s.is_empty() { NO_SUMMARY.to_string() } else { s }
}

/// Answer text from a chat-completion payload.
pub fn chat_text(payload: &Value) -> String {
    let s = extract_field(payload, &["result", "content", "message"]);
    if s.is_empty() { NO_RESPONSE.to_string() } else { s }
}
