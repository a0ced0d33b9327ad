//! Prompt text sent to chat-completion providers.

use gist_common::SummaryStyle;

pub fn summary(style: SummaryStyle, language: &str, content: &str) -> String {
    format!(
        "{} Please summarize the following article content in {}:\n\n{}",
        style.instruction(),
        language,
        content
    )
}

pub fn insights(content: &str) -> String {
    format!(
        r#"Analyze the following article and provide 3-5 key insights or takeaways.

Please respond with a JSON object in this format:
{{
  "insights": [
    "First key insight",
    "Second key insight",
    "Third key insight"
  ]
}}

Article content:
{content}"#
    )
}

pub fn sentiment(content: &str) -> String {
    format!(
        r#"Analyze the sentiment of the following article content.

Please respond with a JSON object in this format:
{{
  "sentiment": "Positive|Negative|Neutral",
  "confidence": "High|Medium|Low",
  "explanation": "Brief explanation of why this sentiment was assigned",
  "key_emotions": ["emotion1", "emotion2"]
}}

Article content:
{content}"#
    )
}

pub fn translation(text: &str, target_language: &str) -> String {
    format!(
        r#"Translate the following text to {target_language}.

Please respond with a JSON object in this format:
{{
  "original_language": "detected language",
  "target_language": "{target_language}",
  "translation": "the translated text",
  "confidence": "High|Medium|Low"
}}

Text to translate:
{text}"#
    )
}
