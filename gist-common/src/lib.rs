//! Common types and utilities shared across Gist crates.
//!
//! This crate defines the article result model, the summary style and
//! language tables, the history store interface, and observability helpers
//! used throughout the Gist workspace. It is intentionally lightweight so
//! that every crate can depend on it without heavy transitive costs.
//!
//! # Overview
//!
//! - [`ArticleResult`]: The unit produced by the pipeline and kept in history
//! - [`SummaryStyle`]: Fixed style → instruction mapping
//! - [`language_name`]: Display names for ISO-639-1 codes
//! - [`ArticleStore`] and [`StoreError`]: History persistence seam
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use gist_common::{language_name, SummaryStyle};
//!
//! let style: SummaryStyle = "brief".parse().unwrap();
//! assert!(style.instruction().contains("2-3 sentences"));
//! assert_eq!(language_name("de"), "German");
//! assert_eq!(language_name("xx"), "xx");
//! ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// A processed article as shown to the user and kept in history.
///
/// Everything except `translation` is written once when the pipeline builds
/// the value; `translation` is overwritten by each re-translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResult {
    /// Sanitized absolute http(s) URL; unique key in the history store.
    pub url: String,
    pub title: String,
    /// Never empty on success, possibly a degraded placeholder.
    pub summary: String,
    /// Empty when not generated.
    #[serde(default)]
    pub insights: String,
    /// Empty when not generated.
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub translation: String,
    pub timestamp: DateTime<Utc>,
}

impl ArticleResult {
    /// Copy of this result with only `translation` replaced.
    pub fn with_translation(&self, translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            ..self.clone()
        }
    }
}

/// Summary flavours offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    Brief,
    #[default]
    Balanced,
    Detailed,
    #[serde(rename = "bulletpoints")]
    BulletPoints,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 4] = [
        SummaryStyle::Brief,
        SummaryStyle::Balanced,
        SummaryStyle::Detailed,
        SummaryStyle::BulletPoints,
    ];

    /// Instruction text prepended to the summarization prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            SummaryStyle::Brief => "Provide a very brief summary in 2-3 sentences.",
            SummaryStyle::Detailed => {
                "Provide a comprehensive and detailed summary covering all key points."
            }
            SummaryStyle::Balanced => {
                "Provide a well-balanced summary that captures the main ideas concisely."
            }
            SummaryStyle::BulletPoints => {
                "Provide a summary in clear bullet points highlighting key information."
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SummaryStyle::Brief => "brief",
            SummaryStyle::Balanced => "balanced",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::BulletPoints => "bulletpoints",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a style key is not one of the four known styles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown summary style '{0}' (expected brief, balanced, detailed or bulletpoints)")]
pub struct UnknownStyle(pub String);

impl FromStr for SummaryStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SummaryStyle::ALL
            .into_iter()
            .find(|style| style.key() == key)
            .ok_or(UnknownStyle(s.to_string()))
    }
}

/// Default language code for summaries.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported language codes and their display names.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("hi", "Hindi"),
    ("ar", "Arabic"),
];

/// Display name for a language code; unknown codes come back unchanged.
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Errors raised by [`ArticleStore`] implementations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Local history of processed articles, keyed by URL.
///
/// The pipeline never touches the store; front ends persist what it returns.
pub trait ArticleStore {
    /// Insert as the most recent entry, replacing any entry with the same URL.
    fn add(&mut self, article: ArticleResult) -> Result<(), StoreError>;

    /// Replace the entry with the same URL in place. Returns false when absent.
    fn update(&mut self, article: ArticleResult) -> Result<bool, StoreError>;

    /// Remove by URL. Returns false when nothing matched.
    fn remove(&mut self, url: &str) -> Result<bool, StoreError>;

    /// All entries, most recent first.
    fn list(&self) -> Vec<ArticleResult>;

    /// Case-insensitive substring match over URL and summary.
    fn search(&self, query: &str) -> Vec<ArticleResult> {
        if query.is_empty() {
            return self.list();
        }
        let needle = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|a| {
                a.url.to_lowercase().contains(&needle)
                    || a.summary.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn get(&self, url: &str) -> Option<ArticleResult> {
        self.list().into_iter().find(|a| a.url == url)
    }
}
