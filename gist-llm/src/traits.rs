use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Raw extraction response; its shape varies by provider.
pub type ExtractionPayload = Value;
/// Raw plain-text summarizer response.
pub type SummaryPayload = Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Non-2xx from the extraction or plain summarization endpoints.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// Non-2xx from a completion endpoint, with the upstream message.
    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider credential is not configured")]
    MissingCredential,

    #[error("no article content found to summarize")]
    EmptyContent,

    #[error("configuration error: {0}")]
    Config(String),
}

/// A chat-completion provider: one prompt in, free-form text out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `prompt` as a single user message.
    ///
    /// Always yields display-ready text on success; an unusable answer comes
    /// back as `"No response received"` rather than an empty string.
    async fn chat_complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Short name used in logs.
    fn provider_name(&self) -> &str;
}

/// Article extraction and the credential-independent plain summarizer.
#[async_trait]
pub trait ArticleApi: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<ExtractionPayload, ProviderError>;

    async fn summarize_text(&self, text: &str, lang: &str)
    -> Result<SummaryPayload, ProviderError>;
}
