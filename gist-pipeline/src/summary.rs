//! Summary generation as an ordered chain of strategies.
//!
//! Each strategy gets the same request and either produces a summary or an
//! error; [`SummaryGenerator`] walks the chain and stops at the first
//! success. Only the last error escapes.

use crate::prompts;
use async_trait::async_trait;
use gist_common::SummaryStyle;
use gist_llm::normalize::summary_text;
use gist_llm::traits::{ArticleApi, ChatClient, ProviderError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub content: &'a str,
    pub style: SummaryStyle,
    pub language: &'a str,
}

#[async_trait]
pub trait SummaryStrategy: Send + Sync {
    async fn summarize(&self, req: SummaryRequest<'_>) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}

/// Style-aware summary through a chat-completion provider.
pub struct ChatStrategy {
    client: Arc<dyn ChatClient>,
}

impl ChatStrategy {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SummaryStrategy for ChatStrategy {
    async fn summarize(&self, req: SummaryRequest<'_>) -> Result<String, ProviderError> {
        let prompt = prompts::summary(req.style, req.language, req.content);
        self.client.chat_complete(&prompt).await
    }

    fn name(&self) -> &str {
        self.client.provider_name()
    }
}

/// Credential-independent summarizer. Ignores the style.
pub struct PlainTextStrategy {
    api: Arc<dyn ArticleApi>,
}

impl PlainTextStrategy {
    pub fn new(api: Arc<dyn ArticleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SummaryStrategy for PlainTextStrategy {
    async fn summarize(&self, req: SummaryRequest<'_>) -> Result<String, ProviderError> {
        let payload = self.api.summarize_text(req.content, req.language).await?;
        Ok(summary_text(&payload))
    }

    fn name(&self) -> &str {
        "plain-text"
    }
}

pub struct SummaryGenerator {
    chain: Vec<Arc<dyn SummaryStrategy>>,
}

impl SummaryGenerator {
    /// Chat clients in order, then the plain summarizer. With no chat
    /// clients the chain is the plain summarizer alone.
    pub fn new(chat: &[Arc<dyn ChatClient>], articles: Arc<dyn ArticleApi>) -> Self {
        let mut chain: Vec<Arc<dyn SummaryStrategy>> = chat
            .iter()
            .map(|c| Arc::new(ChatStrategy::new(c.clone())) as Arc<dyn SummaryStrategy>)
            .collect();
        chain.push(Arc::new(PlainTextStrategy::new(articles)));
        Self { chain }
    }

    pub fn from_chain(chain: Vec<Arc<dyn SummaryStrategy>>) -> Self {
        Self { chain }
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.chain.iter().map(|s| s.name()).collect()
    }

    pub async fn generate(
        &self,
        content: &str,
        style: SummaryStyle,
        language: &str,
    ) -> Result<String, ProviderError> {
        let req = SummaryRequest {
            content,
            style,
            language,
        };
        let mut last = ProviderError::Config("no summary strategy configured".into());

        for strategy in &self.chain {
            match strategy.summarize(req).await {
                Ok(summary) => {
                    tracing::debug!(strategy = strategy.name(), %style, language, "summary.ok");
                    return Ok(summary);
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "summary.strategy_failed");
                    last = e;
                }
            }
        }
        Err(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        name: &'static str,
        outcome: Result<String, ProviderError>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SummaryStrategy for Scripted {
        async fn summarize(&self, req: SummaryRequest<'_>) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(req.language.to_string());
            self.outcome.clone()
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn scripted(name: &'static str, outcome: Result<&str, ProviderError>) -> Arc<Scripted> {
        Arc::new(Scripted {
            name,
            outcome: outcome.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn first_success_wins() {
        let a = scripted("a", Err(ProviderError::Http { status: 500 }));
        let b = scripted("b", Ok("from b"));
        let c = scripted("c", Ok("from c"));
        let chain: Vec<Arc<dyn SummaryStrategy>> = vec![a.clone(), b.clone(), c.clone()];
        let generator = SummaryGenerator::from_chain(chain);

        let out = generator.generate("x", SummaryStyle::Brief, "de").await;

        assert_eq!(out.unwrap(), "from b");
        assert_eq!(a.seen.lock().unwrap().as_slice(), ["de"]);
        assert!(c.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn last_error_propagates() {
        let a = scripted("a", Err(ProviderError::Http { status: 500 }));
        let b = scripted("b", Err(ProviderError::Http { status: 502 }));
        let chain: Vec<Arc<dyn SummaryStrategy>> = vec![a, b];
        let generator = SummaryGenerator::from_chain(chain);

        let err = generator
            .generate("x", SummaryStyle::Balanced, "en")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Http { status: 502 });
    }
}
