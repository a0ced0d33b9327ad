use crate::enrich::EnrichmentGenerator;
use crate::error::{FailureReason, ProcessingFailed};
use crate::sanitizer::sanitize;
use crate::summary::SummaryGenerator;
use chrono::Utc;
use gist_common::{ArticleResult, SummaryStyle};
use gist_llm::Providers;
use gist_llm::normalize::{ExtractedArticle, summary_text};
use gist_llm::traits::{ArticleApi, ProviderError};
use std::sync::Arc;
use url::Url;

pub const UNTITLED: &str = "Untitled Article";
pub const FALLBACK_TITLE: &str = "Article Summary";
pub const FALLBACK_INSIGHTS: &str = "Unable to generate insights without full content.";
pub const FALLBACK_SENTIMENT: &str = "Unable to analyze sentiment without full content.";
pub const INSIGHTS_ABORTED: &str = "Unable to generate insights.";
pub const SENTIMENT_ABORTED: &str = "Unable to analyze sentiment.";

/// URL in, [`ArticleResult`] out.
///
/// Extraction failure switches to a degraded path that summarizes whatever
/// a second extraction attempt yields with the plain summarizer. Enrichment
/// only runs when a chat provider is configured.
pub struct ArticlePipeline {
    articles: Arc<dyn ArticleApi>,
    summaries: SummaryGenerator,
    enrichment: EnrichmentGenerator,
}

impl ArticlePipeline {
    pub fn new(providers: Providers) -> Self {
        let summaries = SummaryGenerator::new(&providers.chat, providers.articles.clone());
        tracing::debug!(chain = ?summaries.strategy_names(), "pipeline.summary_chain");
        Self {
            articles: providers.articles,
            summaries,
            enrichment: EnrichmentGenerator::new(providers.chat),
        }
    }

    pub fn enrichment(&self) -> &EnrichmentGenerator {
        &self.enrichment
    }

    pub async fn process_article(
        &self,
        raw_url: &str,
        style: SummaryStyle,
        language: &str,
    ) -> Result<ArticleResult, ProcessingFailed> {
        let url = sanitize(raw_url).map_err(|e| {
            tracing::warn!(input = %e.input, reason = e.reason, "pipeline.invalid_url");
            ProcessingFailed::new(FailureReason::InvalidUrl, &e)
        })?;
        tracing::info!(%url, %style, language, "pipeline.start");

        let article = match self.articles.extract(&url).await {
            Ok(payload) => ExtractedArticle::from_payload(&payload),
            Err(e) => {
                tracing::warn!(%url, error = %e, "pipeline.extract_failed: trying fallback");
                return self.fallback_summary(&url, language).await.map_err(|e| {
                    tracing::error!(%url, error = %e, "pipeline.fallback_failed");
                    ProcessingFailed::new(FailureReason::FallbackFailed, e)
                });
            }
        };

        let summary = self
            .summaries
            .generate(&article.content, style, language)
            .await
            .map_err(|e| {
                tracing::error!(%url, error = %e, "pipeline.summary_failed");
                ProcessingFailed::new(FailureReason::SummarizationFailed, e)
            })?;

        let (insights, sentiment) = if self.enrichment.is_enabled() && !article.content.is_empty()
        {
            self.enrich(article.content.clone()).await
        } else {
            (String::new(), String::new())
        };

        tracing::info!(%url, summary_len = summary.len(), "pipeline.done");
        Ok(ArticleResult {
            url: url.to_string(),
            title: article.title.unwrap_or_else(|| UNTITLED.to_string()),
            summary,
            insights,
            sentiment,
            translation: String::new(),
            timestamp: Utc::now(),
        })
    }

    /// Insights and sentiment side by side. Both tasks run to completion;
    /// if either dies, both fields get the abort text.
    async fn enrich(&self, content: String) -> (String, String) {
        let content = Arc::new(content);

        let insights = tokio::spawn({
            let enrichment = self.enrichment.clone();
            let content = content.clone();
            async move { enrichment.generate_insights(&content).await }
        });
        let sentiment = tokio::spawn({
            let enrichment = self.enrichment.clone();
            async move { enrichment.analyze_sentiment(&content).await }
        });

        match tokio::join!(insights, sentiment) {
            (Ok(i), Ok(s)) => (i, s),
            (i, s) => {
                for err in [i.err(), s.err()].into_iter().flatten() {
                    tracing::error!(error = %err, "pipeline.enrichment_task_died");
                }
                (INSIGHTS_ABORTED.to_string(), SENTIMENT_ABORTED.to_string())
            }
        }
    }

    async fn fallback_summary(
        &self,
        url: &Url,
        language: &str,
    ) -> Result<ArticleResult, ProviderError> {
        let payload = self.articles.extract(url).await?;
        let article = ExtractedArticle::from_payload(&payload);
        if article.content.is_empty() {
            return Err(ProviderError::EmptyContent);
        }

        let summary = self
            .articles
            .summarize_text(&article.content, language)
            .await?;
        tracing::info!(%url, "pipeline.fallback_ok");

        Ok(ArticleResult {
            url: url.to_string(),
            title: FALLBACK_TITLE.to_string(),
            summary: summary_text(&summary),
            insights: FALLBACK_INSIGHTS.to_string(),
            sentiment: FALLBACK_SENTIMENT.to_string(),
            translation: String::new(),
            timestamp: Utc::now(),
        })
    }

    /// Copy of `result` with `translation` filled for `target`. A result
    /// without a summary comes back untouched.
    pub async fn retranslate(&self, result: &ArticleResult, target: &str) -> ArticleResult {
        if result.summary.is_empty() {
            return result.clone();
        }
        let translation = self.enrichment.translate_text(&result.summary, target).await;
        tracing::info!(url = %result.url, target, "pipeline.retranslated");
        result.with_translation(translation)
    }
}
