mod common;

use common::{StubArticles, StubChat, init_test_tracing, providers, well_behaved_chat};
use gist_common::SummaryStyle;
use gist_llm::traits::ProviderError;
use gist_pipeline::enrich::{INSIGHTS_FAILED, INSIGHTS_NEED_KEY, TRANSLATION_NEED_KEY};
use gist_pipeline::pipeline::{
    FALLBACK_INSIGHTS, FALLBACK_SENTIMENT, FALLBACK_TITLE, INSIGHTS_ABORTED, SENTIMENT_ABORTED,
    UNTITLED,
};
use gist_pipeline::{ArticlePipeline, FailureReason};
use serde_json::json;

const URL: &str = "https://news.test/story";

fn article() -> Result<serde_json::Value, ProviderError> {
    Ok(json!({"title": "Story", "content": "Long article body."}))
}

fn plain_summary() -> Result<serde_json::Value, ProviderError> {
    Ok(json!({"summary": "Plain summary."}))
}

#[tokio::test]
async fn without_credential_only_the_plain_summarizer_runs() {
    init_test_tracing();
    let articles = StubArticles::new(vec![article()], plain_summary());
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![]));

    let result = pipeline
        .process_article(URL, SummaryStyle::Detailed, "fr")
        .await
        .unwrap();

    assert_eq!(result.title, "Story");
    assert_eq!(result.summary, "Plain summary.");
    assert_eq!(result.insights, "");
    assert_eq!(result.sentiment, "");
    assert_eq!(result.translation, "");
    assert_eq!(articles.extracts(), 1);
    assert_eq!(articles.summarize_langs.lock().unwrap().as_slice(), ["fr"]);
}

#[tokio::test]
async fn without_credential_enrichment_is_a_placeholder() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let pipeline = ArticlePipeline::new(providers(articles, vec![]));

    assert_eq!(
        pipeline.enrichment().generate_insights("text").await,
        INSIGHTS_NEED_KEY
    );
    assert_eq!(
        pipeline.enrichment().translate_text("text", "es").await,
        TRANSLATION_NEED_KEY
    );
}

#[tokio::test]
async fn happy_path_uses_chat_and_enriches() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let chat = well_behaved_chat();
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![chat.clone()]));

    let result = pipeline
        .process_article("www.news.test/story", SummaryStyle::BulletPoints, "en")
        .await
        .unwrap();

    assert_eq!(result.url, "https://www.news.test/story");
    assert_eq!(result.summary, "Chat summary.");
    assert_eq!(result.insights, "• First\n\n• Second\n\n• Third");
    assert_eq!(
        result.sentiment,
        "**Sentiment:** Positive (High confidence)\n\n**Analysis:** Upbeat.\n\n**Key Emotions:** joy, hope"
    );
    assert_eq!(articles.summarizes(), 0);
    assert_eq!(chat.count(), 3);

    let prompts = chat.prompts.lock().unwrap();
    assert!(prompts[0].starts_with(SummaryStyle::BulletPoints.instruction()));
    assert!(prompts[0].ends_with("in en:\n\nLong article body."));
}

#[tokio::test]
async fn chat_failure_falls_back_to_plain_summary() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let chat = StubChat::failing("primary");
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![chat.clone()]));

    let result = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();

    assert_eq!(result.summary, "Plain summary.");
    assert_eq!(articles.summarizes(), 1);
    // One summary attempt plus one call per enrichment.
    assert_eq!(chat.count(), 3);
    assert_eq!(result.insights, INSIGHTS_FAILED);
}

#[tokio::test]
async fn secondary_chat_is_tried_before_the_plain_summarizer() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let primary = StubChat::failing("primary");
    let secondary = StubChat::new("secondary", |_| Ok("Secondary summary.".to_string()));
    let pipeline = ArticlePipeline::new(providers(
        articles.clone(),
        vec![primary.clone(), secondary.clone()],
    ));

    let result = pipeline
        .process_article(URL, SummaryStyle::Brief, "en")
        .await
        .unwrap();

    assert_eq!(result.summary, "Secondary summary.");
    assert_eq!(articles.summarizes(), 0);
    // Raw answers pass through when they carry no JSON.
    assert_eq!(result.insights, "Secondary summary.");
}

#[tokio::test]
async fn all_summary_strategies_failing_is_fatal() {
    let articles = StubArticles::new(vec![article()], Err(ProviderError::Http { status: 502 }));
    let pipeline = ArticlePipeline::new(providers(articles, vec![StubChat::failing("primary")]));

    let err = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap_err();

    assert_eq!(err.reason, FailureReason::SummarizationFailed);
    assert_eq!(err.detail, "HTTP error! status: 502");
}

#[tokio::test]
async fn extraction_failure_takes_the_degraded_path() {
    let articles = StubArticles::new(
        vec![Err(ProviderError::Http { status: 500 }), article()],
        plain_summary(),
    );
    let chat = well_behaved_chat();
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![chat.clone()]));

    let result = pipeline
        .process_article(URL, SummaryStyle::Balanced, "de")
        .await
        .unwrap();

    assert_eq!(result.title, FALLBACK_TITLE);
    assert_eq!(result.summary, "Plain summary.");
    assert_eq!(result.insights, FALLBACK_INSIGHTS);
    assert_eq!(result.sentiment, FALLBACK_SENTIMENT);
    assert_eq!(articles.extracts(), 2);
    assert_eq!(articles.summarize_langs.lock().unwrap().as_slice(), ["de"]);
    assert_eq!(chat.count(), 0);
}

#[tokio::test]
async fn fallback_with_empty_content_fails() {
    let articles = StubArticles::new(
        vec![Err(ProviderError::Http { status: 500 }), Ok(json!({"title": "T"}))],
        plain_summary(),
    );
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![]));

    let err = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap_err();

    assert_eq!(err.reason, FailureReason::FallbackFailed);
    assert_eq!(articles.summarizes(), 0);
}

#[tokio::test]
async fn fallback_extraction_failure_fails() {
    let articles = StubArticles::new(vec![Err(ProviderError::Http { status: 500 })], plain_summary());
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![]));

    let err = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap_err();

    assert_eq!(err.reason, FailureReason::FallbackFailed);
    assert_eq!(
        err.to_string(),
        "Failed to process article: Failed to extract or summarize article"
    );
    assert_eq!(articles.extracts(), 2);
}

#[tokio::test]
async fn invalid_urls_never_reach_a_provider() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![]));

    for raw in ["", "ftp://x.com", "<p>https://x.com</p>", "not a url"] {
        let err = pipeline
            .process_article(raw, SummaryStyle::Balanced, "en")
            .await
            .unwrap_err();
        assert_eq!(err.reason, FailureReason::InvalidUrl, "input {raw:?}");
    }
    assert_eq!(articles.extracts(), 0);
}

#[tokio::test]
async fn missing_title_and_content_still_produce_a_result() {
    let articles = StubArticles::new(vec![Ok(json!({}))], Ok(json!({})));
    let chat = well_behaved_chat();
    let pipeline = ArticlePipeline::new(providers(articles.clone(), vec![chat.clone()]));

    let result = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();

    assert_eq!(result.title, UNTITLED);
    assert_eq!(result.summary, "Chat summary.");
    // No content, no enrichment.
    assert_eq!(result.insights, "");
    assert_eq!(chat.count(), 1);
}

#[tokio::test]
async fn a_crashed_enrichment_task_blanks_both_fields() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let chat = StubChat::new("crashy", |prompt| {
        if prompt.contains("sentiment of the following") {
            panic!("provider client bug");
        }
        Ok(r#"{"insights": ["ok"]}"#.to_string())
    });
    let pipeline = ArticlePipeline::new(providers(articles, vec![chat.clone()]));

    let result = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();

    assert_eq!(result.insights, INSIGHTS_ABORTED);
    assert_eq!(result.sentiment, SENTIMENT_ABORTED);
    // Both tasks ran; the crash did not cancel the sibling.
    assert_eq!(chat.count(), 3);
}

#[tokio::test]
async fn repeated_runs_differ_only_in_timestamp() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let pipeline = ArticlePipeline::new(providers(articles, vec![well_behaved_chat()]));

    let first = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();
    let second = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();

    assert!(second.timestamp >= first.timestamp);
    assert_eq!(
        gist_common::ArticleResult {
            timestamp: first.timestamp,
            ..second
        },
        first
    );
}

#[tokio::test]
async fn retranslate_only_touches_translation() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let chat = well_behaved_chat();
    let pipeline = ArticlePipeline::new(providers(articles, vec![chat.clone()]));

    let original = pipeline
        .process_article(URL, SummaryStyle::Balanced, "en")
        .await
        .unwrap();
    let translated = pipeline.retranslate(&original, "es").await;

    assert_eq!(
        translated.translation,
        "**Translation to Spanish:**\n\nHola\n\n*Original language: English | Confidence: High*"
    );
    assert_eq!(translated.with_translation(""), original);

    let prompts = chat.prompts.lock().unwrap();
    assert!(prompts.last().unwrap().starts_with("Translate the following text to Spanish."));
}

#[tokio::test]
async fn retranslate_without_summary_is_a_no_op() {
    let articles = StubArticles::new(vec![article()], plain_summary());
    let chat = well_behaved_chat();
    let pipeline = ArticlePipeline::new(providers(articles, vec![chat.clone()]));

    let empty = gist_common::ArticleResult {
        url: URL.into(),
        title: "T".into(),
        summary: String::new(),
        insights: String::new(),
        sentiment: String::new(),
        translation: "old".into(),
        timestamp: chrono::Utc::now(),
    };

    assert_eq!(pipeline.retranslate(&empty, "fr").await, empty);
    assert_eq!(chat.count(), 0);
}
