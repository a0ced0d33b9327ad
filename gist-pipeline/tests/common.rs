#![allow(dead_code)]

use async_trait::async_trait;
use gist_common::observability::{LogConfig, LogFormat};
use gist_llm::Providers;
use gist_llm::traits::{ArticleApi, ChatClient, ExtractionPayload, ProviderError, SummaryPayload};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use url::Url;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "gist-pipeline-tests",
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "debug".to_string(),
            log_dir: Some(std::env::temp_dir().join("gist-tests")),
        };
        gist_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Article API stub. Extraction answers are consumed in order; the last one
/// repeats.
pub struct StubArticles {
    extract: Mutex<Vec<Result<Value, ProviderError>>>,
    summarize: Result<Value, ProviderError>,
    pub extract_calls: AtomicUsize,
    pub summarize_calls: AtomicUsize,
    pub summarize_langs: Mutex<Vec<String>>,
}

impl StubArticles {
    pub fn new(
        extract: Vec<Result<Value, ProviderError>>,
        summarize: Result<Value, ProviderError>,
    ) -> Arc<Self> {
        assert!(!extract.is_empty());
        Arc::new(Self {
            extract: Mutex::new(extract),
            summarize,
            extract_calls: AtomicUsize::new(0),
            summarize_calls: AtomicUsize::new(0),
            summarize_langs: Mutex::new(Vec::new()),
        })
    }

    pub fn extracts(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn summarizes(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleApi for StubArticles {
    async fn extract(&self, _url: &Url) -> Result<ExtractionPayload, ProviderError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.extract.lock().unwrap();
        if queue.len() > 1 {
            queue.remove(0)
        } else {
            queue[0].clone()
        }
    }

    async fn summarize_text(
        &self,
        _text: &str,
        lang: &str,
    ) -> Result<SummaryPayload, ProviderError> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        self.summarize_langs.lock().unwrap().push(lang.to_string());
        self.summarize.clone()
    }
}

type Responder = Box<dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync>;

/// Chat stub answering through a closure over the prompt.
pub struct StubChat {
    name: &'static str,
    respond: Responder,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl StubChat {
    pub fn new(
        name: &'static str,
        respond: impl Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::new(name, |_| Err(ProviderError::Http { status: 500 }))
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for StubChat {
    async fn chat_complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }

    fn provider_name(&self) -> &str {
        self.name
    }
}

/// A chat stub that answers each kind of prompt with well-formed JSON.
pub fn well_behaved_chat() -> Arc<StubChat> {
    StubChat::new("stub-chat", |prompt| {
        let answer = if prompt.contains("key insights") {
            r#"{"insights": ["First", "Second", "Third"]}"#
        } else if prompt.contains("sentiment of the following") {
            r#"```json
{"sentiment": "Positive", "confidence": "High", "explanation": "Upbeat.", "key_emotions": ["joy", "hope"]}
```"#
        } else if prompt.starts_with("Translate") {
            r#"{"original_language": "English", "target_language": "Spanish", "translation": "Hola", "confidence": "High"}"#
        } else {
            "Chat summary."
        };
        Ok(answer.to_string())
    })
}

pub fn providers(articles: Arc<StubArticles>, chat: Vec<Arc<StubChat>>) -> Providers {
    Providers {
        articles,
        chat: chat
            .into_iter()
            .map(|c| c as Arc<dyn ChatClient>)
            .collect(),
    }
}
