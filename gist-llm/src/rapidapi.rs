use crate::normalize::chat_text;
use crate::traits::{ArticleApi, ChatClient, ExtractionPayload, ProviderError, SummaryPayload};
use async_trait::async_trait;
use gist_http::{secret_header_value, Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";

/// One RapidAPI-hosted service: where it lives and the host header it expects.
#[derive(Debug, Clone)]
pub struct RapidApiEndpoint {
    pub base_url: String,
    pub host: String,
}

/// Client for the article extractor/summarizer and the chat-completion
/// services published through RapidAPI.
///
/// Every call is made exactly once; fallback decisions belong to the caller.
#[derive(Clone)]
pub struct RapidApiClient {
    article: HttpClient,
    article_host: HeaderValue,
    chat: HttpClient,
    chat_host: HeaderValue,
    api_key: Option<HeaderValue>,
}

impl std::fmt::Debug for RapidApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiClient")
            .field("article", self.article.base())
            .field("chat", self.chat.base())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
struct SummarizeTextRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 1],
    web_access: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl RapidApiClient {
    /// Create a client. `api_key` of `None` leaves chat completion disabled.
    pub fn new(
        api_key: Option<&str>,
        article: &RapidApiEndpoint,
        chat: &RapidApiEndpoint,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let build = |endpoint: &RapidApiEndpoint| {
            HttpClient::new(&endpoint.base_url)
                .map(|c| c.with_timeout(timeout))
                .map_err(|e| ProviderError::Config(format!("HttpClient init failed: {e}")))
        };
        let host = |endpoint: &RapidApiEndpoint| {
            HeaderValue::from_str(&endpoint.host)
                .map_err(|e| ProviderError::Config(format!("invalid host header: {e}")))
        };
        let api_key = api_key
            .map(secret_header_value)
            .transpose()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            article: build(article)?,
            article_host: host(article)?,
            chat: build(chat)?,
            chat_host: host(chat)?,
            api_key,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn opts<'a>(&self, host: &HeaderValue) -> RequestOpts<'a> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(HOST_HEADER), host.clone());
        let auth = match &self.api_key {
            Some(key) => Auth::Header {
                name: HeaderName::from_static(KEY_HEADER),
                value: key.clone(),
            },
            None => Auth::None,
        };
        RequestOpts {
            headers: Some(headers),
            auth: Some(auth),
            ..Default::default()
        }
    }
}

fn status_error(e: HttpError) -> ProviderError {
    match e {
        HttpError::Api { status, .. } => ProviderError::Http {
            status: status.as_u16(),
        },
        other => ProviderError::Transport(other.to_string()),
    }
}

fn message_error(e: HttpError) -> ProviderError {
    match e {
        HttpError::Api {
            status, message, ..
        } => ProviderError::Provider {
            status: status.as_u16(),
            message,
        },
        other => ProviderError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ArticleApi for RapidApiClient {
    async fn extract(&self, url: &Url) -> Result<ExtractionPayload, ProviderError> {
        let mut opts = self.opts(&self.article_host);
        opts.query = Some(vec![("url", url.as_str().into())]);

        let payload: Value = self
            .article
            .get_json("extract", opts)
            .await
            .map_err(status_error)?;
        tracing::debug!(target: "provider.rapidapi", %url, "rapidapi.extract.ok");
        Ok(payload)
    }

    async fn summarize_text(
        &self,
        text: &str,
        lang: &str,
    ) -> Result<SummaryPayload, ProviderError> {
        let body = SummarizeTextRequest { text, lang };
        let payload: Value = self
            .article
            .post_json_opts("summarize-text", &body, self.opts(&self.article_host))
            .await
            .map_err(status_error)?;
        tracing::debug!(
            target: "provider.rapidapi",
            text_len = text.len(),
            lang,
            "rapidapi.summarize_text.ok"
        );
        Ok(payload)
    }
}

#[async_trait]
impl ChatClient for RapidApiClient {
    async fn chat_complete(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_none() {
            return Err(ProviderError::MissingCredential);
        }
        let body = ChatRequest {
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            web_access: false,
        };
        let payload: Value = self
            .chat
            .post_json_opts("chatgpt", &body, self.opts(&self.chat_host))
            .await
            .map_err(message_error)?;
        let text = chat_text(&payload);
        tracing::debug!(
            target: "provider.rapidapi",
            prompt_len = prompt.len(),
            answer_len = text.len(),
            "rapidapi.chat.ok"
        );
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "rapidapi-chatgpt"
    }
}
