use crate::normalize::NO_RESPONSE;
use crate::traits::{ChatClient, ProviderError};
use async_trait::async_trait;
use gist_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const INSTRUCTIONS: &str =
    "You are a careful assistant that summarizes and analyzes news articles.";

/// Secondary completion provider backed by the OpenAI Responses API.
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
pub struct ResponsesApiRequest {
    model: String,
    input: String,
    instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponsesApiResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub output: Vec<ResponseMessage>,
}

/// One element in the `output` array
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ResponseContent>,
}

/// One part of the message `content`
#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl ResponsesApiResponse {
    /// First non-empty `output_text` part.
    pub fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .flat_map(|msg| &msg.content)
            .find(|c| c.kind == "output_text" && !c.text.trim().is_empty())
            .map(|c| c.text.as_str())
    }
}

impl OpenAiClient {
    /// Create a new client for the given API key, model, and endpoint.
    pub fn new(
        api_key: String,
        model: String,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = HttpClient::new(endpoint)
            .map_err(|e| ProviderError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(timeout);

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn chat_complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let req = ResponsesApiRequest {
            model: self.model.clone(),
            input: prompt.to_string(),
            instructions: INSTRUCTIONS.to_string(),
        };

        let resp: ResponsesApiResponse = self
            .client
            .post_json("responses", Some(&self.api_key), &req)
            .await
            .map_err(http_to_provider)?;

        tracing::debug!(
            target: "provider.openai",
            id = %resp.id,
            model = %resp.model,
            status = ?resp.status,
            "openai.responses.ok"
        );

        Ok(resp
            .output_text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

fn http_to_provider(e: HttpError) -> ProviderError {
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
