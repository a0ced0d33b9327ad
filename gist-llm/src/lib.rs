//! Provider integrations for Gist.
//!
//! This crate exposes the [`traits::ArticleApi`] and [`traits::ChatClient`]
//! seams, concrete clients for the RapidAPI-hosted extractor/summarizer and
//! chat-completion services and for the OpenAI Responses API, and the
//! [`normalize`] helpers that turn their loosely shaped JSON into strings.
//!
//! [`build_providers`] wires clients from a [`gist_config::ProvidersConfig`].
//!
//! # Examples
//! ```no_run
//! use gist_config::ProvidersConfig;
//! use gist_llm::build_providers;
//!
//! let providers = build_providers(&ProvidersConfig::default()).unwrap();
//! // Without a RapidAPI key no chat client is configured.
//! assert!(providers.chat.is_empty());
//! ```
pub mod normalize;
pub mod openai;
pub mod rapidapi;
pub mod traits;

use gist_config::ProvidersConfig;
use openai::OpenAiClient;
use rapidapi::{RapidApiClient, RapidApiEndpoint};
use std::sync::Arc;
use std::time::Duration;
use traits::{ArticleApi, ChatClient, ProviderError};

/// The provider set a pipeline runs against.
#[derive(Clone)]
pub struct Providers {
    /// Extraction and the credential-independent summarizer.
    pub articles: Arc<dyn ArticleApi>,
    /// Chat-completion clients in preference order. Empty when the primary
    /// credential is missing.
    pub chat: Vec<Arc<dyn ChatClient>>,
}

/// Build clients from configuration.
///
/// The secondary OpenAI client is only added behind the primary chat client,
/// so it is never consulted when no primary credential is configured.
pub fn build_providers(cfg: &ProvidersConfig) -> Result<Providers, ProviderError> {
    let timeout = Duration::from_secs(cfg.timeout_secs.max(1));
    let endpoint = |e: &gist_config::EndpointConfig| RapidApiEndpoint {
        base_url: e.base_url.clone(),
        host: e.host(),
    };

    let rapid = Arc::new(RapidApiClient::new(
        cfg.rapidapi_key(),
        &endpoint(&cfg.article_api),
        &endpoint(&cfg.chat_api),
        timeout,
    )?);

    let mut chat: Vec<Arc<dyn ChatClient>> = Vec::new();
    if rapid.has_credential() {
        chat.push(rapid.clone());
        if let Some(openai) = cfg.openai() {
            let client = OpenAiClient::new(
                openai.api_key.trim().to_string(),
                openai.model.clone(),
                &openai.endpoint,
                timeout,
            )?;
            tracing::info!(model = %client.model_name(), "providers.secondary.enabled");
            chat.push(Arc::new(client));
        }
    } else {
        tracing::info!("providers.no_credential: chat completion and enrichment disabled");
    }

    Ok(Providers {
        articles: rapid,
        chat,
    })
}
