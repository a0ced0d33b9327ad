//! The article summarization pipeline.
//!
//! [`ArticlePipeline`] takes a pasted URL through sanitizing, extraction,
//! summary generation and optional enrichment, degrading instead of failing
//! wherever a fallback exists. [`build_pipeline`] wires it from
//! configuration.
//!
//! # Examples
//! ```no_run
//! use gist_common::SummaryStyle;
//! use gist_config::ProvidersConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = gist_pipeline::build_pipeline(&ProvidersConfig::default())?;
//! let result = pipeline
//!     .process_article("www.example.com/news/1", SummaryStyle::Brief, "en")
//!     .await?;
//! println!("{}: {}", result.title, result.summary);
//! # Ok(())
//! # }
//! ```
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod sanitizer;
pub mod summary;

pub use enrich::EnrichmentGenerator;
pub use error::{FailureReason, ProcessingFailed};
pub use pipeline::ArticlePipeline;
pub use summary::{SummaryGenerator, SummaryStrategy};

use gist_config::ProvidersConfig;
use gist_llm::traits::ProviderError;

pub fn build_pipeline(cfg: &ProvidersConfig) -> Result<ArticlePipeline, ProviderError> {
    Ok(ArticlePipeline::new(gist_llm::build_providers(cfg)?))
}
