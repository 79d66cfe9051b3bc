//! Embedding provider implementations for Parley.
//!
//! All providers implement the `parley_core::EmbeddingProvider` trait.
//! [`build_from_config`] selects the right one for the loaded configuration.

pub mod openai_compat;

use async_trait::async_trait;
use parley_core::provider::EmbeddingProvider;
use std::sync::Arc;
use tracing::info;

pub use openai_compat::OpenAiCompatProvider;

/// Stand-in used when no API key is configured.
///
/// Every `embed` call fails with `NotConfigured`, so the embedding tool
/// degrades to its fallback without touching the network.
pub struct DisabledProvider;

#[async_trait]
impl EmbeddingProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }
}

/// Build the embedding provider described by the configuration.
pub fn build_from_config(config: &parley_config::AppConfig) -> Arc<dyn EmbeddingProvider> {
    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            info!(
                provider = %config.embedding.provider,
                url = %config.embedding.api_url,
                "Embedding provider configured"
            );
            Arc::new(OpenAiCompatProvider::new(
                config.embedding.provider.clone(),
                config.embedding.api_url.clone(),
                key,
            ))
        }
        None => {
            info!("No API key configured, embeddings disabled");
            Arc::new(DisabledProvider)
        }
    }
}
