//! Embedding provider trait — the abstraction over embedding backends.
//!
//! The `embed_text` tool delegates to an `EmbeddingProvider`; nothing else in
//! a turn touches the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings (e.g., "text-embedding-3-large").
    pub model: String,

    /// The texts to embed.
    pub inputs: Vec<String>,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vectors, one per input text.
    pub embeddings: Vec<Vec<f32>>,

    /// Which model was used.
    pub model: String,

    /// Token usage.
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

/// The embedding provider trait.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation returns an error indicating embeddings aren't supported.
    async fn embed(
        &self,
        _request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl EmbeddingProvider for Bare {
        fn name(&self) -> &str {
            "bare"
        }
    }

    #[tokio::test]
    async fn default_embed_is_not_configured() {
        let err = Bare
            .embed(EmbeddingRequest {
                model: "m".into(),
                inputs: vec!["x".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(ref msg) if msg.contains("bare")));
    }

    #[test]
    fn embedding_request_serialization() {
        let req = EmbeddingRequest {
            model: "text-embedding-3-large".into(),
            inputs: vec!["hello".into()],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("text-embedding-3-large"));
    }
}
