//! Embed text tool — reports the dimension of a text's embedding.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::provider::{EmbeddingProvider, EmbeddingRequest};
use parley_core::tool::{FieldKind, Tool, ToolResult, ToolSchema};
use std::sync::Arc;
use tracing::debug;

pub struct EmbedTextTool {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
}

impl EmbedTextTool {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn failed(&self, reason: impl Into<String>) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: self.name().to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Tool for EmbedTextTool {
    fn name(&self) -> &str {
        "embed_text"
    }

    fn description(&self) -> &str {
        "Create an embedding vector for the raw text and report its dimension."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new().required("raw_text", FieldKind::String, "The text to embed")
    }

    fn fallback(&self) -> Option<&str> {
        Some("unknown")
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw_text = arguments["raw_text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'raw_text' argument".into()))?;

        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![raw_text.to_string()],
            })
            .await
            .map_err(|e| self.failed(e.to_string()))?;

        let vector = response
            .embeddings
            .first()
            .ok_or_else(|| self.failed("provider returned no embeddings"))?;

        let dim = vector.len();
        debug!(provider = %self.provider.name(), model = %response.model, dim, "Embedded text");

        Ok(ToolResult::success(dim.to_string()).with_data(serde_json::json!({ "dim": dim })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::error::ProviderError;
    use parley_core::provider::EmbeddingResponse;
    use std::sync::Mutex;

    /// Returns vectors of a fixed size and records requested models.
    struct FixedProvider {
        dim: usize,
        models: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            self.models.lock().unwrap().push(request.model.clone());
            Ok(EmbeddingResponse {
                embeddings: request.inputs.iter().map(|_| vec![0.0; self.dim]).collect(),
                model: request.model,
                usage: None,
            })
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl EmbeddingProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            Ok(EmbeddingResponse {
                embeddings: vec![],
                model: request.model,
                usage: None,
            })
        }
    }

    struct DownProvider;

    #[async_trait]
    impl EmbeddingProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn reports_dimension_with_configured_model() {
        let provider = Arc::new(FixedProvider {
            dim: 3072,
            models: Mutex::new(vec![]),
        });
        let tool = EmbedTextTool::new(provider.clone(), "text-embedding-3-large");
        let result = tool
            .execute(serde_json::json!({"raw_text": "hello"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, "3072");
        assert_eq!(result.data.unwrap()["dim"], 3072);
        assert_eq!(*provider.models.lock().unwrap(), vec!["text-embedding-3-large"]);
    }

    #[tokio::test]
    async fn provider_failure_is_execution_error() {
        let tool = EmbedTextTool::new(Arc::new(DownProvider), "m");
        let err = tool
            .execute(serde_json::json!({"raw_text": "hello"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { ref reason, .. } if reason.contains("refused")));
    }

    #[tokio::test]
    async fn empty_embedding_list_is_execution_error() {
        let tool = EmbedTextTool::new(Arc::new(EmptyProvider), "m");
        let result = tool.execute(serde_json::json!({"raw_text": "hello"})).await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed { .. })));
    }
}
