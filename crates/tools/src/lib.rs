//! Built-in tool implementations for Parley.
//!
//! - `lookup_weather` — deterministic weather lookup
//! - `promptify_text` — turn a raw request into a structured prompt
//! - `embed_text` — report the embedding dimension of a text

pub mod embed_text;
pub mod promptify;
pub mod weather_lookup;

use parley_core::provider::EmbeddingProvider;
use parley_core::tool::ToolRegistry;
use std::sync::Arc;

pub use embed_text::EmbedTextTool;
pub use promptify::PromptifyTool;
pub use weather_lookup::{UNSUPPORTED_LOCATION, WeatherLookupTool};

/// Create a registry with all built-in tools.
pub fn default_registry(
    embeddings: Arc<dyn EmbeddingProvider>,
    embedding_model: impl Into<String>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WeatherLookupTool));
    registry.register(Box::new(PromptifyTool));
    registry.register(Box::new(EmbedTextTool::new(embeddings, embedding_model)));
    registry
}
