//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley turn handler.
//! This crate has **no framework dependencies** — it defines the contracts
//! that the tools, providers, and the turn orchestrator implement against.
//!
//! ## Collaborators
//!
//! The orchestrator only ever talks to three seams, all defined here:
//! - [`Tool`] / [`ToolRegistry`] — named capabilities with typed schemas
//! - [`EmbeddingProvider`] — the external embedding service
//! - [`OutputSink`] — where outbound messages are delivered, in order

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod sink;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, SinkError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Ack, OutboundMessage};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use sink::OutputSink;
pub use tool::{FieldKind, SchemaField, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
