//! Shared test helpers for turn tests.

use async_trait::async_trait;
use parley_core::error::{ProviderError, SinkError, ToolError};
use parley_core::message::{Ack, OutboundMessage};
use parley_core::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use parley_core::sink::OutputSink;
use parley_core::tool::{FieldKind, Tool, ToolRegistry, ToolResult, ToolSchema};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One observable side effect, in global order.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Emitted { content: String, terminal: bool },
    ToolStarted(String),
}

/// An ordered log shared by sinks and tools in one test.
#[derive(Clone, Default)]
pub struct SharedLog(Arc<Mutex<Vec<LogEntry>>>);

impl SharedLog {
    pub fn push(&self, entry: LogEntry) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.0.lock().unwrap().clone()
    }

    pub fn tool_starts(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::ToolStarted(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

/// A sink that records every message into the shared log.
pub struct RecordingSink {
    log: SharedLog,
    next: AtomicU64,
}

impl RecordingSink {
    pub fn new(log: SharedLog) -> Self {
        Self {
            log,
            next: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl OutputSink for RecordingSink {
    async fn emit(&self, message: OutboundMessage) -> Result<Ack, SinkError> {
        self.log.push(LogEntry::Emitted {
            content: message.content,
            terminal: message.terminal,
        });
        Ok(Ack {
            sequence: self.next.fetch_add(1, Ordering::SeqCst),
        })
    }
}

/// A sink that can no longer deliver anything.
pub struct ClosedSink;

#[async_trait]
impl OutputSink for ClosedSink {
    async fn emit(&self, _message: OutboundMessage) -> Result<Ack, SinkError> {
        Err(SinkError::Closed)
    }
}

/// Per-tool invocation counters.
#[derive(Clone, Default)]
pub struct ToolCounts(Arc<Mutex<HashMap<String, usize>>>);

impl ToolCounts {
    pub fn get(&self, name: &str) -> usize {
        self.0.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn bump(&self, name: &str) {
        *self.0.lock().unwrap().entry(name.to_string()).or_default() += 1;
    }
}

/// A tool with a scripted outcome that logs when it starts.
pub struct ScriptedTool {
    name: String,
    outcome: Option<ToolResult>,
    log: SharedLog,
    counts: ToolCounts,
}

impl ScriptedTool {
    pub fn succeeding(name: &str, result: ToolResult, log: &SharedLog) -> Self {
        Self {
            name: name.into(),
            outcome: Some(result),
            log: log.clone(),
            counts: ToolCounts::default(),
        }
    }

    pub fn failing(name: &str, log: &SharedLog) -> Self {
        Self {
            name: name.into(),
            outcome: None,
            log: log.clone(),
            counts: ToolCounts::default(),
        }
    }

    fn counted(mut self, counts: &ToolCounts) -> Self {
        self.counts = counts.clone();
        self
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "scripted"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .optional("location", FieldKind::String, "")
            .optional("raw_text", FieldKind::String, "")
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        self.log.push(LogEntry::ToolStarted(self.name.clone()));
        self.counts.bump(&self.name);
        // Give the scheduler a chance to reorder anything not awaited.
        tokio::task::yield_now().await;
        self.outcome.clone().ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: self.name.clone(),
            reason: "scripted failure".into(),
        })
    }
}

/// Registry with scripted `promptify_text` and `embed_text` tools.
pub fn scripted_registry(log: &SharedLog, promptify_ok: bool, embed_ok: bool) -> (ToolRegistry, ToolCounts) {
    let counts = ToolCounts::default();
    let mut registry = ToolRegistry::new();

    let promptify = if promptify_ok {
        ScriptedTool::succeeding("promptify_text", ToolResult::success("scripted promptify_text"), log)
    } else {
        ScriptedTool::failing("promptify_text", log)
    };
    let embed = if embed_ok {
        ScriptedTool::succeeding(
            "embed_text",
            ToolResult::success("8").with_data(serde_json::json!({ "dim": 8 })),
            log,
        )
    } else {
        ScriptedTool::failing("embed_text", log)
    };

    registry.register(Box::new(promptify.counted(&counts)));
    registry.register(Box::new(embed.counted(&counts)));
    (registry, counts)
}

/// An embedding provider returning zero vectors of a fixed size.
pub struct FixedDimProvider(pub usize);

#[async_trait]
impl EmbeddingProvider for FixedDimProvider {
    fn name(&self) -> &str {
        "fixed_dim"
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|_| vec![0.0; self.0]).collect(),
            model: request.model,
            usage: None,
        })
    }
}

/// The built-in tools backed by a 3072-dimension provider.
pub fn stock_registry() -> ToolRegistry {
    parley_tools::default_registry(Arc::new(FixedDimProvider(3072)), "text-embedding-3-large")
}
