//! The turn orchestrator.
//!
//! One call to [`TurnHandler::handle`] runs one turn through the state
//! machine:
//!
//! ```text
//! Start → Classified ─┬→ DirectReply ──────────────────────────────┐
//!                     ├→ Refused ──────────────────────────────────┤→ End
//!                     └→ Acknowledged → ToolsRunning → Summarized ─┘
//! ```
//!
//! Tool failures never escape a turn: every branch has a terminal message
//! regardless of tool outcomes. The only error a turn can return is a
//! failure of the output sink itself.

use chrono::Utc;
use parley_core::error::SinkError;
use parley_core::event::{DomainEvent, EventBus};
use parley_core::message::OutboundMessage;
use parley_core::sink::OutputSink;
use parley_core::tool::{ToolCall, ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::classifier::{Intent, classify};

/// Non-terminal acknowledgement sent before any tool work.
pub const ACKNOWLEDGEMENT: &str = "Okay.";
pub const WEATHER_APOLOGY: &str =
    "Sorry — I can't get weather for that location. Want to try another city?";
pub const BIRTHPLACE_REFUSAL: &str =
    "I don't have access to your personal information, so I don't know your birthplace.";
pub const HARM_REFUSAL: &str =
    "I can't help with hacking or anything harmful. I can share security best practices if you like.";
pub const PROMPT_FALLBACK: &str = "Unable to generate a cleaned prompt at the moment.";
pub const DIMENSION_FALLBACK: &str = "unknown";

const WEATHER_TOOL: &str = "lookup_weather";
const PROMPTIFY_TOOL: &str = "promptify_text";
const EMBED_TOOL: &str = "embed_text";

/// States a turn passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Start,
    Classified,
    DirectReply,
    Refused,
    Acknowledged,
    ToolsRunning,
    Summarized,
    End,
}

/// One step of a turn's transcript, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A message the sink acknowledged
    Message {
        content: String,
        terminal: bool,
        sequence: u64,
    },

    /// A tool invocation is about to start
    ToolCall {
        call_id: String,
        name: String,
        arguments: serde_json::Value,
    },

    /// A tool invocation finished (possibly with a fallback)
    ToolResult {
        call_id: String,
        name: String,
        success: bool,
        output: String,
    },
}

/// Everything that happened during one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn_id: String,
    pub intent: Intent,
    pub states: Vec<TurnState>,
    pub events: Vec<TurnEvent>,
}

impl TurnOutcome {
    fn new(turn_id: String) -> Self {
        Self {
            turn_id,
            intent: Intent::Generic,
            states: vec![TurnState::Start],
            events: Vec::new(),
        }
    }

    fn enter(&mut self, state: TurnState) {
        debug!(turn_id = %self.turn_id, ?state, "Turn state");
        self.states.push(state);
    }

    /// Emitted messages in delivery order.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TurnEvent::Message { content, terminal, .. } => Some(OutboundMessage {
                    content: content.clone(),
                    terminal: *terminal,
                }),
                _ => None,
            })
            .collect()
    }

    /// The final message of the turn.
    pub fn terminal_message(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            TurnEvent::Message { content, terminal: true, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Names of the tools invoked, in order.
    pub fn tool_calls(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TurnEvent::ToolCall { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of tool invocations that did not succeed.
    pub fn tool_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TurnEvent::ToolResult { success: false, .. }))
            .count()
    }
}

/// Handles one utterance at a time.
pub struct TurnHandler {
    tools: Arc<ToolRegistry>,
    sink: Arc<dyn OutputSink>,
    event_bus: Arc<EventBus>,
}

impl TurnHandler {
    pub fn new(tools: Arc<ToolRegistry>, sink: Arc<dyn OutputSink>, event_bus: Arc<EventBus>) -> Self {
        Self {
            tools,
            sink,
            event_bus,
        }
    }

    /// Run one turn to completion.
    pub async fn handle(&self, utterance: &str) -> Result<TurnOutcome, SinkError> {
        let text = utterance.trim();
        let mut turn = TurnOutcome::new(uuid::Uuid::new_v4().to_string());

        self.event_bus.publish(DomainEvent::TurnStarted {
            turn_id: turn.turn_id.clone(),
            content_preview: text.chars().take(80).collect(),
            timestamp: Utc::now(),
        });

        turn.intent = classify(text);
        turn.enter(TurnState::Classified);
        info!(turn_id = %turn.turn_id, intent = turn.intent.label(), "Utterance classified");
        self.event_bus.publish(DomainEvent::IntentClassified {
            turn_id: turn.turn_id.clone(),
            intent: turn.intent.label().to_string(),
            timestamp: Utc::now(),
        });

        match turn.intent.clone() {
            Intent::Weather { location } => {
                self.weather_reply(&mut turn, location.unwrap_or_default()).await?
            }
            Intent::PersonalDataRefusal => self.refuse(&mut turn, BIRTHPLACE_REFUSAL).await?,
            Intent::HarmRefusal => self.refuse(&mut turn, HARM_REFUSAL).await?,
            Intent::Generic => self.tool_pipeline(&mut turn, text).await?,
        }

        turn.enter(TurnState::End);
        self.event_bus.publish(DomainEvent::TurnCompleted {
            turn_id: turn.turn_id.clone(),
            messages: turn.messages().len(),
            tool_calls: turn.tool_calls().len(),
            timestamp: Utc::now(),
        });

        Ok(turn)
    }

    async fn weather_reply(&self, turn: &mut TurnOutcome, location: String) -> Result<(), SinkError> {
        turn.enter(TurnState::DirectReply);

        let result = self
            .call_tool(turn, WEATHER_TOOL, serde_json::json!({ "location": location }))
            .await;

        let reply = if result.success {
            let place = if location.is_empty() {
                "the requested location"
            } else {
                location.as_str()
            };
            format!("The weather in {place} is {}", result.output)
        } else {
            WEATHER_APOLOGY.to_string()
        };

        self.say(turn, OutboundMessage::terminal(reply)).await
    }

    async fn refuse(&self, turn: &mut TurnOutcome, refusal: &str) -> Result<(), SinkError> {
        turn.enter(TurnState::Refused);
        self.say(turn, OutboundMessage::terminal(refusal)).await
    }

    async fn tool_pipeline(&self, turn: &mut TurnOutcome, text: &str) -> Result<(), SinkError> {
        // The acknowledgement must be delivered before any tool starts.
        self.say(turn, OutboundMessage::interim(ACKNOWLEDGEMENT)).await?;
        turn.enter(TurnState::Acknowledged);

        turn.enter(TurnState::ToolsRunning);
        let prompt = self
            .call_tool(turn, PROMPTIFY_TOOL, serde_json::json!({ "raw_text": text }))
            .await;
        let prompt = if prompt.success {
            prompt.output
        } else {
            PROMPT_FALLBACK.to_string()
        };

        let embedding = self
            .call_tool(turn, EMBED_TOOL, serde_json::json!({ "raw_text": text }))
            .await;
        let dim = embedding
            .success
            .then(|| embedding.data.as_ref().and_then(|d| d.get("dim")).cloned())
            .flatten()
            .map(|dim| match dim {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| DIMENSION_FALLBACK.to_string());

        turn.enter(TurnState::Summarized);
        let summary = format!("Clean prompt: {prompt}\nEmbedding dimension: {dim}");
        self.say(turn, OutboundMessage::terminal(summary)).await
    }

    /// Hand a message to the sink and wait for its acknowledgement.
    async fn say(&self, turn: &mut TurnOutcome, message: OutboundMessage) -> Result<(), SinkError> {
        let terminal = message.terminal;
        let content = message.content.clone();

        let ack = self.sink.emit(message).await.inspect_err(|e| {
            warn!(turn_id = %turn.turn_id, error = %e, "Output sink failed");
        })?;

        debug!(turn_id = %turn.turn_id, sequence = ack.sequence, terminal, "Message delivered");
        self.event_bus.publish(DomainEvent::MessageEmitted {
            turn_id: turn.turn_id.clone(),
            sequence: ack.sequence,
            terminal,
            timestamp: Utc::now(),
        });
        turn.events.push(TurnEvent::Message {
            content,
            terminal,
            sequence: ack.sequence,
        });
        Ok(())
    }

    /// Invoke a tool once. Errors are folded into a failure result.
    async fn call_tool(&self, turn: &mut TurnOutcome, name: &str, arguments: serde_json::Value) -> ToolResult {
        let call = ToolCall::new(name, arguments);
        turn.events.push(TurnEvent::ToolCall {
            call_id: call.id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        });

        let started = Instant::now();
        let result = self.tools.execute_or_fallback(&call).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        debug!(
            turn_id = %turn.turn_id,
            tool = name,
            success = result.success,
            duration_ms,
            "Tool finished"
        );
        self.event_bus.publish(DomainEvent::ToolExecuted {
            turn_id: turn.turn_id.clone(),
            tool_name: name.to_string(),
            success: result.success,
            duration_ms,
            timestamp: Utc::now(),
        });
        turn.events.push(TurnEvent::ToolResult {
            call_id: call.id.clone(),
            name: name.to_string(),
            success: result.success,
            output: result.output.clone(),
        });

        result
    }
}
