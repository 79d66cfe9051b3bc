//! Domain event system — decoupled observation of turns.
//!
//! The orchestrator publishes an event at each step of a turn. Subscribers
//! (loggers, usage collectors, UIs) can react without coupling to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A new utterance was accepted
    TurnStarted {
        turn_id: String,
        content_preview: String,
        timestamp: DateTime<Utc>,
    },

    /// The classifier picked a branch
    IntentClassified {
        turn_id: String,
        intent: String,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        turn_id: String,
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A message was acknowledged by the output sink
    MessageEmitted {
        turn_id: String,
        sequence: u64,
        terminal: bool,
        timestamp: DateTime<Utc>,
    },

    /// The turn emitted its terminal message
    TurnCompleted {
        turn_id: String,
        messages: usize,
        tool_calls: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
