//! Outbound message types.

use serde::{Deserialize, Serialize};

/// A message the assistant says during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The text to deliver
    pub content: String,

    /// `false` means more messages for the same turn will follow
    pub terminal: bool,
}

impl OutboundMessage {
    /// The final message of a turn.
    pub fn terminal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            terminal: true,
        }
    }

    /// An intermediate message; more will follow.
    pub fn interim(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            terminal: false,
        }
    }
}

/// Delivery confirmation from an output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ack {
    /// Position of the message in the sink's delivery order
    pub sequence: u64,
}
