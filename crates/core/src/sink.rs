//! Output sink trait — where a turn's messages go.
//!
//! A sink may stream or display messages incrementally, so call order is
//! significant and must be preserved by every implementation.

use async_trait::async_trait;

use crate::error::SinkError;
use crate::message::{Ack, OutboundMessage};

/// The output collaborator of the turn orchestrator.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Deliver a message.
    ///
    /// Resolves only once the message has been handed over for delivery;
    /// the returned [`Ack`] carries its position in the sink's order.
    async fn emit(&self, message: OutboundMessage) -> Result<Ack, SinkError>;
}
