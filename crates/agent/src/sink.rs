//! Channel-backed output sink with delivery acknowledgements.
//!
//! [`ChannelSink::emit`] queues a [`Delivery`] and resolves only after the
//! consumer on the other end calls [`Delivery::ack`]. A consumer that shows
//! messages incrementally therefore controls exactly when the turn may
//! continue.

use async_trait::async_trait;
use parley_core::error::SinkError;
use parley_core::message::{Ack, OutboundMessage};
use parley_core::sink::OutputSink;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::trace;

/// A message waiting to be confirmed by the consumer.
#[derive(Debug)]
pub struct Delivery {
    pub message: OutboundMessage,
    pub sequence: u64,
    ack: oneshot::Sender<Ack>,
}

impl Delivery {
    /// Confirm delivery, releasing the emitter.
    pub fn ack(self) {
        let _ = self.ack.send(Ack {
            sequence: self.sequence,
        });
    }
}

/// An [`OutputSink`] that hands messages to a consumer over a channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Delivery>,
    // Held across the send so sequence order matches queue order.
    next_sequence: Mutex<u64>,
}

impl ChannelSink {
    /// Create a sink and the receiver its consumer reads from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                next_sequence: Mutex::new(0),
            },
            rx,
        )
    }
}

#[async_trait]
impl OutputSink for ChannelSink {
    async fn emit(&self, message: OutboundMessage) -> Result<Ack, SinkError> {
        let (ack_tx, ack_rx) = oneshot::channel();

        {
            let mut next = self.next_sequence.lock().await;
            let delivery = Delivery {
                message,
                sequence: *next,
                ack: ack_tx,
            };
            self.tx.send(delivery).await.map_err(|_| SinkError::Closed)?;
            trace!(sequence = *next, "Message queued");
            *next += 1;
        }

        ack_rx
            .await
            .map_err(|_| SinkError::DeliveryFailed("consumer dropped the message without acknowledging".into()))
    }
}
