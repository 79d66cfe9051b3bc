//! Turn handling — the heart of Parley.
//!
//! For every user utterance the [`TurnHandler`]:
//!
//! 1. **Classifies** it (weather, personal-data refusal, harm refusal, generic)
//! 2. **Answers directly** (weather), **refuses**, or
//! 3. **Acknowledges** with a non-terminal "Okay.", waits for the sink to
//!    confirm delivery, then runs the tool pipeline
//! 4. **Replies** with exactly one terminal message
//!
//! Tool failures degrade to fallback text; they never end a turn early.

pub mod classifier;
pub mod sink;
pub mod turn;
pub mod usage;

#[cfg(test)]
mod test_helpers;

pub use classifier::{Intent, classify, extract_location};
pub use sink::{ChannelSink, Delivery};
pub use turn::{TurnEvent, TurnHandler, TurnOutcome, TurnState};
pub use usage::{UsageCollector, UsageSummary};
