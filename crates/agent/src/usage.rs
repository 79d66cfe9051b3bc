//! Usage collection across turns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::turn::TurnOutcome;

/// Aggregate counters over every collected turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub turns: u64,
    pub by_intent: BTreeMap<String, u64>,
    pub tool_calls: u64,
    pub tool_failures: u64,
    pub messages: u64,
}

impl std::fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} turns, {} messages, {} tool calls ({} failed)",
            self.turns, self.messages, self.tool_calls, self.tool_failures
        )?;
        for (intent, count) in &self.by_intent {
            write!(f, ", {intent}={count}")?;
        }
        Ok(())
    }
}

/// Collects [`TurnOutcome`]s into a [`UsageSummary`].
#[derive(Debug, Default)]
pub struct UsageCollector {
    summary: UsageSummary,
}

impl UsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, outcome: &TurnOutcome) {
        let s = &mut self.summary;
        s.turns += 1;
        *s.by_intent.entry(outcome.intent.label().to_string()).or_default() += 1;
        s.tool_calls += outcome.tool_calls().len() as u64;
        s.tool_failures += outcome.tool_failures() as u64;
        s.messages += outcome.messages().len() as u64;
    }

    pub fn summary(&self) -> UsageSummary {
        self.summary.clone()
    }
}
