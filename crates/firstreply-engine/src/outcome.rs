// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation outcomes: resolution time, resolution rate and satisfaction.
//!
//! A conversation opens with its first inbound message (or its first message
//! when the customer never wrote). It is resolved when any of its messages
//! carries a resolution timestamp; the latest one wins. The satisfaction score
//! is the last one given in time order.

use chrono::{DateTime, FixedOffset, TimeDelta};
use firstreply_core::{ConversationId, Direction, Message, OutcomeSummary};
use tracing::debug;

use crate::aggregate::{average_minutes, round_ratio};
use crate::pairer::group_conversations;

/// What happened to one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationOutcome {
    pub conversation_id: ConversationId,
    pub opened_at: DateTime<FixedOffset>,
    pub resolved_at: Option<DateTime<FixedOffset>>,
    pub satisfaction: Option<u8>,
}

impl ConversationOutcome {
    /// Time from opening to resolution, if resolved.
    pub fn resolution_elapsed(&self) -> Option<TimeDelta> {
        self.resolved_at.map(|resolved| resolved - self.opened_at)
    }
}

/// Derive one outcome per conversation, in conversation-id order.
pub fn conversation_outcomes(messages: &[Message]) -> Vec<ConversationOutcome> {
    group_conversations(messages)
        .into_iter()
        .filter_map(|(conversation_id, group)| {
            let opened = group
                .iter()
                .find(|m| m.direction == Direction::Inbound)
                .or_else(|| group.first())?;
            Some(ConversationOutcome {
                conversation_id: conversation_id.clone(),
                opened_at: opened.timestamp,
                resolved_at: group.iter().filter_map(|m| m.resolved_at).max(),
                satisfaction: group.iter().rev().find_map(|m| m.satisfaction),
            })
        })
        .collect()
}

/// Folds conversation outcomes into the outcome KPIs.
///
/// Like [`AgentAggregator`](crate::AgentAggregator), partial aggregates over
/// disjoint conversations merge into the single-pass result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeAggregator {
    conversations: u64,
    resolved: u64,
    timed_resolutions: u64,
    resolution_ms: i128,
    rated: u64,
    satisfaction_total: u64,
    negative_resolution: u64,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, outcome: &ConversationOutcome) {
        self.conversations += 1;

        if let Some(elapsed) = outcome.resolution_elapsed() {
            self.resolved += 1;
            if elapsed < TimeDelta::zero() {
                debug!(
                    conversation = %outcome.conversation_id,
                    opened_at = %outcome.opened_at,
                    elapsed_secs = elapsed.num_seconds(),
                    "resolved before opening, excluding resolution time"
                );
                self.negative_resolution += 1;
            } else {
                self.timed_resolutions += 1;
                self.resolution_ms += i128::from(elapsed.num_milliseconds());
            }
        }

        if let Some(score) = outcome.satisfaction {
            self.rated += 1;
            self.satisfaction_total += u64::from(score);
        }
    }

    pub fn merge(&mut self, other: OutcomeAggregator) {
        self.conversations += other.conversations;
        self.resolved += other.resolved;
        self.timed_resolutions += other.timed_resolutions;
        self.resolution_ms += other.resolution_ms;
        self.rated += other.rated;
        self.satisfaction_total += other.satisfaction_total;
        self.negative_resolution += other.negative_resolution;
    }

    /// Conversations whose resolution came before their opening message.
    pub fn negative_resolution(&self) -> u64 {
        self.negative_resolution
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            conversations: self.conversations,
            resolved: self.resolved,
            resolution_rate: (self.conversations > 0).then(|| {
                round_ratio(
                    i128::from(self.resolved) * 100,
                    i128::from(self.conversations),
                )
            }),
            avg_resolution_minutes: (self.timed_resolutions > 0)
                .then(|| average_minutes(self.resolution_ms, self.timed_resolutions)),
            rated: self.rated,
            avg_satisfaction: (self.rated > 0).then(|| {
                round_ratio(
                    i128::from(self.satisfaction_total),
                    i128::from(self.rated),
                )
            }),
        }
    }
}

impl<'a> FromIterator<&'a ConversationOutcome> for OutcomeAggregator {
    fn from_iter<I: IntoIterator<Item = &'a ConversationOutcome>>(iter: I) -> Self {
        let mut aggregator = OutcomeAggregator::new();
        for outcome in iter {
            aggregator.fold(outcome);
        }
        aggregator
    }
}
