// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation pairing.
//!
//! Messages are grouped by conversation and stable-sorted by timestamp, so
//! messages sharing a timestamp keep their input order. A pair is emitted for
//! every outbound message whose immediate predecessor is inbound: this measures
//! the first reply to a customer message, not every reply.

use std::collections::BTreeMap;

use firstreply_core::{ConversationId, Direction, Message, ResponsePair};
use tracing::trace;

/// Group messages by conversation, each group sorted by timestamp.
///
/// Groups are returned in conversation-id order.
pub fn group_conversations(messages: &[Message]) -> BTreeMap<&ConversationId, Vec<&Message>> {
    let mut groups: BTreeMap<&ConversationId, Vec<&Message>> = BTreeMap::new();
    for message in messages {
        groups
            .entry(&message.conversation_id)
            .or_default()
            .push(message);
    }
    for group in groups.values_mut() {
        // `sort_by_key` is stable, which keeps ties in input order.
        group.sort_by_key(|m| m.timestamp);
    }
    groups
}

/// Emit one [`ResponsePair`] per inbound -> outbound adjacency.
///
/// The adjusted latency is left unset; see [`crate::latency`].
pub fn pair_messages(messages: &[Message]) -> Vec<ResponsePair> {
    let mut pairs = Vec::new();

    for (conversation_id, group) in group_conversations(messages) {
        for window in group.windows(2) {
            let (previous, current) = (window[0], window[1]);
            if previous.direction != Direction::Inbound
                || current.direction != Direction::Outbound
            {
                continue;
            }

            trace!(
                conversation = %conversation_id,
                inbound = %previous.id.0,
                outbound = %current.id.0,
                "response pair"
            );
            pairs.push(ResponsePair {
                conversation_id: conversation_id.clone(),
                agent_id: current.agent_id.clone(),
                inbound_at: previous.timestamp,
                outbound_at: current.timestamp,
                raw_elapsed: current.timestamp - previous.timestamp,
                adjusted_elapsed: None,
            });
        }
    }

    pairs
}
