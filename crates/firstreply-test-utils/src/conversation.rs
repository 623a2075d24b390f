// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation fixtures.

use chrono::{DateTime, FixedOffset};
use firstreply_core::{
    AgentId, ConversationId, Direction, Message, MessageId, MessageRecord,
};

/// Parse an RFC 3339 timestamp, panicking on invalid fixtures.
pub fn at(ts: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ts)
        .unwrap_or_else(|e| panic!("invalid fixture timestamp `{ts}`: {e}"))
}

/// Builds the messages of a single conversation in the order they are added.
///
/// Message ids are `<conversation>-<n>` with `n` counting from 1.
pub struct ConversationBuilder {
    conversation_id: ConversationId,
    messages: Vec<Message>,
}

impl ConversationBuilder {
    pub fn new(conversation_id: &str) -> Self {
        Self {
            conversation_id: ConversationId(conversation_id.to_string()),
            messages: Vec::new(),
        }
    }

    /// Add a customer message.
    pub fn inbound(self, ts: &str) -> Self {
        self.push(Direction::Inbound, None, ts)
    }

    /// Add an agent reply.
    pub fn reply(self, agent: &str, ts: &str) -> Self {
        self.push(Direction::Outbound, Some(agent), ts)
    }

    /// Add an outbound message with no agent attached.
    pub fn unattributed_reply(self, ts: &str) -> Self {
        self.push(Direction::Outbound, None, ts)
    }

    /// Mark the most recent message with a resolution timestamp.
    pub fn resolved(mut self, ts: &str) -> Self {
        if let Some(last) = self.messages.last_mut() {
            last.resolved_at = Some(at(ts));
        }
        self
    }

    /// Attach a satisfaction score to the most recent message.
    pub fn rated(mut self, score: u8) -> Self {
        if let Some(last) = self.messages.last_mut() {
            last.satisfaction = Some(score);
        }
        self
    }

    pub fn build(self) -> Vec<Message> {
        self.messages
    }

    fn push(mut self, direction: Direction, agent: Option<&str>, ts: &str) -> Self {
        let n = self.messages.len() + 1;
        self.messages.push(Message {
            id: MessageId(format!("{}-{n}", self.conversation_id)),
            conversation_id: self.conversation_id.clone(),
            direction,
            agent_id: agent.map(|a| AgentId(a.to_string())),
            timestamp: at(ts),
            resolved_at: None,
            satisfaction: None,
        });
        self
    }
}

/// Convert messages back into boundary records, as a reader would produce them.
pub fn to_records(messages: &[Message]) -> Vec<MessageRecord> {
    messages
        .iter()
        .map(|m| MessageRecord {
            id: Some(m.id.0.clone()),
            conversation_id: Some(m.conversation_id.0.clone()),
            direction: Some(m.direction.to_string()),
            agent_id: m.agent_id.as_ref().map(|a| a.0.clone()),
            timestamp: Some(m.timestamp.to_rfc3339()),
            resolved_at: m.resolved_at.map(|ts| ts.to_rfc3339()),
            satisfaction: m.satisfaction.map(|score| score.to_string()),
        })
        .collect()
}

/// Render messages as a JSON export in the `{"data": [...]}` shape.
pub fn records_json(messages: &[Message]) -> String {
    let data: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "id": m.id.0,
                "conversation_id": m.conversation_id.0,
                "direction": m.direction.to_string(),
                "agent_id": m.agent_id.as_ref().map(|a| a.0.clone()),
                "timestamp": m.timestamp.to_rfc3339(),
                "resolved_at": m.resolved_at.map(|ts| ts.to_rfc3339()),
                "satisfaction": m.satisfaction,
            })
        })
        .collect();
    serde_json::json!({ "data": data }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_sequential_ids() {
        let messages = ConversationBuilder::new("c1")
            .inbound("2024-03-01T08:00:00Z")
            .reply("alice", "2024-03-01T10:00:00Z")
            .build();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, MessageId("c1-1".into()));
        assert_eq!(messages[1].id, MessageId("c1-2".into()));
        assert_eq!(messages[1].agent_id, Some(AgentId("alice".into())));
    }

    #[test]
    fn records_keep_every_field() {
        let messages = ConversationBuilder::new("c1")
            .unattributed_reply("2024-03-01T10:00:00Z")
            .build();
        let records = to_records(&messages);
        assert_eq!(records[0].direction.as_deref(), Some("outbound"));
        assert!(records[0].agent_id.is_none());
        assert!(records_json(&messages).starts_with("{\"data\":"));
    }

    #[test]
    fn outcome_markers_apply_to_last_message() {
        let messages = ConversationBuilder::new("c1")
            .inbound("2024-03-01T08:00:00Z")
            .reply("alice", "2024-03-01T10:00:00Z")
            .resolved("2024-03-01T11:00:00Z")
            .rated(5)
            .build();
        assert!(messages[0].resolved_at.is_none());
        assert_eq!(messages[1].resolved_at, Some(at("2024-03-01T11:00:00Z")));
        assert_eq!(messages[1].satisfaction, Some(5));

        let records = to_records(&messages);
        assert_eq!(records[1].satisfaction.as_deref(), Some("5"));
        assert!(records[0].resolved_at.is_none());
    }
}
