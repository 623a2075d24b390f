// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loosely-typed message records at the input boundary.
//!
//! Readers produce [`MessageRecord`]s with every field optional. Validation
//! turns each one into a [`Message`] or a [`MalformedRecord`] reason; malformed
//! records are skipped and counted by the caller, never defaulted.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::types::{
    AgentId, ConversationId, Direction, Message, MessageId, NaiveTimestampPolicy,
};

/// Formats accepted for timestamps without a UTC offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Accepted satisfaction scores.
const SATISFACTION_SCALE: std::ops::RangeInclusive<u8> = 1..=5;

/// A message record as supplied by a reader, before validation.
///
/// Unknown fields are ignored so that exports carrying extra columns can be
/// fed in directly. Identifier fields and the satisfaction score accept JSON
/// strings or numbers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub satisfaction: Option<String>,
}

/// Why a record could not become a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unrecognized direction `{0}`")]
    InvalidDirection(String),

    #[error("unparseable timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("timestamp `{0}` has no UTC offset")]
    NaiveTimestamp(String),

    #[error("satisfaction score `{0}` is not an integer from 1 to 5")]
    InvalidSatisfaction(String),
}

/// How timestamps are interpreted during validation.
#[derive(Debug, Clone, Copy)]
pub struct TimestampPolicy {
    /// Zone used for timestamps that carry no offset.
    pub timezone: Tz,
    pub naive: NaiveTimestampPolicy,
}

impl Default for TimestampPolicy {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            naive: NaiveTimestampPolicy::Local,
        }
    }
}

impl MessageRecord {
    /// Validate this record into a [`Message`].
    ///
    /// `position` is the record's index in the input and is used to synthesize
    /// an id when the record has none.
    pub fn validate(
        self,
        position: usize,
        policy: &TimestampPolicy,
    ) -> Result<Message, MalformedRecord> {
        let conversation_id =
            non_empty(self.conversation_id).ok_or(MalformedRecord::MissingField("conversation_id"))?;
        let direction_raw =
            non_empty(self.direction).ok_or(MalformedRecord::MissingField("direction"))?;
        let timestamp_raw =
            non_empty(self.timestamp).ok_or(MalformedRecord::MissingField("timestamp"))?;

        let direction: Direction = direction_raw
            .parse()
            .map_err(|_| MalformedRecord::InvalidDirection(direction_raw.clone()))?;
        let timestamp = parse_timestamp(&timestamp_raw, policy)?;
        let resolved_at = non_empty(self.resolved_at)
            .map(|raw| parse_timestamp(&raw, policy))
            .transpose()?;
        let satisfaction = non_empty(self.satisfaction)
            .map(|raw| parse_satisfaction(&raw))
            .transpose()?;

        Ok(Message {
            id: MessageId(non_empty(self.id).unwrap_or_else(|| format!("#{position}"))),
            conversation_id: ConversationId(conversation_id),
            direction,
            agent_id: non_empty(self.agent_id).map(AgentId),
            timestamp,
            resolved_at,
            satisfaction,
        })
    }
}

/// Parse an RFC 3339 timestamp, falling back to offset-less formats per policy.
pub fn parse_timestamp(
    raw: &str,
    policy: &TimestampPolicy,
) -> Result<DateTime<FixedOffset>, MalformedRecord> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| MalformedRecord::InvalidTimestamp(raw.to_string()))?;

    match policy.naive {
        NaiveTimestampPolicy::Reject => Err(MalformedRecord::NaiveTimestamp(raw.to_string())),
        NaiveTimestampPolicy::Local => policy
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|ts| ts.fixed_offset())
            // Wall-clock times skipped by a DST transition do not exist.
            .ok_or_else(|| MalformedRecord::InvalidTimestamp(raw.to_string())),
    }
}

fn parse_satisfaction(raw: &str) -> Result<u8, MalformedRecord> {
    raw.parse::<u8>()
        .ok()
        .filter(|score| SATISFACTION_SCALE.contains(score))
        .ok_or_else(|| MalformedRecord::InvalidSatisfaction(raw.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accept a string or a number and keep its textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}
