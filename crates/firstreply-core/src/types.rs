// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the firstreply crates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

/// Identifier grouping messages into one conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

/// Identifier of the agent who sent an outbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who originated a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the customer.
    Inbound,
    /// Sent by a support agent.
    Outbound,
}

/// A validated message. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub direction: Direction,
    /// Set only on outbound messages; `None` on an outbound reply is a data-quality problem.
    pub agent_id: Option<AgentId>,
    pub timestamp: DateTime<FixedOffset>,
    /// When the customer's issue was marked resolved, if the export says so.
    pub resolved_at: Option<DateTime<FixedOffset>>,
    /// Customer satisfaction score on a 1 to 5 scale.
    pub satisfaction: Option<u8>,
}

/// An inbound message followed immediately by an outbound reply.
///
/// Derived by the pairer, completed by the latency calculator, then folded
/// into aggregates. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePair {
    pub conversation_id: ConversationId,
    pub agent_id: Option<AgentId>,
    pub inbound_at: DateTime<FixedOffset>,
    pub outbound_at: DateTime<FixedOffset>,
    /// Wall-clock time between the inbound message and the reply.
    pub raw_elapsed: TimeDelta,
    /// Business-hours adjusted latency. `None` when the pair is excluded.
    pub adjusted_elapsed: Option<TimeDelta>,
}

impl ResponsePair {
    pub fn raw_elapsed_seconds(&self) -> f64 {
        delta_seconds(self.raw_elapsed)
    }

    pub fn adjusted_elapsed_seconds(&self) -> Option<f64> {
        self.adjusted_elapsed.map(delta_seconds)
    }
}

/// Seconds in a `TimeDelta`, with millisecond precision.
pub fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Per-agent response-time statistics, in minutes rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent_id: AgentId,
    pub total_responses: u64,
    pub avg_minutes: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
}

/// Response-time statistics across every measured reply, attributed or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_responses: u64,
    pub avg_minutes: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
}

/// Conversation-level outcome KPIs: resolution and satisfaction.
///
/// Rates are percentages and every figure is rounded to two decimals, ties to
/// even. Averages are `None` when nothing qualified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Conversations opened inside the reporting window.
    pub conversations: u64,
    /// Conversations carrying a resolution timestamp.
    pub resolved: u64,
    pub resolution_rate: Option<f64>,
    /// Mean time from the opening customer message to resolution.
    pub avg_resolution_minutes: Option<f64>,
    /// Conversations carrying a satisfaction score.
    pub rated: u64,
    pub avg_satisfaction: Option<f64>,
}

/// Side-channel counters for records and pairs that were excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    /// Input records skipped for a missing or uninterpretable required field.
    pub malformed_records: u64,
    /// Outbound replies with no agent.
    pub unattributed_replies: u64,
    /// Pairs whose adjusted latency came out negative.
    pub negative_elapsed: u64,
    /// Conversations resolved before they were opened.
    #[serde(default)]
    pub negative_resolution: u64,
}

impl AnomalyCounts {
    pub fn total(&self) -> u64 {
        self.malformed_records
            + self.unattributed_replies
            + self.negative_elapsed
            + self.negative_resolution
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &AnomalyCounts) {
        self.malformed_records += other.malformed_records;
        self.unattributed_replies += other.unattributed_replies;
        self.negative_elapsed += other.negative_elapsed;
        self.negative_resolution += other.negative_resolution;
    }
}

/// Trailing reporting window, measured back from "now".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Today,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeRange {
    /// How far back the window reaches. `None` means unbounded.
    pub fn lookback(&self) -> Option<TimeDelta> {
        match self {
            TimeRange::Today => Some(TimeDelta::days(1)),
            TimeRange::Week => Some(TimeDelta::days(7)),
            TimeRange::Month => Some(TimeDelta::days(30)),
            TimeRange::Year => Some(TimeDelta::days(365)),
            TimeRange::All => None,
        }
    }

    /// Earliest instant included in the window ending at `now`.
    pub fn cutoff(&self, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        self.lookback().map(|lookback| now - lookback)
    }
}

/// What to do with timestamps that carry no UTC offset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum NaiveTimestampPolicy {
    /// Interpret them as wall-clock time in the business-hours timezone.
    #[default]
    Local,
    /// Treat them as malformed.
    Reject,
}

/// Error returned when parsing a `HH:MM` clock string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid clock time `{0}`, expected HH:MM between 00:00 and 24:00")]
pub struct ParseClockTimeError(pub String);

/// A time of day with minute precision, from `00:00` up to and including `24:00`.
///
/// `24:00` exists so that a window can end at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { minutes: 0 };
    pub const END_OF_DAY: ClockTime = ClockTime { minutes: 24 * 60 };

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        let valid = minute < 60 && (hour < 24 || (hour == 24 && minute == 0));
        valid.then(|| ClockTime {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn is_end_of_day(&self) -> bool {
        *self == Self::END_OF_DAY
    }

    /// The matching `NaiveTime`, or `None` for `24:00`.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(err)?;
        if minute.len() != 2 {
            return Err(err());
        }
        let hour: u32 = hour.parse().map_err(|_| err())?;
        let minute: u32 = minute.parse().map_err(|_| err())?;
        ClockTime::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
