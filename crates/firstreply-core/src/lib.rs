// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for firstreply.
//!
//! This crate provides the message model, the boundary record type with its
//! validation rules, the derived response-time types, and the error type used
//! throughout the workspace.

pub mod error;
pub mod record;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FirstReplyError;
pub use record::{MalformedRecord, MessageRecord, TimestampPolicy};
pub use types::{
    AgentId, AgentSummary, AnomalyCounts, ClockTime, ConversationId, Direction, Message,
    MessageId, NaiveTimestampPolicy, OutcomeSummary, OverallSummary, ResponsePair, TimeRange,
};
