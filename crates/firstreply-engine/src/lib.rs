// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response-time measurement engine for firstreply.
//!
//! This crate provides:
//! - **Pairer**: inbound -> outbound adjacencies per conversation
//! - **Business hours**: the configurable daily support window
//! - **Latency calculator**: discounts waiting time before the window opens
//! - **Aggregator**: mergeable per-agent count/mean/min/max
//! - **Outcomes**: resolution time, resolution rate and satisfaction per conversation
//! - **Report**: the full pipeline from boundary records to a summary table

pub mod aggregate;
pub mod hours;
pub mod latency;
pub mod outcome;
pub mod pairer;
pub mod report;

pub use aggregate::AgentAggregator;
pub use hours::BusinessHours;
pub use latency::LatencyCalculator;
pub use outcome::{conversation_outcomes, ConversationOutcome, OutcomeAggregator};
pub use pairer::pair_messages;
pub use report::{analyze, analyze_messages, EngineOptions, Report};
