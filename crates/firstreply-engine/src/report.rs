// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end response-time report.
//!
//! `analyze` validates boundary records, pairs them per conversation, applies
//! the business-hours adjustment, restricts pairs to the reporting window and
//! aggregates per agent. Conversation outcomes are windowed by their opening
//! message. Every call is independent: nothing is cached between
//! invocations.

use chrono::{DateTime, FixedOffset};
use firstreply_config::FirstReplyConfig;
use firstreply_core::{
    AgentSummary, AnomalyCounts, FirstReplyError, Message, MessageRecord, OutcomeSummary,
    OverallSummary, TimeRange, TimestampPolicy,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::AgentAggregator;
use crate::hours::BusinessHours;
use crate::latency::LatencyCalculator;
use crate::outcome::{conversation_outcomes, OutcomeAggregator};
use crate::pairer::pair_messages;

/// Everything a report run depends on besides the records themselves.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub hours: BusinessHours,
    pub timestamps: TimestampPolicy,
    pub time_range: TimeRange,
    /// End of the reporting window.
    pub now: DateTime<FixedOffset>,
}

impl EngineOptions {
    /// Options with default business hours and an unbounded window.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        let hours = BusinessHours::default();
        Self {
            hours,
            timestamps: TimestampPolicy {
                timezone: hours.timezone(),
                ..TimestampPolicy::default()
            },
            time_range: TimeRange::All,
            now,
        }
    }

    pub fn from_config(
        config: &FirstReplyConfig,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, FirstReplyError> {
        let hours = BusinessHours::from_config(&config.business_hours)?;
        Ok(Self {
            hours,
            timestamps: TimestampPolicy {
                timezone: hours.timezone(),
                naive: config.report.naive_timestamps,
            },
            time_range: config.report.time_range,
            now,
        })
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }
}

/// The tabular result handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Per-agent statistics, fastest average first.
    pub agents: Vec<AgentSummary>,
    /// Statistics over every measured reply.
    pub overall: Option<OverallSummary>,
    /// Resolution and satisfaction KPIs per conversation.
    pub outcomes: OutcomeSummary,
    pub anomalies: AnomalyCounts,
    pub time_range: TimeRange,
    /// Records that validated into messages.
    pub messages: u64,
    /// Response pairs inside the reporting window.
    pub pairs: u64,
}

/// Validate records into messages, counting the ones that are malformed.
pub fn validate_records<I>(records: I, policy: &TimestampPolicy) -> (Vec<Message>, u64)
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut messages = Vec::new();
    let mut malformed = 0u64;

    for (position, record) in records.into_iter().enumerate() {
        match record.validate(position, policy) {
            Ok(message) => messages.push(message),
            Err(reason) => {
                debug!(position, %reason, "skipping malformed record");
                malformed += 1;
            }
        }
    }

    (messages, malformed)
}

/// Compute the report for a batch of boundary records.
pub fn analyze<I>(records: I, options: &EngineOptions) -> Report
where
    I: IntoIterator<Item = MessageRecord>,
{
    let (messages, malformed) = validate_records(records, &options.timestamps);
    let mut report = analyze_messages(&messages, options);
    report.anomalies.malformed_records += malformed;
    log_outcome(&report);
    report
}

/// Compute the report for already-validated messages.
pub fn analyze_messages(messages: &[Message], options: &EngineOptions) -> Report {
    let calculator = LatencyCalculator::new(options.hours);
    let cutoff = options.time_range.cutoff(options.now);

    let pairs: Vec<_> = pair_messages(messages)
        .into_iter()
        .filter(|pair| cutoff.is_none_or(|cutoff| pair.inbound_at >= cutoff))
        .map(|pair| calculator.resolve(pair))
        .collect();
    let aggregator: AgentAggregator = pairs.iter().collect();

    let outcomes: OutcomeAggregator = conversation_outcomes(messages)
        .iter()
        .filter(|outcome| cutoff.is_none_or(|cutoff| outcome.opened_at >= cutoff))
        .collect();
    let mut anomalies = aggregator.anomalies();
    anomalies.negative_resolution = outcomes.negative_resolution();

    Report {
        agents: aggregator.summaries(),
        overall: aggregator.overall(),
        outcomes: outcomes.summary(),
        anomalies,
        time_range: options.time_range,
        messages: messages.len() as u64,
        pairs: pairs.len() as u64,
    }
}

fn log_outcome(report: &Report) {
    info!(
        messages = report.messages,
        pairs = report.pairs,
        agents = report.agents.len(),
        conversations = report.outcomes.conversations,
        time_range = %report.time_range,
        "response-time report computed"
    );
    if !report.anomalies.is_empty() {
        warn!(
            malformed_records = report.anomalies.malformed_records,
            unattributed_replies = report.anomalies.unattributed_replies,
            negative_elapsed = report.anomalies.negative_elapsed,
            negative_resolution = report.anomalies.negative_resolution,
            "data-quality anomalies excluded from the report"
        );
    }
}
