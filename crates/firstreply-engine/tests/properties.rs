// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavioral properties of the response-time engine.

use chrono::{DateTime, FixedOffset, TimeDelta};
use firstreply_core::{AgentId, ConversationId, Direction, Message, MessageId};
use firstreply_engine::{
    analyze, analyze_messages, pair_messages, AgentAggregator, EngineOptions, LatencyCalculator,
};
use firstreply_test_utils::{at, to_records, ConversationBuilder};
use proptest::prelude::*;

fn options() -> EngineOptions {
    EngineOptions::new(at("2024-04-01T00:00:00Z"))
}

#[test]
fn conversation_without_replies_has_no_pairs() {
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T08:00:00Z")
        .inbound("2024-03-01T12:00:00Z")
        .inbound("2024-03-01T18:00:00Z")
        .build();
    assert!(pair_messages(&messages).is_empty());
    assert!(analyze_messages(&messages, &options()).agents.is_empty());
}

#[test]
fn only_first_of_consecutive_replies_is_paired() {
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T11:00:00Z")
        .reply("A", "2024-03-01T11:10:00Z")
        .reply("B", "2024-03-01T11:20:00Z")
        .build();
    let pairs = pair_messages(&messages);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].inbound_at, at("2024-03-01T11:00:00Z"));
    assert_eq!(pairs[0].outbound_at, at("2024-03-01T11:10:00Z"));

    let report = analyze_messages(&messages, &options());
    assert_eq!(report.agents.len(), 1);
    assert_eq!(report.agents[0].agent_id, AgentId("A".into()));
}

#[test]
fn early_inbound_counts_from_opening() {
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T08:00:00Z")
        .reply("A", "2024-03-01T10:00:00Z")
        .build();
    let calculator = LatencyCalculator::default();
    let pair = calculator.resolve(pair_messages(&messages).remove(0));
    assert_eq!(pair.raw_elapsed, TimeDelta::minutes(120));
    assert_eq!(pair.adjusted_elapsed, Some(TimeDelta::minutes(30)));
    assert_eq!(pair.adjusted_elapsed_seconds(), Some(1800.0));
}

#[test]
fn in_hours_inbound_counts_raw() {
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T11:00:00Z")
        .reply("A", "2024-03-01T11:45:00Z")
        .build();
    let report = analyze_messages(&messages, &options());
    assert_eq!(report.agents[0].avg_minutes, 45.0);
    assert_eq!(report.agents[0].min_minutes, 45.0);
    assert_eq!(report.agents[0].max_minutes, 45.0);
}

#[test]
fn unattributed_reply_is_excluded_and_counted_once() {
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T11:00:00Z")
        .unattributed_reply("2024-03-01T11:05:00Z")
        .build();
    let report = analyze(to_records(&messages), &options());
    assert!(report.agents.is_empty());
    assert_eq!(report.anomalies.unattributed_replies, 1);
    assert_eq!(report.anomalies.total(), 1);
}

#[test]
fn ten_twenty_thirty_minutes() {
    let mut messages = Vec::new();
    for (i, minutes) in [10, 20, 30].into_iter().enumerate() {
        let inbound = at("2024-03-01T11:00:00Z") + TimeDelta::days(i as i64);
        messages.extend(
            ConversationBuilder::new(&format!("c{i}"))
                .inbound(&inbound.to_rfc3339())
                .reply("A", &(inbound + TimeDelta::minutes(minutes)).to_rfc3339())
                .build(),
        );
    }
    let report = analyze_messages(&messages, &options());
    let a = &report.agents[0];
    assert_eq!(a.total_responses, 3);
    assert_eq!(a.avg_minutes, 20.00);
    assert_eq!(a.min_minutes, 10.00);
    assert_eq!(a.max_minutes, 30.00);
}

#[test]
fn agent_without_qualifying_pairs_is_omitted() {
    // "B" only ever follows another reply, so never qualifies.
    let messages = ConversationBuilder::new("c1")
        .inbound("2024-03-01T11:00:00Z")
        .reply("A", "2024-03-01T11:02:00Z")
        .reply("B", "2024-03-01T11:03:00Z")
        .build();
    let report = analyze_messages(&messages, &options());
    let agents: Vec<&str> = report.agents.iter().map(|s| s.agent_id.0.as_str()).collect();
    assert_eq!(agents, vec!["A"]);
}

#[derive(Debug, Clone)]
struct Shape {
    conversation: u8,
    inbound: bool,
    agent: Option<u8>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (0u8..5, any::<bool>(), proptest::option::weighted(0.9, 0u8..4)).prop_map(
        |(conversation, inbound, agent)| Shape {
            conversation,
            inbound,
            agent,
        },
    )
}

/// Turn shapes into messages with distinct timestamps spread over several days,
/// so some inbound messages land before opening time.
fn build(shapes: &[Shape]) -> Vec<Message> {
    let base: DateTime<FixedOffset> = at("2024-03-01T06:00:00Z");
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| Message {
            id: MessageId(format!("m{i}")),
            conversation_id: ConversationId(format!("c{}", shape.conversation)),
            direction: if shape.inbound {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            agent_id: if shape.inbound {
                None
            } else {
                shape.agent.map(|a| AgentId(format!("agent-{a}")))
            },
            timestamp: base + TimeDelta::minutes(i as i64 * 97),
            resolved_at: None,
            satisfaction: None,
        })
        .collect()
}

proptest! {
    #[test]
    fn report_is_independent_of_input_order(
        (original, shuffled) in proptest::collection::vec(shape_strategy(), 0..60)
            .prop_map(|shapes| build(&shapes))
            .prop_flat_map(|messages| (Just(messages.clone()), Just(messages).prop_shuffle()))
    ) {
        let opts = options();
        prop_assert_eq!(
            analyze_messages(&original, &opts),
            analyze_messages(&shuffled, &opts)
        );
    }

    #[test]
    fn partitioned_aggregation_matches_single_pass(
        shapes in proptest::collection::vec(shape_strategy(), 0..60)
    ) {
        let messages = build(&shapes);
        let calculator = LatencyCalculator::default();
        let resolve = |msgs: &[Message]| -> AgentAggregator {
            pair_messages(msgs)
                .into_iter()
                .map(|p| calculator.resolve(p))
                .collect::<Vec<_>>()
                .iter()
                .collect()
        };

        let single = resolve(&messages);

        let (even, odd): (Vec<Message>, Vec<Message>) = messages
            .iter()
            .cloned()
            .partition(|m| {
                m.conversation_id
                    .0
                    .ends_with(|c: char| matches!(c, '0' | '2' | '4'))
            });
        let mut merged = resolve(&odd);
        merged.merge(resolve(&even));

        prop_assert_eq!(merged.summaries(), single.summaries());
        prop_assert_eq!(merged.overall(), single.overall());
        prop_assert_eq!(merged.anomalies(), single.anomalies());
    }

    #[test]
    fn adjusted_latency_never_exceeds_raw(
        shapes in proptest::collection::vec(shape_strategy(), 0..60)
    ) {
        let calculator = LatencyCalculator::default();
        for pair in pair_messages(&build(&shapes)) {
            let resolved = calculator.resolve(pair);
            let adjusted = resolved.adjusted_elapsed.expect("sorted input is never negative");
            prop_assert!(adjusted >= TimeDelta::zero());
            prop_assert!(adjusted <= resolved.raw_elapsed);
        }
    }
}
