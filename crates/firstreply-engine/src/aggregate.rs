// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-agent aggregation of adjusted response times.
//!
//! Latencies are accumulated as whole milliseconds, so the fold is exactly
//! commutative and associative: aggregators built over disjoint partitions
//! merge into the same result as a single pass, in any order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use firstreply_core::{AgentId, AgentSummary, AnomalyCounts, OverallSummary, ResponsePair};
use tracing::debug;

const MILLIS_PER_MINUTE: i128 = 60_000;

/// Running count, sum, min and max of latencies in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LatencyStats {
    count: u64,
    total_ms: i128,
    min_ms: i64,
    max_ms: i64,
}

impl LatencyStats {
    fn single(ms: i64) -> Self {
        Self {
            count: 1,
            total_ms: i128::from(ms),
            min_ms: ms,
            max_ms: ms,
        }
    }

    fn merge(&mut self, other: &LatencyStats) {
        self.count += other.count;
        self.total_ms += other.total_ms;
        self.min_ms = self.min_ms.min(other.min_ms);
        self.max_ms = self.max_ms.max(other.max_ms);
    }

    /// Compare exact means without dividing.
    fn cmp_mean(&self, other: &LatencyStats) -> Ordering {
        (self.total_ms * i128::from(other.count)).cmp(&(other.total_ms * i128::from(self.count)))
    }

    fn avg_minutes(&self) -> f64 {
        average_minutes(self.total_ms, self.count)
    }

    fn min_minutes(&self) -> f64 {
        round_minutes(i128::from(self.min_ms))
    }

    fn max_minutes(&self) -> f64 {
        round_minutes(i128::from(self.max_ms))
    }
}

/// Convert milliseconds to minutes rounded to two decimals, ties to even.
pub fn round_minutes(ms: i128) -> f64 {
    round_ratio(ms, MILLIS_PER_MINUTE)
}

/// Mean of `count` latencies totalling `total_ms`, in rounded minutes.
pub fn average_minutes(total_ms: i128, count: u64) -> f64 {
    round_ratio(total_ms, i128::from(count) * MILLIS_PER_MINUTE)
}

/// `numerator / denominator` rounded to two decimals, ties to even.
///
/// The rounding is done on integers, so values that sit exactly on a
/// hundredths tie stay on it. A zero denominator yields `0.0`.
pub fn round_ratio(numerator: i128, denominator: i128) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let (numerator, denominator) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    let scaled = numerator * 100;
    let mut hundredths = scaled.div_euclid(denominator);
    let twice_remainder = 2 * scaled.rem_euclid(denominator);
    if twice_remainder > denominator
        || (twice_remainder == denominator && hundredths.rem_euclid(2) == 1)
    {
        hundredths += 1;
    }
    hundredths as f64 / 100.0
}

/// Folds resolved response pairs into per-agent statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentAggregator {
    per_agent: BTreeMap<AgentId, LatencyStats>,
    overall: Option<LatencyStats>,
    anomalies: AnomalyCounts,
}

impl AgentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one pair.
    ///
    /// Pairs without an adjusted latency count as negative-elapsed anomalies.
    /// Pairs without an agent count as unattributed and only contribute to
    /// the overall statistics.
    pub fn fold(&mut self, pair: &ResponsePair) {
        if pair.agent_id.is_none() {
            self.anomalies.unattributed_replies += 1;
        }

        let Some(adjusted) = pair.adjusted_elapsed else {
            self.anomalies.negative_elapsed += 1;
            return;
        };
        let stats = LatencyStats::single(adjusted.num_milliseconds());

        merge_into(&mut self.overall, &stats);
        match &pair.agent_id {
            Some(agent) => {
                self.per_agent
                    .entry(agent.clone())
                    .and_modify(|s| s.merge(&stats))
                    .or_insert(stats);
            }
            None => debug!(
                conversation = %pair.conversation_id,
                outbound_at = %pair.outbound_at,
                "reply without agent, excluded from per-agent stats"
            ),
        }
    }

    /// Combine a partial aggregate built over another partition.
    pub fn merge(&mut self, other: AgentAggregator) {
        for (agent, stats) in other.per_agent {
            self.per_agent
                .entry(agent)
                .and_modify(|s| s.merge(&stats))
                .or_insert(stats);
        }
        if let Some(stats) = other.overall {
            merge_into(&mut self.overall, &stats);
        }
        self.anomalies.merge(&other.anomalies);
    }

    pub fn anomalies(&self) -> AnomalyCounts {
        self.anomalies
    }

    /// One summary per agent with at least one qualifying pair, fastest first.
    ///
    /// Ties on the average are broken by agent id.
    pub fn summaries(&self) -> Vec<AgentSummary> {
        let mut ranked: Vec<(&AgentId, &LatencyStats)> = self.per_agent.iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            a.cmp_mean(b).then_with(|| a_id.cmp(b_id))
        });

        ranked
            .into_iter()
            .map(|(agent_id, stats)| AgentSummary {
                agent_id: agent_id.clone(),
                total_responses: stats.count,
                avg_minutes: stats.avg_minutes(),
                min_minutes: stats.min_minutes(),
                max_minutes: stats.max_minutes(),
            })
            .collect()
    }

    /// Statistics across every pair with a resolved latency, attributed or not.
    pub fn overall(&self) -> Option<OverallSummary> {
        self.overall.map(|stats| OverallSummary {
            total_responses: stats.count,
            avg_minutes: stats.avg_minutes(),
            min_minutes: stats.min_minutes(),
            max_minutes: stats.max_minutes(),
        })
    }
}

impl<'a> FromIterator<&'a ResponsePair> for AgentAggregator {
    fn from_iter<I: IntoIterator<Item = &'a ResponsePair>>(iter: I) -> Self {
        let mut aggregator = AgentAggregator::new();
        for pair in iter {
            aggregator.fold(pair);
        }
        aggregator
    }
}

fn merge_into(slot: &mut Option<LatencyStats>, stats: &LatencyStats) {
    match slot {
        Some(existing) => existing.merge(stats),
        None => *slot = Some(*stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use firstreply_core::ConversationId;
    use firstreply_test_utils::at;

    fn resolved(agent: Option<&str>, minutes: Option<i64>) -> ResponsePair {
        let inbound_at = at("2024-03-01T10:00:00Z");
        let raw = TimeDelta::minutes(minutes.unwrap_or(-5));
        ResponsePair {
            conversation_id: ConversationId("c".into()),
            agent_id: agent.map(|a| AgentId(a.into())),
            inbound_at,
            outbound_at: inbound_at + raw,
            raw_elapsed: raw,
            adjusted_elapsed: minutes.map(TimeDelta::minutes),
        }
    }

    #[test]
    fn summary_for_ten_twenty_thirty() {
        let pairs = [
            resolved(Some("A"), Some(10)),
            resolved(Some("A"), Some(20)),
            resolved(Some("A"), Some(30)),
        ];
        let summaries = pairs.iter().collect::<AgentAggregator>().summaries();
        assert_eq!(
            summaries,
            vec![AgentSummary {
                agent_id: AgentId("A".into()),
                total_responses: 3,
                avg_minutes: 20.0,
                min_minutes: 10.0,
                max_minutes: 30.0,
            }]
        );
    }

    #[test]
    fn sorted_by_average_then_agent_id() {
        let pairs = [
            resolved(Some("slow"), Some(50)),
            resolved(Some("b-fast"), Some(5)),
            resolved(Some("a-fast"), Some(5)),
            resolved(Some("mid"), Some(20)),
        ];
        let order: Vec<String> = pairs
            .iter()
            .collect::<AgentAggregator>()
            .summaries()
            .into_iter()
            .map(|s| s.agent_id.0)
            .collect();
        assert_eq!(order, vec!["a-fast", "b-fast", "mid", "slow"]);
    }

    #[test]
    fn unattributed_reply_counts_but_is_not_summarized() {
        let pairs = [resolved(None, Some(12)), resolved(Some("A"), Some(4))];
        let aggregator = pairs.iter().collect::<AgentAggregator>();
        assert_eq!(aggregator.anomalies().unattributed_replies, 1);
        let summaries = aggregator.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].agent_id, AgentId("A".into()));

        let overall = aggregator.overall().unwrap();
        assert_eq!(overall.total_responses, 2);
        assert_eq!(overall.avg_minutes, 8.0);
    }

    #[test]
    fn unresolved_pairs_are_counted_and_omitted() {
        let pairs = [resolved(Some("ghost"), None)];
        let aggregator = pairs.iter().collect::<AgentAggregator>();
        assert_eq!(aggregator.anomalies().negative_elapsed, 1);
        assert!(aggregator.summaries().is_empty());
        assert!(aggregator.overall().is_none());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let aggregator = AgentAggregator::new();
        assert!(aggregator.summaries().is_empty());
        assert!(aggregator.overall().is_none());
        assert!(aggregator.anomalies().is_empty());
    }

    #[test]
    fn rounding_is_half_to_even() {
        // 0.125 minutes = 7.5 s; 0.375 minutes = 22.5 s.
        assert_eq!(round_minutes(7_500), 0.12);
        assert_eq!(round_minutes(22_500), 0.38);
        assert_eq!(round_minutes(32_700), 0.54);
        assert_eq!(round_minutes(34_500), 0.58);
        assert_eq!(round_minutes(60_900), 1.02);
        assert_eq!(round_minutes(73_500), 1.22);
        assert_eq!(round_minutes(90_000), 1.5);
        assert_eq!(round_minutes(0), 0.0);
    }

    #[test]
    fn every_hundredth_minute_tie_rounds_to_even() {
        // 300 * (2k + 1) ms is exactly k + 0.5 hundredths of a minute.
        for k in 0..200_000i128 {
            let ms = 300 * (2 * k + 1);
            let expected = if k % 2 == 0 { k } else { k + 1 };
            assert_eq!(round_minutes(ms), expected as f64 / 100.0, "ms = {ms}");
        }
    }

    #[test]
    fn non_ties_round_to_nearest() {
        assert_eq!(round_minutes(32_699), 0.54);
        assert_eq!(round_minutes(32_701), 0.55);
        assert_eq!(round_ratio(2, 3), 0.67);
        assert_eq!(round_ratio(1, 0), 0.0);
    }

    #[test]
    fn average_on_a_tie_rounds_to_even() {
        // mean of 32.0 s and 33.4 s is 32.7 s = 0.545 min.
        let inbound_at = at("2024-03-01T10:00:00Z");
        let pairs: Vec<ResponsePair> = [32_000, 33_400]
            .into_iter()
            .map(|ms| ResponsePair {
                conversation_id: ConversationId("c".into()),
                agent_id: Some(AgentId("A".into())),
                inbound_at,
                outbound_at: inbound_at + TimeDelta::milliseconds(ms),
                raw_elapsed: TimeDelta::milliseconds(ms),
                adjusted_elapsed: Some(TimeDelta::milliseconds(ms)),
            })
            .collect();
        let summary = &pairs.iter().collect::<AgentAggregator>().summaries()[0];
        assert_eq!(summary.avg_minutes, 0.54);
    }

    #[test]
    fn fields_are_rounded_consistently() {
        let inbound_at = at("2024-03-01T10:00:00Z");
        let pairs: Vec<ResponsePair> = [7_500, 22_500]
            .into_iter()
            .map(|ms| ResponsePair {
                conversation_id: ConversationId("c".into()),
                agent_id: Some(AgentId("A".into())),
                inbound_at,
                outbound_at: inbound_at + TimeDelta::milliseconds(ms),
                raw_elapsed: TimeDelta::milliseconds(ms),
                adjusted_elapsed: Some(TimeDelta::milliseconds(ms)),
            })
            .collect();
        let summary = &pairs.iter().collect::<AgentAggregator>().summaries()[0];
        assert_eq!(summary.min_minutes, 0.12);
        assert_eq!(summary.max_minutes, 0.38);
        // mean 15 s = 0.25 min exactly.
        assert_eq!(summary.avg_minutes, 0.25);
    }

    #[test]
    fn merged_partials_equal_single_pass() {
        let pairs = [
            resolved(Some("A"), Some(10)),
            resolved(Some("B"), Some(3)),
            resolved(None, Some(7)),
            resolved(Some("A"), Some(40)),
            resolved(Some("B"), None),
        ];
        let single = pairs.iter().collect::<AgentAggregator>();

        let mut left = pairs[..2].iter().collect::<AgentAggregator>();
        let right = pairs[2..].iter().collect::<AgentAggregator>();
        left.merge(right);

        assert_eq!(left, single);
        assert_eq!(left.summaries(), single.summaries());
    }
}
