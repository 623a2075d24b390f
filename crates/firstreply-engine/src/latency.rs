// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Business-hours latency adjustment.
//!
//! The adjustment looks only at the inbound message's local clock time:
//!
//! - inbound before opening, reply at or after that day's opening: latency is
//!   measured from the opening instant, so the overnight wait is not counted;
//! - anything else: latency is the raw wall-clock difference.
//!
//! Replies spanning several closed periods (weekends, multi-day gaps) still
//! only receive the single-day adjustment. Negative results are never clamped;
//! the pair is left without an adjusted latency and reported as an anomaly.

use chrono::TimeDelta;
use firstreply_core::ResponsePair;
use tracing::debug;

use crate::hours::BusinessHours;

/// Computes adjusted latencies against a fixed support window.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyCalculator {
    hours: BusinessHours,
}

impl LatencyCalculator {
    pub fn new(hours: BusinessHours) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    /// The adjusted latency of `pair`, which may be negative.
    pub fn adjusted_elapsed(&self, pair: &ResponsePair) -> TimeDelta {
        if !self.hours.is_before_opening(pair.inbound_at) {
            return pair.raw_elapsed;
        }
        match self.hours.opening_on_day_of(pair.inbound_at) {
            Some(opening) if pair.outbound_at >= opening => pair.outbound_at - opening,
            _ => pair.raw_elapsed,
        }
    }

    /// Fill in `adjusted_elapsed`, or leave it `None` when the result is negative.
    pub fn resolve(&self, mut pair: ResponsePair) -> ResponsePair {
        let adjusted = self.adjusted_elapsed(&pair);
        if adjusted < TimeDelta::zero() {
            debug!(
                conversation = %pair.conversation_id,
                inbound_at = %pair.inbound_at,
                outbound_at = %pair.outbound_at,
                elapsed_secs = adjusted.num_seconds(),
                "negative response time, excluding pair"
            );
            pair.adjusted_elapsed = None;
        } else {
            pair.adjusted_elapsed = Some(adjusted);
        }
        pair
    }
}
