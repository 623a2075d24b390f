// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The daily support window.
//!
//! Business hours are a half-open window `[start, end)` of local clock time in
//! a fixed timezone. Instants are converted to that zone before comparing.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use firstreply_config::model::BusinessHoursConfig;
use firstreply_core::{ClockTime, FirstReplyError};

/// A validated support window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    start: ClockTime,
    end: ClockTime,
    timezone: Tz,
}

impl BusinessHours {
    /// Build a window, rejecting empty or inverted ones.
    pub fn new(start: ClockTime, end: ClockTime, timezone: Tz) -> Result<Self, FirstReplyError> {
        if start >= end {
            return Err(FirstReplyError::Config(format!(
                "business hours start {start} must be earlier than end {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            timezone,
        })
    }

    pub fn from_config(config: &BusinessHoursConfig) -> Result<Self, FirstReplyError> {
        Self::new(config.start, config.end, config.timezone)
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Local wall-clock time of `instant` in the window's timezone.
    pub fn local_time(&self, instant: DateTime<FixedOffset>) -> NaiveTime {
        instant.with_timezone(&self.timezone).time()
    }

    /// Whether `instant` falls before the window opens on its local day.
    pub fn is_before_opening(&self, instant: DateTime<FixedOffset>) -> bool {
        match self.start.to_naive_time() {
            Some(open) => self.local_time(instant) < open,
            None => true,
        }
    }

    /// Whether `instant` falls inside `[start, end)` on its local day.
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        if self.is_before_opening(instant) {
            return false;
        }
        match self.end.to_naive_time() {
            Some(close) => self.local_time(instant) < close,
            None => true,
        }
    }

    /// The instant the window opens on the local calendar day of `instant`.
    ///
    /// When the opening time falls in a DST gap the window opens one hour
    /// later in wall-clock terms. Returns `None` only if neither exists.
    pub fn opening_on_day_of(
        &self,
        instant: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        let open = self.start.to_naive_time()?;
        let day = instant.with_timezone(&self.timezone).date_naive();
        let local_open = day.and_time(open);

        self.timezone
            .from_local_datetime(&local_open)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(local_open + TimeDelta::hours(1)))
                    .earliest()
            })
            .map(|ts| ts.fixed_offset())
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        let config = BusinessHoursConfig::default();
        Self {
            start: config.start,
            end: config.end,
            timezone: config.timezone,
        }
    }
}
