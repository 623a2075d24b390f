// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for firstreply.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use chrono_tz::Tz;
use firstreply_core::{ClockTime, NaiveTimestampPolicy, TimeRange};
use serde::{Deserialize, Serialize};

/// Top-level firstreply configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FirstReplyConfig {
    /// Support hours used to discount pre-opening waiting time.
    #[serde(default)]
    pub business_hours: BusinessHoursConfig,

    /// Report scope and input interpretation.
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// The daily support window `[start, end)` in local time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessHoursConfig {
    /// Opening time, `HH:MM`.
    #[serde(default = "default_start")]
    pub start: ClockTime,

    /// Closing time, `HH:MM`. `24:00` closes at midnight.
    #[serde(default = "default_end")]
    pub end: ClockTime,

    /// IANA timezone the window is expressed in (e.g. `Europe/Moscow`).
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            timezone: default_timezone(),
        }
    }
}

fn default_start() -> ClockTime {
    ClockTime::new(9, 30).unwrap_or(ClockTime::MIDNIGHT)
}

fn default_end() -> ClockTime {
    ClockTime::END_OF_DAY
}

fn default_timezone() -> Tz {
    Tz::UTC
}

/// Report configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Trailing window applied to replies by inbound time.
    #[serde(default)]
    pub time_range: TimeRange,

    /// Whether offset-less timestamps are read as local time or rejected.
    #[serde(default)]
    pub naive_timestamps: NaiveTimestampPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_support_window() {
        let config = FirstReplyConfig::default();
        assert_eq!(config.business_hours.start.to_string(), "09:30");
        assert!(config.business_hours.end.is_end_of_day());
        assert_eq!(config.business_hours.timezone, Tz::UTC);
        assert_eq!(config.report.time_range, TimeRange::All);
        assert_eq!(config.report.naive_timestamps, NaiveTimestampPolicy::Local);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn business_hours_deserialize_from_strings() {
        let toml_str = r#"
[business_hours]
start = "08:00"
end = "20:00"
timezone = "Europe/Moscow"
"#;
        let config: FirstReplyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.business_hours.start, ClockTime::new(8, 0).unwrap());
        assert_eq!(config.business_hours.end, ClockTime::new(20, 0).unwrap());
        assert_eq!(config.business_hours.timezone, chrono_tz::Europe::Moscow);
    }

    #[test]
    fn bad_clock_string_is_rejected() {
        let toml_str = r#"
[business_hours]
start = "half past nine"
"#;
        assert!(toml::from_str::<FirstReplyConfig>(toml_str).is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = FirstReplyConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        assert!(rendered.contains("start = \"09:30\""));
        assert!(rendered.contains("end = \"24:00\""));
        let parsed: FirstReplyConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.business_hours.start, config.business_hours.start);
        assert_eq!(parsed.report.time_range, config.report.time_range);
    }
}
