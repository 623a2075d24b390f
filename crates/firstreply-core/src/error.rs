// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for firstreply.
//!
//! Only structural failures are errors. Per-record data-quality problems are
//! counted in [`AnomalyCounts`](crate::types::AnomalyCounts) instead.

use thiserror::Error;

/// The primary error type used across the firstreply crates.
#[derive(Debug, Error)]
pub enum FirstReplyError {
    /// Configuration errors (invalid values, unknown timezone, bad clock strings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The input could not be read or decoded at all.
    #[error("input error: {message}")]
    Input {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The input decoded, but is not a sequence of message records.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// Filesystem errors while opening inputs.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
