// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message record readers for firstreply.
//!
//! Turns JSON or CSV exports into [`MessageRecord`]s. Readers only fail on
//! structural problems (unreadable file, undecodable document, no record
//! sequence); individual bad records are passed through for validation to
//! skip and count.

pub mod csv_records;
pub mod json_records;

use std::path::Path;

use firstreply_core::{FirstReplyError, MessageRecord};
use strum::{Display, EnumString};
use tracing::debug;

pub use csv_records::parse_csv;
pub use json_records::parse_json;

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

/// Read every record from `path`.
///
/// When `format` is `None` it is inferred from the file extension.
pub fn read_records(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<MessageRecord>, FirstReplyError> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| FirstReplyError::Input {
            message: format!(
                "cannot tell the format of {}; use a .json or .csv extension or pass a format",
                path.display()
            ),
            source: None,
        })?;

    let io_error = |source| FirstReplyError::Io {
        path: path.display().to_string(),
        source,
    };

    let records = match format {
        InputFormat::Json => parse_json(&std::fs::read_to_string(path).map_err(io_error)?)?,
        InputFormat::Csv => parse_csv(std::fs::File::open(path).map_err(io_error)?)?,
    };

    debug!(path = %path.display(), %format, records = records.len(), "records read");
    Ok(records)
}
