// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV message exports.
//!
//! The header row names the record fields (case-insensitive, any order, extra
//! columns ignored). Empty cells are null. Rows that cannot be decoded are
//! kept as empty records so that validation skips and counts them.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use firstreply_core::{FirstReplyError, MessageRecord};
use tracing::debug;

/// Column positions of the record fields in the header row.
#[derive(Debug, Default)]
struct Columns {
    id: Option<usize>,
    conversation_id: Option<usize>,
    direction: Option<usize>,
    agent_id: Option<usize>,
    timestamp: Option<usize>,
    resolved_at: Option<usize>,
    satisfaction: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Self {
            id: find("id"),
            conversation_id: find("conversation_id"),
            direction: find("direction"),
            agent_id: find("agent_id"),
            timestamp: find("timestamp"),
            resolved_at: find("resolved_at"),
            satisfaction: find("satisfaction"),
        }
    }

    fn knows_records(&self) -> bool {
        self.conversation_id.is_some() || self.direction.is_some() || self.timestamp.is_some()
    }

    fn record(&self, row: &StringRecord) -> MessageRecord {
        let cell = |column: Option<usize>| {
            column
                .and_then(|i| row.get(i))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        MessageRecord {
            id: cell(self.id),
            conversation_id: cell(self.conversation_id),
            direction: cell(self.direction),
            agent_id: cell(self.agent_id),
            timestamp: cell(self.timestamp),
            resolved_at: cell(self.resolved_at),
            satisfaction: cell(self.satisfaction),
        }
    }
}

/// Parse CSV with a header row into boundary records.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<MessageRecord>, FirstReplyError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(input_error)?.clone();
    let columns = Columns::from_headers(&headers);
    if !columns.knows_records() {
        return Err(FirstReplyError::MalformedInput {
            message: "CSV header has none of conversation_id, direction, timestamp".to_string(),
        });
    }

    let mut records = Vec::new();
    for (position, row) in reader.records().enumerate() {
        match row {
            Ok(row) => records.push(columns.record(&row)),
            Err(e) if e.is_io_error() => return Err(input_error(e)),
            Err(e) => {
                debug!(position, error = %e, "unreadable CSV row");
                records.push(MessageRecord::default());
            }
        }
    }

    Ok(records)
}

fn input_error(e: csv::Error) -> FirstReplyError {
    FirstReplyError::Input {
        message: format!("invalid CSV: {e}"),
        source: Some(Box::new(e)),
    }
}
