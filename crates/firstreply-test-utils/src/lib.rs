// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for firstreply.
//!
//! Provides builders for deterministic message fixtures so engine, reader and
//! binary tests can describe conversations in a line or two.
//!
//! # Components
//!
//! - [`ConversationBuilder`] - Fluent builder for one conversation's messages
//! - [`at`] - RFC 3339 timestamp shorthand
//! - [`to_records`] / [`records_json`] - Boundary-record views of built messages

pub mod conversation;

pub use conversation::{at, records_json, to_records, ConversationBuilder};
