// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./firstreply.toml` > `~/.config/firstreply/firstreply.toml`
//! > `/etc/firstreply/firstreply.toml`, with environment variable overrides via the
//! `FIRSTREPLY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FirstReplyConfig;

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "firstreply.toml";

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/firstreply/firstreply.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("firstreply").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/firstreply/firstreply.toml` (system-wide)
/// 3. `~/.config/firstreply/firstreply.toml` (user XDG config)
/// 4. `./firstreply.toml` (local directory)
/// 5. `FIRSTREPLY_*` environment variables
pub fn load_config() -> Result<FirstReplyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FirstReplyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FirstReplyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FirstReplyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FirstReplyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FirstReplyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because section and key
/// names contain underscores: `FIRSTREPLY_BUSINESS_HOURS_START` must map to
/// `business_hours.start`, not `business.hours.start`.
fn env_provider() -> Env {
    Env::prefixed("FIRSTREPLY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("business_hours_", "business_hours.", 1)
            .replacen("report_", "report.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
