// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! firstreply - first-response-time report for support conversations.
//!
//! This is the binary entry point.

mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use firstreply_config::{ConfigError, FirstReplyConfig};
use firstreply_core::TimeRange;
use firstreply_ingest::InputFormat;

/// Exit status for configuration problems.
const EXIT_CONFIG: i32 = 1;
/// Exit status for input that cannot be read as a record sequence.
const EXIT_INPUT: i32 = 2;

/// firstreply - how fast do agents answer customers?
#[derive(Parser, Debug)]
#[command(name = "firstreply", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute per-agent response times from a message export.
    Report(ReportArgs),
    /// Print the effective configuration as TOML.
    Config {
        /// Read configuration from this file instead of the default locations.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// JSON or CSV message export.
    input: PathBuf,

    /// Read configuration from this file instead of the default locations.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reporting window: today, week, month, year or all.
    #[arg(long)]
    range: Option<TimeRange>,

    /// Input format; inferred from the file extension when omitted.
    #[arg(long)]
    format: Option<InputFormat>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Disable colors.
    #[arg(long)]
    plain: bool,
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Report(args) => run_report(args),
        Commands::Config { config } => run_config(config.as_deref()),
    };
    std::process::exit(code);
}

fn load_config(path: Option<&Path>) -> Result<FirstReplyConfig, Vec<ConfigError>> {
    match path {
        Some(path) => firstreply_config::load_and_validate_path(path),
        None => firstreply_config::load_and_validate(),
    }
}

fn run_report(args: ReportArgs) -> i32 {
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            firstreply_config::render_errors(&errors);
            return EXIT_CONFIG;
        }
    };
    init_tracing(&config.log.level);

    let now = chrono::Utc::now().fixed_offset();
    let options = match firstreply_engine::EngineOptions::from_config(&config, now) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_CONFIG;
        }
    };
    let options = match args.range {
        Some(range) => options.with_time_range(range),
        None => options,
    };

    let records = match firstreply_ingest::read_records(&args.input, args.format) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "input rejected");
            eprintln!("error: {e}");
            return EXIT_INPUT;
        }
    };

    let report = firstreply_engine::analyze(records, &options);
    report::print_report(&report, args.json, args.plain);
    0
}

fn run_config(path: Option<&Path>) -> i32 {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(errors) => {
            firstreply_config::render_errors(&errors);
            return EXIT_CONFIG;
        }
    };

    match toml::to_string_pretty(&config) {
        Ok(rendered) => {
            print!("{rendered}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to render configuration: {e}");
            EXIT_CONFIG
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("firstreply={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
