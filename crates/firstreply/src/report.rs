// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `firstreply report` output.
//!
//! Renders a [`Report`] as an aligned table (colored on a terminal) or as
//! pretty JSON for scripting.

use std::fmt::Write;
use std::io::IsTerminal;

use colored::Colorize;
use firstreply_core::{AnomalyCounts, OutcomeSummary};
use firstreply_engine::Report;

const AGENT_WIDTH: usize = 20;
const NUMBER_WIDTH: usize = 10;

/// Print `report` to stdout.
///
/// `--json` wins over everything else. Colors are used only when stdout is a
/// TTY and `--plain` was not given.
pub fn print_report(report: &Report, json: bool, plain: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_table(report, use_color));
    }
}

/// Render the per-agent table, the overall line and the anomaly counters.
pub fn render_table(report: &Report, use_color: bool) -> String {
    let mut out = String::new();
    let rule = "-".repeat(AGENT_WIDTH + 4 * (NUMBER_WIDTH + 1));

    let _ = writeln!(out);
    let _ = writeln!(out, "  firstreply report (range: {})", report.time_range);
    let _ = writeln!(out, "  {rule}");

    let header = format!(
        "  {:<aw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$}",
        "Agent",
        "Replies",
        "Avg min",
        "Min min",
        "Max min",
        aw = AGENT_WIDTH,
        nw = NUMBER_WIDTH,
    );
    if use_color {
        let _ = writeln!(out, "{}", header.bold());
    } else {
        let _ = writeln!(out, "{header}");
    }

    if report.agents.is_empty() {
        let _ = writeln!(out, "  (no attributed replies)");
    }
    for agent in &report.agents {
        let name = truncate(&agent.agent_id.0, AGENT_WIDTH);
        let name = if use_color {
            format!("{name:<aw$}", aw = AGENT_WIDTH).cyan().to_string()
        } else {
            format!("{name:<aw$}", aw = AGENT_WIDTH)
        };
        let _ = writeln!(
            out,
            "  {name} {:>nw$} {:>nw$.2} {:>nw$.2} {:>nw$.2}",
            agent.total_responses,
            agent.avg_minutes,
            agent.min_minutes,
            agent.max_minutes,
            nw = NUMBER_WIDTH,
        );
    }

    let _ = writeln!(out, "  {rule}");
    match &report.overall {
        Some(overall) => {
            let _ = writeln!(
                out,
                "  {:<aw$} {:>nw$} {:>nw$.2} {:>nw$.2} {:>nw$.2}",
                "Overall",
                overall.total_responses,
                overall.avg_minutes,
                overall.min_minutes,
                overall.max_minutes,
                aw = AGENT_WIDTH,
                nw = NUMBER_WIDTH,
            );
        }
        None => {
            let _ = writeln!(out, "  {:<aw$} no measured replies", "Overall", aw = AGENT_WIDTH);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "    Messages: {}  Pairs: {}",
        report.messages, report.pairs
    );
    let _ = writeln!(out, "    {}", outcome_line(&report.outcomes));
    let _ = writeln!(out, "    {}", anomaly_line(&report.anomalies, use_color));
    let _ = writeln!(out);
    out
}

fn outcome_line(outcomes: &OutcomeSummary) -> String {
    let or_dash = |value: Option<f64>, suffix: &str| match value {
        Some(v) => format!("{v:.2}{suffix}"),
        None => "-".to_string(),
    };
    format!(
        "Conversations: {}  Resolved: {} ({})  Avg resolution: {}  Satisfaction: {} ({} rated)",
        outcomes.conversations,
        outcomes.resolved,
        or_dash(outcomes.resolution_rate, "%"),
        or_dash(outcomes.avg_resolution_minutes, " min"),
        or_dash(outcomes.avg_satisfaction, "/5"),
        outcomes.rated,
    )
}

fn anomaly_line(anomalies: &AnomalyCounts, use_color: bool) -> String {
    let counts = format!(
        "malformed records {}, unattributed replies {}, negative latencies {}, \
         negative resolutions {}",
        anomalies.malformed_records,
        anomalies.unattributed_replies,
        anomalies.negative_elapsed,
        anomalies.negative_resolution,
    );
    match (anomalies.is_empty(), use_color) {
        (true, true) => format!("Anomalies: {} {}", "✓".green(), "none".green()),
        (true, false) => "Anomalies: [OK] none".to_string(),
        (false, true) => format!("Anomalies: {} {}", "!".yellow(), counts.yellow()),
        (false, false) => format!("Anomalies: [WARN] {counts}"),
    }
}

/// Cut `name` to `width` characters, marking the cut with `~`.
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
