//! CLI output formatting for a generation run.
//!
//! # Output Format
//!
//! ```text
//! Generators
//! 001 ore_veins (6 resources)
//! 002 rocks (21 resources)
//!
//! Files
//!     created: tfc/rocks/granite.json
//!     modified: tfc/lang/en_us.json
//!
//! Deleted
//!     tfc/rocks/obsidian.json
//!
//! Lang overrides
//!     tfc/lang/en_us.json: key "k" changed from "a" to "b" by src/x.rs:10
//!
//! 1208 files: 1 created, 1 modified, 1206 unchanged, 1 deleted
//! ```
//!
//! Unchanged files are listed only in verbose mode. A dry run prints the
//! same report under a `Check` header, with the summary prefixed by
//! `would write`.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::manifest::to_manifest_key;
use crate::pipeline::{FileStatus, RunReport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Created => "created",
        FileStatus::Modified => "modified",
        FileStatus::Unchanged => "unchanged",
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_run_report(report: &RunReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if report.dry_run {
        lines.push("Check (no files written)".to_string());
        lines.push(String::new());
    }

    if !report.generators.is_empty() {
        lines.push("Generators".to_string());
        for (i, generator) in report.generators.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                generator.name,
                plural(generator.resources, "resource")
            ));
        }
    }

    let files: Vec<String> = report
        .files
        .iter()
        .filter(|f| verbose || f.status != FileStatus::Unchanged)
        .map(|f| format!("{}{}: {}", indent(1), status_label(f.status), f.path))
        .collect();
    if !files.is_empty() {
        lines.push(String::new());
        lines.push("Files".to_string());
        lines.extend(files);
    }

    if !report.deleted.is_empty() {
        lines.push(String::new());
        lines.push("Deleted".to_string());
        for path in &report.deleted {
            let note = if report.unrecorded.contains(path) {
                " (not produced by the previous run)"
            } else {
                ""
            };
            lines.push(format!("{}{}{}", indent(1), to_manifest_key(path), note));
        }
    }

    if verbose && !report.pruned.is_empty() {
        lines.push(String::new());
        lines.push("Pruned directories".to_string());
        for path in &report.pruned {
            lines.push(format!("{}{}/", indent(1), to_manifest_key(path)));
        }
    }

    if !report.conflicts.is_empty() {
        lines.push(String::new());
        lines.push("Lang overrides".to_string());
        for conflict in &report.conflicts {
            lines.push(format!("{}{}", indent(1), conflict));
        }
    }

    lines.push(String::new());
    if report.dry_run {
        lines.push(format!("would write {}", report.stats));
    } else {
        lines.push(report.stats.to_string());
    }
    lines
}

pub fn print_run_report(report: &RunReport, verbose: bool) {
    for line in format_run_report(report, verbose) {
        println!("{}", line);
    }
}

/// Exit-relevant summary of a dry run: does the tree on disk match what the
/// generators would produce?
pub fn is_up_to_date(report: &RunReport) -> bool {
    report.stats.created == 0 && report.stats.modified == 0 && report.stats.deleted == 0
}
