//! Report formatting and printing utilities.
//!
//! Separate from the extraction logic so loctext can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::extractor::{EntryReport, RunPhase, RunReport};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the outcome of an extraction pass to stdout.
pub fn print_extract(report: &RunReport) {
    print_extract_to(report, &mut io::stdout().lock());
}

/// Print the outcome of an extraction pass to a custom writer.
pub fn print_extract_to<W: Write>(report: &RunReport, writer: &mut W) {
    for source in &report.sources {
        let _ = writeln!(
            writer,
            "{} {} {} ({} new)",
            "source".dimmed(),
            source.name.bold(),
            plural(source.found, "text", "texts"),
            source.new
        );
    }

    let width = report
        .entries
        .iter()
        .map(|entry| UnicodeWidthStr::width(entry.title.as_str()))
        .max()
        .unwrap_or(0);
    for entry in &report.entries {
        print_entry(entry, report.dry_run, width, writer);
    }

    let changed = report
        .entries
        .iter()
        .filter(|entry| entry.summary.changed())
        .count();
    let discovered = plural(report.discovered, "text", "texts");
    let total = report.entries.len();

    let msg = if changed == 0 {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Discovered {}, {} up to date",
                discovered,
                if total == 1 {
                    "the entry is".to_string()
                } else {
                    format!("all {} entries are", total)
                }
            )
            .green()
        )
    } else if report.dry_run {
        format!(
            "{} {}",
            FAILURE_MARK.yellow(),
            format!(
                "Discovered {}, {} of {} would change (dry run)",
                discovered,
                changed,
                plural(total, "entry", "entries")
            )
            .yellow()
        )
    } else {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Discovered {}, updated {} of {}",
                discovered,
                changed,
                plural(total, "entry", "entries")
            )
            .green()
        )
    };
    let _ = writeln!(writer, "{}", msg);
}

fn print_entry<W: Write>(entry: &EntryReport, dry_run: bool, width: usize, writer: &mut W) {
    let padding = width.saturating_sub(UnicodeWidthStr::width(entry.title.as_str()));
    let summary = &entry.summary;

    let status = if !summary.changed() {
        "unchanged".dimmed()
    } else if dry_run {
        "would update".yellow()
    } else {
        "updated".cyan()
    };

    let _ = writeln!(
        writer,
        "{} {}{:padding$}  +{} -{} ={}",
        status,
        entry.title.bold(),
        "",
        summary.added,
        summary.pruned,
        summary.retained,
        padding = padding
    );
}

/// Print a progress line to stderr (verbose mode).
pub fn print_phase(phase: RunPhase<'_>) {
    let line = match phase {
        RunPhase::Started => "starting extraction".to_string(),
        RunPhase::Source(name) => format!("running source {}", name),
        RunPhase::Reconciling => "reconciling entries".to_string(),
        RunPhase::Finished => "done".to_string(),
    };
    eprintln!("{} {}", "progress:".bold().blue(), line);
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
