//! Reference scanner for `loctext extract`.
//!
//! Walks the context directory, collects string literals passed to `tr("...")`
//! or `localize("...")`, and delivers them to the endpoint it was given.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use loctext::core::{DiscoverySet, Document};
use loctext::ipc::peer;
use loctext::logging::init_logging;

const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to scan
    context_path: PathBuf,

    /// Endpoint address to deliver the document to
    endpoint: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let text = scan(&args.context_path)?;
    info!(texts = text.len(), "scan finished");

    let document = Document::new(text);
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(peer::deliver(&args.endpoint, &document))
}

fn scan(context_path: &Path) -> Result<DiscoverySet> {
    if !context_path.is_dir() {
        anyhow::bail!("Context path is not a directory: {}", context_path.display());
    }

    let pattern = call_pattern()?;
    let mut found = DiscoverySet::new();

    let walker = WalkDir::new(context_path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));
    for entry in walker {
        let entry = entry.context("Failed to walk context directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Binary and non-UTF-8 files have nothing to offer.
        let Ok(source) = fs::read_to_string(entry.path()) else {
            debug!(path = %entry.path().display(), "skipping unreadable file");
            continue;
        };
        found.extend(extract_calls(&pattern, &source));
    }

    Ok(found)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()))
}

fn call_pattern() -> Result<Regex> {
    Regex::new(r#"\b(?:tr|localize)\(\s*"((?:[^"\\]|\\.)*)"\s*[,)]"#)
        .context("Failed to compile call pattern")
}

fn extract_calls(pattern: &Regex, source: &str) -> Vec<String> {
    pattern
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape(m.as_str()))
        .filter(|text| !text.trim().is_empty())
        .collect()
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
