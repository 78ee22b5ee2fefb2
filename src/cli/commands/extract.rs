use anyhow::Result;
use colored::Colorize;

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::super::report;
use super::super::run::block_on;
use super::project_config;
use crate::config::CONFIG_FILE_NAME;
use crate::core::Entry;
use crate::extractor::{Extractor, RunOptions};
use crate::sources::sources_from_config;

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let loaded = project_config(&cmd.common)?;
    if !loaded.from_file {
        eprintln!(
            "{} no {} found, using defaults",
            "warning:".bold().yellow(),
            CONFIG_FILE_NAME
        );
    }

    let config = &loaded.config;
    let sources = sources_from_config(config, &loaded.root, !cmd.no_scanner);
    let entries = config
        .entry_paths(&loaded.root)
        .into_iter()
        .map(Entry::new)
        .collect();

    let mut extractor = Extractor::new(sources, entries)?;
    if cmd.common.verbose {
        extractor = extractor.with_observer(report::print_phase);
    }

    let options = RunOptions {
        dry_run: cmd.dry_run || cmd.check,
    };
    let run_report = block_on(extractor.run(options))??;
    report::print_extract(&run_report);

    if cmd.check && run_report.changed() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
