use anyhow::Result;

use super::super::args::LookupCommand;
use super::super::exit_status::ExitStatus;
use super::project_config;
use crate::core::{Catalog, Entry};

/// Print the value of one key. A missing key prints the sentinel and logs a
/// warning; it is not an error.
pub fn lookup(cmd: LookupCommand) -> Result<ExitStatus> {
    let loaded = project_config(&cmd.common)?;
    let entries = loaded
        .config
        .entry_paths(&loaded.root)
        .into_iter()
        .map(Entry::new)
        .collect();

    let catalog = Catalog::load(entries)?;
    let entry = catalog.select(&cmd.entry)?;
    println!("{}", entry.text().lookup(&cmd.key));

    Ok(ExitStatus::Success)
}
