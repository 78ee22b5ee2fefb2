//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Run one extraction pass and reconcile every entry
//! - `lookup`: Print the translation of one key in one entry
//! - `init`: Initialize a `.loctextrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Lookup(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by project commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to search for the config file from (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would change without writing any entry
    #[arg(long)]
    pub dry_run: bool,

    /// Like --dry-run, but exit with status 1 if any entry would change
    #[arg(long)]
    pub check: bool,

    /// Skip the out-of-process scanner even if one is configured
    #[arg(long)]
    pub no_scanner: bool,
}

#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Entry title, e.g. `fr` for `locales/fr.json` (case-insensitive)
    pub entry: String,

    /// Key to look up (case-insensitive)
    pub key: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect text from every source and reconcile it into the entries
    Extract(ExtractCommand),
    /// Print the value of a key in one entry
    Lookup(LookupCommand),
    /// Initialize a new .loctextrc.json configuration file
    Init,
}
