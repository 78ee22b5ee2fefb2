use std::future::Future;

use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, init::init, lookup::lookup},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler.
///
/// # Returns
/// - `Ok(ExitStatus)` describing how the command completed
/// - `Err` if the command fails (config error, scanner failure, I/O error)
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Lookup(cmd)) => lookup(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}

/// Drive `future` to completion on a single-threaded runtime.
pub(super) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(future))
}
