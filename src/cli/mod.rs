use anyhow::Result;

use crate::logging::init_logging;

mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use report::{FAILURE_MARK, SUCCESS_MARK, print_extract_to};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    init_logging(args.verbose());

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
