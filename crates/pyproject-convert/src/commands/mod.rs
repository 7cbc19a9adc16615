//! Command dispatch for pyproject-convert.

use std::process::ExitCode;

use anyhow::Result;

pub use convert::{Direction, convert};

use crate::cli;
use crate::printer::Printer;

mod convert;

/// Exit status for pyproject-convert commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command succeeded.
    Success,

    /// The input could not be converted.
    Failure,

    /// The command failed with an unexpected error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Failure => Self::from(1),
            ExitStatus::Error => Self::from(2),
        }
    }
}

/// Dispatch a parsed CLI command to its handler.
pub fn dispatch(command: cli::Commands, printer: Printer) -> Result<ExitStatus> {
    match command {
        cli::Commands::PipToPoetry(args) => convert(Direction::PipToPoetry, &args, printer),
        cli::Commands::PoetryToPip(args) => convert(Direction::PoetryToPip, &args, printer),
    }
}
