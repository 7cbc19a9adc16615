//! pyproject-convert: convert `pyproject.toml` between pip and Poetry layouts.
//!
//! The conversion itself lives in [`pyproject`] and works on parsed TOML
//! tables. This crate root provides the entry points for the
//! `pyproject-convert`, `pip-to-poetry` and `poetry-to-pip` binaries: argument
//! parsing, logging setup, and error reporting.

#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::cli::{Cli, ConvertCli, GlobalArgs};
use crate::commands::{Direction, ExitStatus};
use crate::printer::Printer;
use crate::pyproject::ConvertError;

pub mod cli;
pub mod commands;
mod logging;
pub mod printer;
pub mod pyproject;

/// Entry point for the `pyproject-convert` binary.
pub fn main<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let printer = init_output(cli.global);
    finish(printer, commands::dispatch(cli.command, printer))
}

/// Entry point for the single-direction binaries.
///
/// Takes the same flags as the matching `pyproject-convert` subcommand.
pub fn convert_main<I, T>(direction: Direction, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let parsed = ConvertCli::command()
        .name(direction.name())
        .about(direction.about())
        .try_get_matches_from(args)
        .and_then(|matches| ConvertCli::from_arg_matches(&matches));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let printer = init_output(cli.global);
    finish(printer, commands::convert(direction, &cli.args, printer))
}

fn init_output(global: GlobalArgs) -> Printer {
    let printer = Printer::new(global.verbose, global.quiet);
    logging::setup_logging(printer);
    printer
}

/// Report the outcome of a command and map it to a process exit code.
///
/// Errors caused by the input document exit with [`ExitStatus::Failure`];
/// anything else, such as an unreadable file, with [`ExitStatus::Error`].
fn finish(printer: Printer, result: Result<ExitStatus>) -> ExitCode {
    match result {
        Ok(status) => status.into(),
        Err(err) => {
            let mut causes = err.chain();
            if let Some(error) = causes.next() {
                printer.error(&error.to_string());
            }
            for cause in causes {
                printer.cause(&cause.to_string());
            }

            if err.chain().any(|cause| cause.is::<ConvertError>()) {
                ExitStatus::Failure.into()
            } else {
                ExitStatus::Error.into()
            }
        }
    }
}
