//! CLI argument definitions for pyproject-convert.
//!
//! All clap derive structs live here. [`Cli`] is the multi-command parser
//! used by `pyproject-convert`; [`ConvertCli`] is the single-direction parser
//! behind the `pip-to-poetry` and `poetry-to-pip` binaries.

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};

use crate::pyproject::ConvertOptions;

/// Clap v3-style help menu colors.
pub(crate) const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Convert pyproject.toml files between pip and Poetry layouts.
#[derive(Parser, Debug)]
#[command(
    name = "pyproject-convert",
    author,
    version,
    about = "Convert pyproject.toml files between pip and Poetry layouts.",
    styles = STYLES,
    after_help = "Use `pyproject-convert help <command>` for more information on a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// A single conversion direction as a standalone binary.
///
/// The binary name and description are filled in at runtime.
#[derive(Parser, Debug)]
#[command(version, styles = STYLES)]
pub struct ConvertCli {
    #[command(flatten)]
    pub args: ConvertArgs,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Top-level subcommands for pyproject-convert.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a PEP 621 `[project]` table to `[tool.poetry]`.
    PipToPoetry(ConvertArgs),

    /// Convert a `[tool.poetry]` table to a PEP 621 `[project]` table.
    PoetryToPip(ConvertArgs),
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Copy)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(global = true, short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for a conversion.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// The `pyproject.toml` file to read.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the converted file.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Rewrite version constraints into the target tool's syntax.
    ///
    /// Poetry's `^` and `~` ranges become PEP 440 ranges and back. Without
    /// this flag, constraints are copied verbatim.
    #[arg(long)]
    pub translate_constraints: bool,

    /// Python constraint to record when the input declares none.
    #[arg(long, value_name = "CONSTRAINT")]
    pub python: Option<String>,
}

impl ConvertArgs {
    /// The conversion settings selected by these flags.
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            translate_constraints: self.translate_constraints,
            python: self.python.clone(),
        }
    }
}
