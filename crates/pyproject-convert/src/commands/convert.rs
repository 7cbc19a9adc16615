use anyhow::{Context, Result};
use toml::Table;
use tracing::debug;

use crate::cli::ConvertArgs;
use crate::commands::ExitStatus;
use crate::printer::Printer;
use crate::pyproject::{
    ConvertError, ConvertOptions, pip_to_poetry, poetry_to_pip, read_document, write_document,
};

/// Which way a document is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    PipToPoetry,
    PoetryToPip,
}

impl Direction {
    /// The command name for this direction.
    pub fn name(self) -> &'static str {
        match self {
            Self::PipToPoetry => "pip-to-poetry",
            Self::PoetryToPip => "poetry-to-pip",
        }
    }

    /// One-line description shown in `--help`.
    pub fn about(self) -> &'static str {
        match self {
            Self::PipToPoetry => "Convert a PEP 621 `[project]` table to `[tool.poetry]`.",
            Self::PoetryToPip => "Convert a `[tool.poetry]` table to a PEP 621 `[project]` table.",
        }
    }

    fn apply(self, document: &Table, options: &ConvertOptions) -> Result<Table, ConvertError> {
        match self {
            Self::PipToPoetry => pip_to_poetry(document, options),
            Self::PoetryToPip => poetry_to_pip(document, options),
        }
    }
}

/// Convert the file at `args.input` and write the result to `args.output`.
///
/// The output file is only written once the whole conversion has succeeded.
pub fn convert(direction: Direction, args: &ConvertArgs, printer: Printer) -> Result<ExitStatus> {
    debug!(
        "Running {} on `{}`",
        direction.name(),
        args.input.display()
    );

    let document = read_document(&args.input)
        .with_context(|| format!("Failed to read `{}`", args.input.display()))?;
    let converted = direction
        .apply(&document, &args.options())
        .with_context(|| format!("Failed to convert `{}`", args.input.display()))?;
    write_document(&args.output, &converted)?;

    printer.info(&format!(
        "Successfully converted `{}` to `{}`",
        args.input.display(),
        args.output.display()
    ));
    Ok(ExitStatus::Success)
}
