//! Reading and writing `pyproject.toml` documents.
//!
//! The converters only see parsed [`Table`]s; this module is the boundary to
//! TOML text and the filesystem.

use std::path::Path;

use anyhow::{Context, Result};
use toml::Table;
use tracing::debug;

use crate::pyproject::error::ConvertError;

/// Parse TOML source text into a document table.
pub fn parse_document(source: &str) -> Result<Table, ConvertError> {
    toml::from_str(source).map_err(ConvertError::Parse)
}

/// Render a document table as TOML text.
///
/// Arrays are laid out one element per line.
pub fn serialize_document(document: &Table) -> Result<String, ConvertError> {
    toml::to_string_pretty(document).map_err(ConvertError::Serialize)
}

/// Read and parse the document at `path`.
pub fn read_document(path: &Path) -> Result<Table> {
    debug!("Reading `{}`", path.display());
    let source = fs_err::read_to_string(path)?;
    let document = parse_document(&source)?;
    Ok(document)
}

/// Serialize `document` and write it to `path`.
///
/// The document is fully rendered before the file is touched.
pub fn write_document(path: &Path, document: &Table) -> Result<()> {
    let content = serialize_document(document)?;
    debug!("Writing {} bytes to `{}`", content.len(), path.display());
    fs_err::write(path, content)
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    Ok(())
}
