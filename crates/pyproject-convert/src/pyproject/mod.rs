//! Conversion between the pip (PEP 621) and Poetry `pyproject.toml` layouts.
//!
//! Both directions are pure functions from one parsed document to a fresh
//! one: [`pip_to_poetry`] and [`poetry_to_pip`]. Only [`read_document`] and
//! [`write_document`] touch the filesystem.

pub use constraint::{pep440_to_poetry, poetry_to_pep440};
pub use document::{parse_document, read_document, serialize_document, write_document};
pub use error::ConvertError;
pub use options::ConvertOptions;
pub use pip_to_poetry::pip_to_poetry;
pub use poetry_to_pip::poetry_to_pip;
pub use specifier::{
    Requirement, UNCONSTRAINED, format_specifier, is_unconstrained, normalize_name,
    parse_specifier,
};

mod constraint;
mod document;
mod error;
mod metadata;
pub mod model;
mod options;
mod pip_to_poetry;
mod poetry_to_pip;
mod specifier;
