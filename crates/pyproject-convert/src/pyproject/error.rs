use thiserror::Error;

/// Errors raised while converting a `pyproject.toml` document.
///
/// Every variant aborts the conversion; no partial output is produced.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source text is not a well-formed TOML document.
    #[error("failed to parse TOML document")]
    Parse(#[source] toml::de::Error),

    /// The output table could not be rendered as TOML.
    #[error("failed to serialize TOML document")]
    Serialize(#[source] toml::ser::Error),

    /// The metadata table the conversion reads from is absent.
    #[error("missing `[{0}]` table")]
    MissingTable(&'static str),

    /// A field is missing or has the wrong shape.
    #[error("invalid `{field}`: {message}")]
    Schema { field: String, message: String },

    /// A dependency specifier could not be split into name and constraint.
    #[error("invalid dependency specifier `{specifier}`: {reason}")]
    SpecifierFormat {
        specifier: String,
        reason: &'static str,
    },

    /// The same package appears twice within one dependency group.
    #[error("duplicate dependency `{name}` in `{group}`")]
    DuplicateDependency { name: String, group: String },
}

impl ConvertError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn specifier(specifier: &str, reason: &'static str) -> Self {
        Self::SpecifierFormat {
            specifier: specifier.to_owned(),
            reason,
        }
    }
}
