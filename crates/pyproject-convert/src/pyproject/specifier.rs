//! Dependency specifier codec.
//!
//! Converts between the flat PEP 508 string form used by pip
//! (`requests[security]>=2.0; python_version < "3.12"`) and the structured
//! [`Requirement`] form the mappers work with. This is the only place that
//! looks inside a specifier string.

use std::fmt;

use crate::pyproject::error::ConvertError;

/// Constraint Poetry uses for an unconstrained dependency.
pub const UNCONSTRAINED: &str = "*";

/// A dependency split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Package name, as written.
    pub name: String,
    /// Extras requested with the package (`requests[security]`).
    pub extras: Vec<String>,
    /// Version constraint, e.g. `>=2.0,<3`. Empty when unconstrained.
    pub constraint: String,
    /// Direct reference (`name @ url`).
    pub url: Option<String>,
    /// PEP 508 environment marker.
    pub marker: Option<String>,
}

impl Requirement {
    /// Create an unconstrained requirement on `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a specifier string.
    ///
    /// The package name ends at the first character that cannot appear in a
    /// name; everything after it belongs to the extras, constraint, URL or
    /// marker. A URL runs to the first whitespace, so a `;` inside it is not
    /// a marker separator.
    pub fn parse(specifier: &str) -> Result<Self, ConvertError> {
        let trimmed = specifier.trim();
        if trimmed.is_empty() {
            return Err(ConvertError::specifier(specifier, "specifier is empty"));
        }

        let name_end = trimmed
            .find(|c: char| !is_name_char(c))
            .unwrap_or(trimmed.len());
        let name = &trimmed[..name_end];
        if name.is_empty() {
            return Err(ConvertError::specifier(specifier, "missing package name"));
        }
        let mut rest = trimmed[name_end..].trim_start();

        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let Some((inner, after)) = after_bracket.split_once(']') else {
                return Err(ConvertError::specifier(specifier, "unterminated extras"));
            };
            extras = inner
                .split(',')
                .map(str::trim)
                .filter(|extra| !extra.is_empty())
                .map(str::to_owned)
                .collect();
            rest = after.trim_start();
        }

        if let Some(reference) = rest.strip_prefix('@') {
            let reference = reference.trim_start();
            let (url, tail) = reference
                .split_once(char::is_whitespace)
                .map_or((reference, ""), |(url, tail)| (url, tail.trim_start()));
            if url.is_empty() {
                return Err(ConvertError::specifier(specifier, "direct reference is empty"));
            }
            let marker = if tail.is_empty() {
                None
            } else if let Some(marker) = tail.strip_prefix(';') {
                Some(parse_marker(specifier, marker)?)
            } else {
                return Err(ConvertError::specifier(
                    specifier,
                    "unexpected text after direct reference",
                ));
            };
            return Ok(Self {
                name: name.to_owned(),
                extras,
                constraint: String::new(),
                url: Some(url.to_owned()),
                marker,
            });
        }

        let (rest, marker) = match rest.split_once(';') {
            Some((rest, marker)) => (rest.trim_end(), Some(parse_marker(specifier, marker)?)),
            None => (rest, None),
        };

        let constraint = match rest.strip_prefix('(') {
            Some(inner) => inner
                .strip_suffix(')')
                .ok_or_else(|| ConvertError::specifier(specifier, "unbalanced parentheses"))?
                .trim(),
            None => rest,
        };
        if !constraint.is_empty() && !constraint.starts_with(is_operator_char) {
            return Err(ConvertError::specifier(
                specifier,
                "version constraint must start with an operator",
            ));
        }

        Ok(Self {
            name: name.to_owned(),
            extras,
            constraint: constraint.to_owned(),
            url: None,
            marker,
        })
    }

    /// Whether the requirement is only a name and a constraint.
    pub fn is_simple(&self) -> bool {
        self.extras.is_empty() && self.url.is_none() && self.marker.is_none()
    }

    /// The PEP 503 normalized package name.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }

        if let Some(url) = &self.url {
            write!(f, " @ {url}")?;
            // PEP 508 requires whitespace between a URL and its marker.
            if let Some(marker) = &self.marker {
                write!(f, " ; {marker}")?;
            }
            return Ok(());
        }

        if !is_unconstrained(&self.constraint) {
            f.write_str(&self.constraint)?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}

/// Split a specifier into its bare package name and the fragment after it.
///
/// The fragment is the rest of the (trimmed) string exactly as written, so
/// [`format_specifier`] puts it back together unchanged.
///
/// Examples: `"requests>=2.0"` -> `("requests", ">=2.0")`,
///           `"flask"` -> `("flask", "")`.
pub fn parse_specifier(specifier: &str) -> Result<(String, String), ConvertError> {
    let requirement = Requirement::parse(specifier)?;
    let rest = &specifier.trim()[requirement.name.len()..];
    Ok((requirement.name, rest.to_owned()))
}

/// Join a package name and a constraint into a specifier string.
pub fn format_specifier(name: &str, constraint: &str) -> String {
    if is_unconstrained(constraint) {
        name.to_owned()
    } else {
        format!("{name}{constraint}")
    }
}

/// Whether `constraint` places no restriction on the version.
pub fn is_unconstrained(constraint: &str) -> bool {
    let constraint = constraint.trim();
    constraint.is_empty() || constraint == UNCONSTRAINED
}

/// Normalize a package name per PEP 503.
///
/// Lowercase, with runs of `-`, `_` and `.` collapsed to a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
                in_separator = true;
            }
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Whether `name` can stand alone as a package name in a specifier.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

fn parse_marker(specifier: &str, marker: &str) -> Result<String, ConvertError> {
    let marker = marker.trim();
    if marker.is_empty() {
        return Err(ConvertError::specifier(
            specifier,
            "environment marker is empty",
        ));
    }
    Ok(marker.to_owned())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!' | '~' | '^')
}
