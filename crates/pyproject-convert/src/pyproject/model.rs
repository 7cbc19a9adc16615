//! Data model types for the two `pyproject.toml` layouts.
//!
//! [`PipProject`] mirrors the PEP 621 `[project]` table and [`PoetryProject`]
//! mirrors `[tool.poetry]`. Fields the converter does not map are collected
//! in `extra` so they can be carried over unchanged.
//!
//! The two top-level tables are read key by key so that a shape error names
//! the offending key, down to a single dependency entry
//! (`tool.poetry.group.dev.dependencies.pytest`).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::pyproject::error::ConvertError;

/// Keys of `[project]` with a field in [`PipProject`].
const PIP_KEYS: &[&str] = &[
    "name",
    "version",
    "description",
    "requires-python",
    "authors",
    "maintainers",
    "license",
    "urls",
    "dependencies",
    "optional-dependencies",
];

/// The PEP 621 `[project]` table.
#[derive(Debug)]
pub struct PipProject {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Supported Python versions, e.g. `">=3.11"`.
    pub requires_python: Option<String>,
    pub authors: Vec<Contact>,
    pub maintainers: Vec<Contact>,
    /// Either an SPDX string or a `{text = ...}` / `{file = ...}` table.
    pub license: Option<Value>,
    /// Project URLs keyed by label (`Homepage`, `Repository`, ...).
    pub urls: BTreeMap<String, String>,
    /// Unconditional dependencies as PEP 508 specifier strings.
    pub dependencies: Vec<String>,
    /// Optional dependency groups.
    pub optional_dependencies: BTreeMap<String, Vec<String>>,
    /// Everything else in `[project]`.
    pub extra: Table,
}

impl PipProject {
    /// Read a `[project]` table found at `path`.
    pub(crate) fn from_table(table: &Table, path: &str) -> Result<Self, ConvertError> {
        let fields = Fields { table, path };

        let mut optional_dependencies = BTreeMap::new();
        if let Some(groups) = fields.table("optional-dependencies")? {
            let groups = Fields {
                table: groups,
                path: &fields.path("optional-dependencies"),
            };
            for group in groups.table.keys() {
                optional_dependencies.insert(group.clone(), groups.required(group)?);
            }
        }

        Ok(Self {
            name: fields.required("name")?,
            version: fields.optional("version")?,
            description: fields.optional("description")?,
            requires_python: fields.optional("requires-python")?,
            authors: fields.optional("authors")?.unwrap_or_default(),
            maintainers: fields.optional("maintainers")?.unwrap_or_default(),
            license: fields.table.get("license").cloned(),
            urls: fields.optional("urls")?.unwrap_or_default(),
            dependencies: fields.optional("dependencies")?.unwrap_or_default(),
            optional_dependencies,
            extra: fields.remaining(PIP_KEYS),
        })
    }
}

/// An entry in PEP 621 `authors` or `maintainers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Keys of `[tool.poetry]` with a field in [`PoetryProject`].
const POETRY_KEYS: &[&str] = &[
    "name",
    "version",
    "description",
    "authors",
    "maintainers",
    "license",
    "homepage",
    "repository",
    "documentation",
    "urls",
    "dependencies",
    "group",
    "dev-dependencies",
    "packages",
];

/// The `[tool.poetry]` table.
#[derive(Debug)]
pub struct PoetryProject {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Authors as `"Name <email>"` strings.
    pub authors: Vec<String>,
    pub maintainers: Vec<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    pub urls: BTreeMap<String, String>,
    /// Main dependencies, including the `python` constraint.
    pub dependencies: BTreeMap<String, PoetryDependency>,
    /// Dependency groups (`[tool.poetry.group.<name>.dependencies]`).
    pub group: BTreeMap<String, PoetryGroup>,
    /// Pre-1.2 development dependencies.
    pub dev_dependencies: BTreeMap<String, PoetryDependency>,
    /// Package discovery (`packages = [{ include = "pkg", from = "src" }]`).
    pub packages: Vec<PoetryPackageInclude>,
    /// Everything else in `[tool.poetry]`.
    pub extra: Table,
}

impl PoetryProject {
    /// Read a `[tool.poetry]` table found at `path`.
    pub(crate) fn from_table(table: &Table, path: &str) -> Result<Self, ConvertError> {
        let fields = Fields { table, path };

        let mut group = BTreeMap::new();
        if let Some(groups) = fields.table("group")? {
            let groups = Fields {
                table: groups,
                path: &fields.path("group"),
            };
            for (name, table) in groups.table {
                let path = groups.path(name);
                let Value::Table(table) = table else {
                    return Err(ConvertError::schema(path, "expected a table"));
                };
                group.insert(name.clone(), PoetryGroup::from_table(table, &path)?);
            }
        }

        Ok(Self {
            name: fields.required("name")?,
            version: fields.optional("version")?,
            description: fields.optional("description")?,
            authors: fields.optional("authors")?.unwrap_or_default(),
            maintainers: fields.optional("maintainers")?.unwrap_or_default(),
            license: fields.optional("license")?,
            homepage: fields.optional("homepage")?,
            repository: fields.optional("repository")?,
            documentation: fields.optional("documentation")?,
            urls: fields.optional("urls")?.unwrap_or_default(),
            dependencies: fields.dependencies("dependencies")?,
            group,
            dev_dependencies: fields.dependencies("dev-dependencies")?,
            packages: fields.optional("packages")?.unwrap_or_default(),
            extra: fields.remaining(POETRY_KEYS),
        })
    }
}

/// A `[tool.poetry.group.<name>]` table.
#[derive(Debug, Default)]
pub struct PoetryGroup {
    pub optional: bool,
    pub dependencies: BTreeMap<String, PoetryDependency>,
}

impl PoetryGroup {
    fn from_table(table: &Table, path: &str) -> Result<Self, ConvertError> {
        let fields = Fields { table, path };
        Ok(Self {
            optional: fields.optional("optional")?.unwrap_or_default(),
            dependencies: fields.dependencies("dependencies")?,
        })
    }
}

/// A dependency in a Poetry dependency table.
///
/// Either a bare constraint string (`requests = ">=2.0"`) or a table with
/// extended fields (`requests = { version = ">=2.0", extras = ["socks"] }`).
#[derive(Debug)]
pub enum PoetryDependency {
    /// Bare constraint: `requests = "*"` or `requests = "^2.31"`.
    Simple(String),

    /// Table with extended fields.
    Detailed(PoetryDependencyDetail),
}

impl PoetryDependency {
    fn from_value(value: &Value, path: &str) -> Result<Self, ConvertError> {
        match value {
            Value::String(constraint) => Ok(Self::Simple(constraint.clone())),
            Value::Table(_) => deserialize(value, path).map(Self::Detailed),
            // `foo = [{ version = "<2", python = "<3.8" }, { version = "^2", python = ">=3.8" }]`
            Value::Array(_) => Err(ConvertError::schema(
                path,
                "multiple-constraint dependencies are not supported; \
                 use a single constraint with `markers` instead",
            )),
            other => Err(ConvertError::schema(
                path,
                format!(
                    "expected a version string or a table, found {}",
                    other.type_str()
                ),
            )),
        }
    }
}

/// Extended Poetry dependency fields.
#[derive(Debug, Default, Deserialize)]
pub struct PoetryDependencyDetail {
    pub version: Option<String>,

    #[serde(default)]
    pub extras: Vec<String>,

    /// PEP 508 environment markers.
    pub markers: Option<String>,

    /// Restricts the dependency to some Python versions.
    pub python: Option<String>,

    #[serde(default)]
    pub optional: bool,

    pub git: Option<String>,

    pub rev: Option<String>,

    pub tag: Option<String>,

    pub branch: Option<String>,

    /// Directory inside a `git` or `url` archive holding the package.
    pub subdirectory: Option<String>,

    pub url: Option<String>,

    pub path: Option<String>,

    /// Keys with no PEP 508 counterpart (`source`, `develop`, ...).
    #[serde(flatten)]
    pub extra: Table,
}

/// An entry in `[tool.poetry] packages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoetryPackageInclude {
    pub include: String,

    pub from: Option<String>,
}

/// Typed access to the keys of one table, naming `path.key` in errors.
struct Fields<'a> {
    table: &'a Table,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConvertError> {
        self.table
            .get(key)
            .map(|value| deserialize(value, &self.path(key)))
            .transpose()
    }

    fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConvertError> {
        self.optional(key)?
            .ok_or_else(|| ConvertError::schema(self.path(key), "missing required field"))
    }

    fn table(&self, key: &str) -> Result<Option<&'a Table>, ConvertError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Table(table)) => Ok(Some(table)),
            Some(_) => Err(ConvertError::schema(self.path(key), "expected a table")),
        }
    }

    /// A Poetry dependency table, read one entry at a time.
    fn dependencies(
        &self,
        key: &str,
    ) -> Result<BTreeMap<String, PoetryDependency>, ConvertError> {
        let Some(table) = self.table(key)? else {
            return Ok(BTreeMap::new());
        };
        let path = self.path(key);
        table
            .iter()
            .map(|(name, value)| {
                let dependency = PoetryDependency::from_value(value, &format!("{path}.{name}"))?;
                Ok((name.clone(), dependency))
            })
            .collect()
    }

    /// The keys not named in `known`, in their original order.
    fn remaining(&self, known: &[&str]) -> Table {
        self.table
            .iter()
            .filter(|(key, _)| !known.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn deserialize<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T, ConvertError> {
    value
        .clone()
        .try_into()
        .map_err(|err: toml::de::Error| ConvertError::schema(path, err.message()))
}

/// Look up the table at `path`, e.g. `["tool", "poetry"]`.
///
/// Returns `None` when any segment is absent and a schema error when a
/// segment exists but is not a table.
pub(crate) fn section<'a>(
    document: &'a Table,
    path: &[&str],
) -> Result<Option<&'a Table>, ConvertError> {
    let mut current = document;
    for (depth, key) in path.iter().enumerate() {
        match current.get(*key) {
            None => return Ok(None),
            Some(Value::Table(table)) => current = table,
            Some(_) => {
                return Err(ConvertError::schema(
                    path[..=depth].join("."),
                    "expected a table",
                ));
            }
        }
    }
    Ok(Some(current))
}
