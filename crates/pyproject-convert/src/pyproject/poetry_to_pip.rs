//! Conversion from the Poetry (`[tool.poetry]`) layout to the PEP 621 layout.
//!
//! The structural inverse of [`crate::pyproject::pip_to_poetry`]. Poetry
//! dependency tables have no defined order, so dependencies are emitted in
//! sorted name order.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::pyproject::constraint::poetry_to_pep440;
use crate::pyproject::error::ConvertError;
use crate::pyproject::metadata::{
    build_system, contact_to_value, join_project_urls, parse_contact,
    poetry_packages_to_setuptools,
};
use crate::pyproject::model::{PoetryDependency, PoetryProject, section};
use crate::pyproject::options::ConvertOptions;
use crate::pyproject::specifier::{Requirement, is_unconstrained, is_valid_name, normalize_name};

/// `[tool.poetry]` keys with no PEP 621 counterpart.
///
/// They stay in a residual `[tool.poetry]` table instead of moving to
/// `[project]`.
const POETRY_ONLY_KEYS: &[&str] = &[
    "source",
    "extras",
    "plugins",
    "build",
    "include",
    "exclude",
    "package-mode",
    "requires-poetry",
];

/// Dependencies collected for one output list, with the names already used.
#[derive(Default)]
struct DependencyList {
    specifiers: Vec<Value>,
    seen: FxHashSet<String>,
}

impl DependencyList {
    fn push(
        &mut self,
        name: &str,
        dependency: &PoetryDependency,
        field: &str,
        options: &ConvertOptions,
    ) -> Result<(), ConvertError> {
        if !self.seen.insert(normalize_name(name)) {
            return Err(ConvertError::DuplicateDependency {
                name: name.to_owned(),
                group: field.to_owned(),
            });
        }
        let requirement = poetry_requirement(name, dependency, field, options)?;
        self.specifiers.push(Value::String(requirement.to_string()));
        Ok(())
    }
}

/// Convert a Poetry-style document into a pip-style document.
///
/// Top-level tables other than `[build-system]`, and `[tool.*]` tables
/// other than `[tool.poetry]`, are carried over. `[build-system]` is
/// replaced with the setuptools backend.
pub fn poetry_to_pip(document: &Table, options: &ConvertOptions) -> Result<Table, ConvertError> {
    let poetry_table = section(document, &["tool", "poetry"])?
        .ok_or(ConvertError::MissingTable("tool.poetry"))?;
    let poetry = PoetryProject::from_table(poetry_table, "tool.poetry")?;
    debug!(
        "Converting `{}` ({} dependencies, {} groups) to PEP 621",
        poetry.name,
        poetry.dependencies.len(),
        poetry.group.len()
    );

    let mut project = Table::new();
    let mut residual = Table::new();
    for (key, value) in &poetry.extra {
        if POETRY_ONLY_KEYS.contains(&key.as_str()) {
            debug!("Keeping `tool.poetry.{key}` in `[tool.poetry]`");
            residual.insert(key.clone(), value.clone());
        } else {
            debug!("Passing `tool.poetry.{key}` through unchanged");
            project.insert(key.clone(), value.clone());
        }
    }

    project.insert("name".to_owned(), Value::String(poetry.name.clone()));
    if let Some(version) = &poetry.version {
        project.insert("version".to_owned(), Value::String(version.clone()));
    }
    if let Some(description) = &poetry.description {
        project.insert("description".to_owned(), Value::String(description.clone()));
    }
    insert_contacts(&mut project, "authors", &poetry.authors);
    insert_contacts(&mut project, "maintainers", &poetry.maintainers);
    if let Some(license) = &poetry.license {
        project.insert("license".to_owned(), Value::String(license.clone()));
    }

    let urls = join_project_urls(
        poetry.homepage.as_deref(),
        poetry.repository.as_deref(),
        poetry.documentation.as_deref(),
        &poetry.urls,
    );
    if !urls.is_empty() {
        let urls = urls
            .into_iter()
            .map(|(label, url)| (label, Value::String(url)))
            .collect();
        project.insert("urls".to_owned(), Value::Table(urls));
    }

    let mut requires_python = None;
    let mut dependencies = DependencyList::default();
    for (name, dependency) in &poetry.dependencies {
        if name.eq_ignore_ascii_case("python") {
            requires_python = python_constraint(dependency, options);
            continue;
        }
        dependencies.push(name, dependency, "tool.poetry.dependencies", options)?;
    }
    if let Some(python) = requires_python.or_else(|| options.python.clone()) {
        project.insert("requires-python".to_owned(), Value::String(python));
    }
    project.insert(
        "dependencies".to_owned(),
        Value::Array(dependencies.specifiers),
    );

    let mut groups: BTreeMap<&str, DependencyList> = BTreeMap::new();
    for (group_name, group) in &poetry.group {
        if group.optional {
            debug!("Group `{group_name}` is optional; PEP 621 extras always are");
        }
        let field = format!("tool.poetry.group.{group_name}.dependencies");
        let list = groups.entry(group_name.as_str()).or_default();
        for (name, dependency) in &group.dependencies {
            list.push(name, dependency, &field, options)?;
        }
    }
    if !poetry.dev_dependencies.is_empty() {
        let list = groups.entry("dev").or_default();
        for (name, dependency) in &poetry.dev_dependencies {
            list.push(name, dependency, "tool.poetry.dev-dependencies", options)?;
        }
    }
    if !groups.is_empty() {
        let optional = groups
            .into_iter()
            .map(|(group, list)| (group.to_owned(), Value::Array(list.specifiers)))
            .collect();
        project.insert("optional-dependencies".to_owned(), Value::Table(optional));
    }

    let mut tool = section(document, &["tool"])?.cloned().unwrap_or_default();
    tool.remove("poetry");
    if !residual.is_empty() {
        tool.insert("poetry".to_owned(), Value::Table(residual));
    }
    if let Some(packages) = poetry_packages_to_setuptools(&poetry.packages) {
        let mut setuptools = section(document, &["tool", "setuptools"])?
            .cloned()
            .unwrap_or_default();
        setuptools.insert("packages".to_owned(), packages);
        tool.insert("setuptools".to_owned(), Value::Table(setuptools));
    }

    let mut output = document.clone();
    if output.contains_key("project") {
        warn!("Replacing the existing `[project]` table");
    }
    if tool.is_empty() {
        output.remove("tool");
    } else {
        output.insert("tool".to_owned(), Value::Table(tool));
    }
    output.insert("project".to_owned(), Value::Table(project));
    output.insert(
        "build-system".to_owned(),
        build_system(&["setuptools", "wheel"], "setuptools.build_meta"),
    );
    Ok(output)
}

/// Build the PEP 508 requirement for one Poetry dependency entry.
fn poetry_requirement(
    name: &str,
    dependency: &PoetryDependency,
    field: &str,
    options: &ConvertOptions,
) -> Result<Requirement, ConvertError> {
    if !is_valid_name(name) {
        return Err(ConvertError::SpecifierFormat {
            specifier: name.to_owned(),
            reason: "invalid package name",
        });
    }
    let mut requirement = Requirement::new(name);

    let detail = match dependency {
        PoetryDependency::Simple(constraint) => {
            requirement.constraint = pip_constraint(constraint, options);
            return Ok(requirement);
        }
        PoetryDependency::Detailed(detail) => detail,
    };

    requirement.extras.clone_from(&detail.extras);
    requirement.marker.clone_from(&detail.markers);

    if let Some(git) = &detail.git {
        let revision = detail
            .rev
            .as_ref()
            .or(detail.tag.as_ref())
            .or(detail.branch.as_ref());
        let url = match revision {
            Some(revision) => format!("git+{git}@{revision}"),
            None => format!("git+{git}"),
        };
        requirement.url = Some(with_subdirectory(url, detail.subdirectory.as_deref()));
    } else if let Some(url) = &detail.url {
        requirement.url = Some(with_subdirectory(url.clone(), detail.subdirectory.as_deref()));
    } else if detail.path.is_some() {
        return Err(ConvertError::schema(
            format!("{field}.{name}.path"),
            "path dependencies have no PEP 508 equivalent",
        ));
    } else if let Some(version) = &detail.version {
        requirement.constraint = pip_constraint(version, options);
    }

    if detail.python.is_some() {
        warn!("`{field}.{name}.python` has no PEP 508 equivalent; dropping it");
    }
    if detail.subdirectory.is_some() && requirement.url.is_none() {
        warn!("`{field}.{name}.subdirectory` needs a `git` or `url` source; dropping it");
    }
    for key in detail.extra.keys() {
        warn!("`{field}.{name}.{key}` has no PEP 508 equivalent; dropping it");
    }
    if detail.optional {
        debug!("`{field}.{name}` is marked optional; Poetry extras are not converted");
    }
    Ok(requirement)
}

/// Append a `#subdirectory=` fragment, as pip expects for packages inside
/// a larger repository or archive.
fn with_subdirectory(url: String, subdirectory: Option<&str>) -> String {
    match subdirectory {
        Some(subdirectory) => format!("{url}#subdirectory={subdirectory}"),
        None => url,
    }
}

/// The `requires-python` value for Poetry's `python` dependency.
fn python_constraint(dependency: &PoetryDependency, options: &ConvertOptions) -> Option<String> {
    let constraint = match dependency {
        PoetryDependency::Simple(constraint) => constraint,
        PoetryDependency::Detailed(detail) => detail.version.as_ref()?,
    };
    let constraint = pip_constraint(constraint, options);
    (!constraint.is_empty()).then_some(constraint)
}

/// A bare version is Poetry's exact pin and gets an explicit `==`, since
/// PEP 508 would read it as part of the package name.
fn pip_constraint(constraint: &str, options: &ConvertOptions) -> String {
    let constraint = constraint.trim();
    if options.translate_constraints {
        poetry_to_pep440(constraint)
    } else if is_unconstrained(constraint) {
        String::new()
    } else if constraint.starts_with(|c: char| c.is_ascii_digit()) {
        format!("=={constraint}")
    } else {
        constraint.to_owned()
    }
}

fn insert_contacts(project: &mut Table, key: &str, contacts: &[String]) {
    if contacts.is_empty() {
        return;
    }
    let contacts = contacts
        .iter()
        .map(|contact| contact_to_value(&parse_contact(contact)))
        .collect();
    project.insert(key.to_owned(), Value::Array(contacts));
}
