//! Conversion from the PEP 621 (`[project]`) layout to the Poetry layout.
//!
//! - `project.dependencies` -> `tool.poetry.dependencies`
//! - `project.optional-dependencies.<group>` -> `tool.poetry.group.<group>.dependencies`
//! - `project.requires-python` -> `tool.poetry.dependencies.python`
//! - `tool.setuptools.packages` -> `tool.poetry.packages`

use rustc_hash::FxHashSet;
use toml::{Table, Value};
use tracing::debug;

use crate::pyproject::constraint::pep440_to_poetry;
use crate::pyproject::error::ConvertError;
use crate::pyproject::metadata::{
    build_system, format_contact, license_to_poetry, setuptools_packages_to_poetry,
    split_project_urls,
};
use crate::pyproject::model::{Contact, PipProject, section};
use crate::pyproject::options::ConvertOptions;
use crate::pyproject::specifier::{Requirement, UNCONSTRAINED, normalize_name};

/// Convert a pip-style document into a Poetry-style document.
///
/// Top-level tables other than `[project]` and `[build-system]`, and
/// `[tool.*]` tables other than `[tool.setuptools]`, are carried over.
/// `[build-system]` is replaced with the poetry-core backend.
pub fn pip_to_poetry(document: &Table, options: &ConvertOptions) -> Result<Table, ConvertError> {
    let project_table =
        section(document, &["project"])?.ok_or(ConvertError::MissingTable("project"))?;
    let project = PipProject::from_table(project_table, "project")?;
    debug!(
        "Converting `{}` ({} dependencies, {} optional groups) to Poetry",
        project.name,
        project.dependencies.len(),
        project.optional_dependencies.len()
    );

    // Start from any existing `[tool.poetry]` so keys only Poetry knows survive.
    let mut poetry = section(document, &["tool", "poetry"])?
        .cloned()
        .unwrap_or_default();
    poetry.remove("group");
    poetry.remove("dev-dependencies");

    for (key, value) in &project.extra {
        debug!("Passing `project.{key}` through unchanged");
        poetry.insert(key.clone(), value.clone());
    }

    poetry.insert("name".to_owned(), Value::String(project.name.clone()));
    if let Some(version) = &project.version {
        poetry.insert("version".to_owned(), Value::String(version.clone()));
    }
    if let Some(description) = &project.description {
        poetry.insert("description".to_owned(), Value::String(description.clone()));
    }
    insert_contacts(&mut poetry, "authors", &project.authors);
    insert_contacts(&mut poetry, "maintainers", &project.maintainers);
    if let Some(license) = &project.license {
        poetry.insert("license".to_owned(), license_to_poetry(license));
    }

    let (url_fields, urls) = split_project_urls(&project.urls);
    for (field, url) in url_fields {
        poetry.insert(field.to_owned(), Value::String(url));
    }
    if !urls.is_empty() {
        let urls = urls
            .into_iter()
            .map(|(label, url)| (label, Value::String(url)))
            .collect();
        poetry.insert("urls".to_owned(), Value::Table(urls));
    }

    let mut dependencies = Table::new();
    let python = project
        .requires_python
        .as_ref()
        .or(options.python.as_ref());
    if let Some(python) = python {
        dependencies.insert(
            "python".to_owned(),
            Value::String(poetry_constraint(python, options)),
        );
    }
    insert_requirements(
        &mut dependencies,
        &project.dependencies,
        "project.dependencies",
        options,
    )?;
    poetry.insert("dependencies".to_owned(), Value::Table(dependencies));

    if !project.optional_dependencies.is_empty() {
        let mut groups = Table::new();
        for (group, specifiers) in &project.optional_dependencies {
            let mut dependencies = Table::new();
            insert_requirements(
                &mut dependencies,
                specifiers,
                &format!("project.optional-dependencies.{group}"),
                options,
            )?;
            let mut group_table = Table::new();
            group_table.insert("dependencies".to_owned(), Value::Table(dependencies));
            groups.insert(group.clone(), Value::Table(group_table));
        }
        poetry.insert("group".to_owned(), Value::Table(groups));
    }

    if let Some(setuptools) = section(document, &["tool", "setuptools"])? {
        let packages = setuptools_packages_to_poetry(setuptools, &project.name);
        if !packages.is_empty() {
            poetry.insert("packages".to_owned(), Value::Array(packages));
        }
        for key in setuptools.keys().filter(|key| *key != "packages") {
            debug!("Dropping `tool.setuptools.{key}`");
        }
    }

    let mut tool = section(document, &["tool"])?.cloned().unwrap_or_default();
    tool.remove("setuptools");
    tool.insert("poetry".to_owned(), Value::Table(poetry));

    let mut output = document.clone();
    output.remove("project");
    output.insert("tool".to_owned(), Value::Table(tool));
    output.insert(
        "build-system".to_owned(),
        build_system(&["poetry-core"], "poetry.core.masonry.api"),
    );
    Ok(output)
}

/// Decode `specifiers` into `dependencies`, rejecting repeated package names.
///
/// Names already present in `dependencies` count as taken.
fn insert_requirements(
    dependencies: &mut Table,
    specifiers: &[String],
    field: &str,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let mut seen: FxHashSet<String> = dependencies
        .keys()
        .map(|name| normalize_name(name))
        .collect();

    for specifier in specifiers {
        let requirement = Requirement::parse(specifier)?;
        if !seen.insert(requirement.normalized_name()) {
            return Err(ConvertError::DuplicateDependency {
                name: requirement.name,
                group: field.to_owned(),
            });
        }
        let value = requirement_to_poetry(&requirement, options);
        dependencies.insert(requirement.name, value);
    }
    Ok(())
}

/// A bare constraint string for simple requirements, a detailed table otherwise.
fn requirement_to_poetry(requirement: &Requirement, options: &ConvertOptions) -> Value {
    let version = poetry_constraint(&requirement.constraint, options);
    if requirement.is_simple() {
        return Value::String(version);
    }

    let mut detail = Table::new();
    match &requirement.url {
        Some(url) => {
            let (url, subdirectory) = split_subdirectory(url);
            if let Some(repository) = url.strip_prefix("git+") {
                let (repository, revision) = split_git_revision(repository);
                detail.insert("git".to_owned(), Value::String(repository.to_owned()));
                if let Some(revision) = revision {
                    detail.insert("rev".to_owned(), Value::String(revision.to_owned()));
                }
            } else {
                detail.insert("url".to_owned(), Value::String(url.to_owned()));
            }
            if let Some(subdirectory) = subdirectory {
                detail.insert(
                    "subdirectory".to_owned(),
                    Value::String(subdirectory.to_owned()),
                );
            }
        }
        None => {
            detail.insert("version".to_owned(), Value::String(version));
        }
    }
    if !requirement.extras.is_empty() {
        let extras = requirement
            .extras
            .iter()
            .map(|extra| Value::String(extra.clone()))
            .collect();
        detail.insert("extras".to_owned(), Value::Array(extras));
    }
    if let Some(marker) = &requirement.marker {
        detail.insert("markers".to_owned(), Value::String(marker.clone()));
    }
    Value::Table(detail)
}

fn poetry_constraint(constraint: &str, options: &ConvertOptions) -> String {
    let constraint = constraint.trim();
    if options.translate_constraints {
        pep440_to_poetry(constraint)
    } else if constraint.is_empty() {
        UNCONSTRAINED.to_owned()
    } else {
        constraint.to_owned()
    }
}

/// Split off a `#subdirectory=<dir>` fragment.
///
/// Any other fragment is left on the URL.
fn split_subdirectory(url: &str) -> (&str, Option<&str>) {
    match url.split_once("#subdirectory=") {
        Some((url, subdirectory)) if !subdirectory.is_empty() && !subdirectory.contains('&') => {
            (url, Some(subdirectory))
        }
        _ => (url, None),
    }
}

/// Split `https://host/repo.git@v1.0` into the repository and its revision.
///
/// Only an `@` in the last path segment marks a revision; earlier ones
/// belong to credentials (`ssh://git@host/...`).
fn split_git_revision(url: &str) -> (&str, Option<&str>) {
    let segment_start = url.rfind('/').map_or(0, |slash| slash + 1);
    match url[segment_start..].rfind('@') {
        Some(offset) => {
            let at = segment_start + offset;
            (&url[..at], Some(&url[at + 1..]))
        }
        None => (url, None),
    }
}

fn insert_contacts(poetry: &mut Table, key: &str, contacts: &[Contact]) {
    let contacts: Vec<Value> = contacts
        .iter()
        .filter_map(format_contact)
        .map(Value::String)
        .collect();
    if !contacts.is_empty() {
        poetry.insert(key.to_owned(), Value::Array(contacts));
    }
}
