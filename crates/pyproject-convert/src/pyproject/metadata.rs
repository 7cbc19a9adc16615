//! Non-dependency fields whose shape differs between the two layouts.

use std::collections::BTreeMap;

use toml::{Table, Value};
use tracing::warn;

use crate::pyproject::model::{Contact, PoetryPackageInclude};
use crate::pyproject::specifier::normalize_name;

/// Poetry's dedicated URL fields and the PEP 621 `urls` labels they map to.
const URL_FIELDS: [(&str, &str); 3] = [
    ("homepage", "Homepage"),
    ("repository", "Repository"),
    ("documentation", "Documentation"),
];

/// Render a PEP 621 contact as a Poetry `"Name <email>"` string.
pub(crate) fn format_contact(contact: &Contact) -> Option<String> {
    match (&contact.name, &contact.email) {
        (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
        (Some(name), None) => Some(name.clone()),
        (None, Some(email)) => Some(format!("<{email}>")),
        (None, None) => None,
    }
}

/// Split a Poetry `"Name <email>"` string into a PEP 621 contact.
pub(crate) fn parse_contact(author: &str) -> Contact {
    let author = author.trim();
    if let Some((name, rest)) = author.split_once('<') {
        if let Some(email) = rest.strip_suffix('>') {
            let name = name.trim();
            let email = email.trim();
            return Contact {
                name: (!name.is_empty()).then(|| name.to_owned()),
                email: (!email.is_empty()).then(|| email.to_owned()),
            };
        }
    }
    Contact {
        name: Some(author.to_owned()),
        email: None,
    }
}

pub(crate) fn contact_to_value(contact: &Contact) -> Value {
    let mut table = Table::new();
    if let Some(name) = &contact.name {
        table.insert("name".to_owned(), Value::String(name.clone()));
    }
    if let Some(email) = &contact.email {
        table.insert("email".to_owned(), Value::String(email.clone()));
    }
    Value::Table(table)
}

/// Poetry only accepts a license identifier string.
pub(crate) fn license_to_poetry(license: &Value) -> Value {
    match license {
        Value::String(_) => license.clone(),
        Value::Table(table) => match table.get("text") {
            Some(Value::String(text)) => Value::String(text.clone()),
            _ => {
                warn!("`project.license` has no text; copying it unchanged");
                license.clone()
            }
        },
        _ => license.clone(),
    }
}

/// Pull Poetry's dedicated URL fields out of PEP 621 `urls`.
///
/// Labels are matched case-insensitively; the returned map holds the labels
/// that have no dedicated field.
pub(crate) fn split_project_urls(
    urls: &BTreeMap<String, String>,
) -> (Vec<(&'static str, String)>, BTreeMap<String, String>) {
    let mut fields: Vec<(&'static str, String)> = Vec::new();
    let mut remaining = BTreeMap::new();

    for (label, url) in urls {
        let field = URL_FIELDS
            .iter()
            .map(|(field, _)| *field)
            .find(|field| label.eq_ignore_ascii_case(field));
        match field {
            Some(field) if !fields.iter().any(|(taken, _)| *taken == field) => {
                fields.push((field, url.clone()));
            }
            _ => {
                remaining.insert(label.clone(), url.clone());
            }
        }
    }

    (fields, remaining)
}

/// Fold Poetry's dedicated URL fields into PEP 621 `urls`.
pub(crate) fn join_project_urls(
    homepage: Option<&str>,
    repository: Option<&str>,
    documentation: Option<&str>,
    urls: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut joined = urls.clone();
    for ((_, label), url) in URL_FIELDS.iter().zip([homepage, repository, documentation]) {
        if let Some(url) = url {
            joined.insert((*label).to_owned(), url.to_owned());
        }
    }
    joined
}

/// Convert `[tool.setuptools] packages` into Poetry `packages` entries.
pub(crate) fn setuptools_packages_to_poetry(setuptools: &Table, project_name: &str) -> Vec<Value> {
    match setuptools.get("packages") {
        None => Vec::new(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .map(|name| package_include(name, None))
            .collect(),
        Some(Value::Table(packages)) => {
            let roots = packages
                .get("find")
                .and_then(|find| find.get("where"))
                .and_then(Value::as_array);
            let Some(roots) = roots else {
                warn!("`tool.setuptools.packages` has no `find.where`; skipping package discovery");
                return Vec::new();
            };
            let module = normalize_name(project_name).replace('-', "_");
            roots
                .iter()
                .filter_map(Value::as_str)
                .map(|root| package_include(&module, Some(root)))
                .collect()
        }
        Some(_) => {
            warn!("`tool.setuptools.packages` has an unexpected shape; skipping package discovery");
            Vec::new()
        }
    }
}

/// Convert Poetry `packages` entries into a `[tool.setuptools] packages` value.
///
/// Entries without `from` become an explicit package list; otherwise the
/// distinct `from` directories become `find.where` roots.
pub(crate) fn poetry_packages_to_setuptools(packages: &[PoetryPackageInclude]) -> Option<Value> {
    if packages.is_empty() {
        return None;
    }

    if packages.iter().all(|package| package.from.is_none()) {
        let names = packages
            .iter()
            .map(|package| Value::String(package.include.clone()))
            .collect();
        return Some(Value::Array(names));
    }

    let mut roots: Vec<Value> = Vec::new();
    for package in packages {
        let root = Value::String(package.from.clone().unwrap_or_else(|| ".".to_owned()));
        if !roots.contains(&root) {
            roots.push(root);
        }
    }

    let mut find = Table::new();
    find.insert("where".to_owned(), Value::Array(roots));
    let mut table = Table::new();
    table.insert("find".to_owned(), Value::Table(find));
    Some(Value::Table(table))
}

/// A `[build-system]` table for the given backend.
pub(crate) fn build_system(requires: &[&str], backend: &str) -> Value {
    let mut table = Table::new();
    table.insert(
        "requires".to_owned(),
        Value::Array(
            requires
                .iter()
                .map(|requirement| Value::String((*requirement).to_owned()))
                .collect(),
        ),
    );
    table.insert("build-backend".to_owned(), Value::String(backend.to_owned()));
    Value::Table(table)
}

fn package_include(include: &str, from: Option<&str>) -> Value {
    let mut table = Table::new();
    table.insert("include".to_owned(), Value::String(include.to_owned()));
    if let Some(from) = from {
        table.insert("from".to_owned(), Value::String(from.to_owned()));
    }
    Value::Table(table)
}
