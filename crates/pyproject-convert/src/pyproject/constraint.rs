//! Translation between Poetry's constraint syntax and PEP 440 ranges.
//!
//! Only used when constraint translation is requested; by default both
//! mappers copy constraints verbatim.

use tracing::warn;

use crate::pyproject::specifier::{UNCONSTRAINED, is_unconstrained};

/// Rewrite a Poetry constraint as a PEP 440 specifier.
///
/// - `*` -> empty (unconstrained)
/// - `^1.2.3` -> `>=1.2.3,<2.0.0`
/// - `~1.2.3` -> `>=1.2.3,<1.3.0`
/// - `1.2.3` -> `==1.2.3`
///
/// Anything else is already PEP 440 and is returned unchanged.
pub fn poetry_to_pep440(constraint: &str) -> String {
    let constraint = constraint.trim();
    if is_unconstrained(constraint) {
        return String::new();
    }
    if constraint.contains("||") {
        warn!("`{constraint}` has no PEP 440 equivalent; copying it unchanged");
        return constraint.to_owned();
    }

    constraint
        .split(',')
        .map(|part| translate_poetry_part(part.trim()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Rewrite a PEP 440 specifier in Poetry's shorthand where one exists.
///
/// Exact inverse of [`poetry_to_pep440`] for the ranges it produces.
pub fn pep440_to_poetry(constraint: &str) -> String {
    let constraint = constraint.trim();
    if constraint.is_empty() {
        return UNCONSTRAINED.to_owned();
    }

    if let Some(version) = constraint.strip_prefix("==") {
        let version = version.trim();
        if !version.starts_with('=') && !version.contains(['*', ',']) {
            return version.to_owned();
        }
    }

    if let Some((lower, upper)) = constraint.split_once(',') {
        if let (Some(lower), Some(upper)) = (
            lower.trim().strip_prefix(">="),
            upper.trim().strip_prefix('<'),
        ) {
            let (lower, upper) = (lower.trim(), upper.trim());
            if !upper.starts_with('=') {
                if caret_upper_bound(lower).as_deref() == Some(upper) {
                    return format!("^{lower}");
                }
                if tilde_upper_bound(lower).as_deref() == Some(upper) {
                    return format!("~{lower}");
                }
            }
        }
    }

    constraint.to_owned()
}

fn translate_poetry_part(part: &str) -> String {
    if let Some(version) = part.strip_prefix('^') {
        let version = version.trim();
        if let Some(upper) = caret_upper_bound(version) {
            return format!(">={version},<{upper}");
        }
    } else if let Some(version) = part.strip_prefix('~').filter(|_| !part.starts_with("~=")) {
        let version = version.trim();
        if let Some(upper) = tilde_upper_bound(version) {
            return format!(">={version},<{upper}");
        }
    } else if part.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("=={part}");
    }
    part.to_owned()
}

/// Upper bound of a caret range: bump the first non-zero release segment,
/// or the last given one when all are zero.
fn caret_upper_bound(version: &str) -> Option<String> {
    let release = parse_release(version)?;
    let index = release
        .iter()
        .position(|&segment| segment != 0)
        .unwrap_or(release.len() - 1);
    bump(&release, index)
}

/// Upper bound of a tilde range: bump the minor segment when given,
/// otherwise the major one.
fn tilde_upper_bound(version: &str) -> Option<String> {
    let release = parse_release(version)?;
    let index = usize::from(release.len() > 1);
    bump(&release, index)
}

fn parse_release(version: &str) -> Option<Vec<u64>> {
    let release = version
        .split('.')
        .map(|segment| segment.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!release.is_empty()).then_some(release)
}

/// `None` when the bumped segment does not fit in a `u64`.
fn bump(release: &[u64], index: usize) -> Option<String> {
    let mut upper: Vec<u64> = release[..index].to_vec();
    upper.push(release[index].checked_add(1)?);
    while upper.len() < 3 {
        upper.push(0);
    }
    Some(
        upper
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("."),
    )
}
