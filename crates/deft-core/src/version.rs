//! Version matching against published tags.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One entry of the GitHub tags listing. Fields other than `name` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
}

impl TagRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parse a tag or requested version as semver.
///
/// Accepts the loose forms tags are usually published in: surrounding
/// whitespace and a single leading `v` or `=` are ignored.
pub fn parse_version(input: &str) -> Option<semver::Version> {
    let input = input.trim();
    let input = input
        .strip_prefix('v')
        .or_else(|| input.strip_prefix('='))
        .unwrap_or(input);
    semver::Version::parse(input).ok()
}

/// SemVer 2.0 precedence: build metadata does not participate.
fn cmp_precedence(a: &semver::Version, b: &semver::Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Pick the tag to fetch for `requested`.
///
/// A request that is not a semantic version (a branch, a commit, an odd tag
/// name) is returned as-is. Otherwise the result is the greatest published
/// tag that is strictly greater than the request, or the request itself
/// when none is. Ties keep the earliest record.
pub fn resolve_version(tags: &[TagRecord], requested: &str) -> String {
    let Some(floor) = parse_version(requested) else {
        tracing::debug!(requested, "Requested version is not semver, using it verbatim");
        return requested.to_string();
    };

    let (_, best) = tags.iter().fold(
        (floor, requested),
        |(best_version, best_name), tag| match parse_version(&tag.name) {
            Some(version) if cmp_precedence(&version, &best_version) == Ordering::Greater => {
                (version, tag.name.as_str())
            }
            _ => (best_version, best_name),
        },
    );

    tracing::debug!(requested, resolved = best, "Resolved version");
    best.to_string()
}
