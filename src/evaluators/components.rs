//! Per-component evaluators.

use super::{per_component, FeatureScore};
use crate::model::{Component, Document};
use packageurl::PackageUrl;
use regex::Regex;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

static CPE23: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cpe:2\.3:[aho\*\-](:[^:\s]+){10}$").expect("static regex")
});

static CPE22: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^cpe:/[aho]?(:[^:\s]*){0,6}$").expect("static regex"));

/// Whether a string is a syntactically valid package URL
#[must_use]
pub fn is_valid_purl(purl: &str) -> bool {
    PackageUrl::from_str(purl).is_ok()
}

/// Whether a string is a syntactically valid CPE 2.3 or 2.2 URI
#[must_use]
pub fn is_valid_cpe(cpe: &str) -> bool {
    CPE23.is_match(cpe) || CPE22.is_match(cpe)
}

/// Components with a non-empty name
pub fn comp_with_name(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have names", |c| !c.name.trim().is_empty())
}

/// Components with a usable version
pub fn comp_with_version(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have versions", Component::has_version)
}

/// Components with a unique identifier (PURL, CPE, SWID, OmniBOR)
pub fn comp_with_identifiers(doc: &dyn Document) -> FeatureScore {
    per_component(
        doc,
        "components have unique identifiers",
        Component::has_unique_id,
    )
}

/// Components with any checksum
pub fn comp_with_checksums(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have checksums", |c| !c.hashes.is_empty())
}

/// Components with a SHA-256 or stronger checksum
pub fn comp_with_sha256(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have SHA-256 or stronger checksums", |c| {
        c.hashes.iter().any(|h| h.algorithm.is_strong())
    })
}

/// Components that take part in the dependency graph
pub fn comp_with_dependencies(doc: &dyn Document) -> FeatureScore {
    let linked: HashSet<&str> = doc
        .relationships()
        .iter()
        .flat_map(|r| [r.from.as_str(), r.to.as_str()])
        .collect();
    per_component(doc, "components appear in dependency relationships", |c| {
        linked.contains(c.id.as_str())
    })
}

/// Components with a source code location
pub fn comp_with_source_code(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have source code URLs", |c| {
        c.source_code_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    })
}

/// Components with a supplier
pub fn comp_with_supplier(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have suppliers", Component::has_supplier)
}

/// Components with a declared primary purpose or type
pub fn comp_with_purpose(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components declare a purpose", |c| {
        c.purpose.as_deref().is_some_and(|p| !p.trim().is_empty())
    })
}

/// Components with at least one valid PURL
pub fn comp_with_purl(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have valid PURLs", |c| {
        c.purls.iter().any(|p| is_valid_purl(p))
    })
}

/// Components with at least one valid CPE
pub fn comp_with_cpe(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have valid CPEs", |c| {
        c.cpes.iter().any(|p| is_valid_cpe(p))
    })
}
