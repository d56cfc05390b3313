//! Document-level evaluators.

use super::FeatureScore;
use crate::model::{Document, SpecType};

/// Creation timestamp present and parseable
pub fn sbom_creation_timestamp(doc: &dyn Document) -> FeatureScore {
    let spec = doc.spec();
    match (&spec.created, spec.created_raw.as_deref()) {
        (Some(created), _) => FeatureScore::pass(format!("created {}", created.to_rfc3339())),
        (None, Some(raw)) => FeatureScore::fail(format!("invalid timestamp {raw}")),
        (None, None) => FeatureScore::fail("no creation timestamp"),
    }
}

/// At least one named author
pub fn sbom_authors(doc: &dyn Document) -> FeatureScore {
    let count = doc
        .authors()
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .count();
    FeatureScore::check(count > 0, format!("{count} authors"))
}

/// Generating tools name their version; half marks for unversioned tools
pub fn sbom_tool_version(doc: &dyn Document) -> FeatureScore {
    let tools = doc.tools();
    if tools.is_empty() {
        return FeatureScore::fail("no tools");
    }
    let versioned = tools
        .iter()
        .filter(|t| t.version.as_deref().is_some_and(|v| !v.trim().is_empty()))
        .count();
    if versioned > 0 {
        FeatureScore::pass(format!("{versioned}/{} tools with versions", tools.len()))
    } else {
        FeatureScore::new(5.0, format!("{} tools without versions", tools.len()))
    }
}

/// Document supplier declared
pub fn sbom_supplier(doc: &dyn Document) -> FeatureScore {
    match &doc.spec().supplier {
        Some(org) if org.is_meaningful() => FeatureScore::pass(format!("supplier {}", org.name)),
        _ => FeatureScore::fail("no supplier"),
    }
}

/// Document namespace or serial number present
pub fn sbom_namespace(doc: &dyn Document) -> FeatureScore {
    match doc.spec().namespace.as_deref() {
        Some(ns) if !ns.trim().is_empty() => FeatureScore::pass(ns),
        _ => FeatureScore::fail("no namespace"),
    }
}

/// Lifecycle phase declared; SPDX 2.x has no such field
pub fn sbom_lifecycle(doc: &dyn Document) -> FeatureScore {
    let spec = doc.spec();
    if spec.spec_type == SpecType::Spdx && spec.lifecycles.is_empty() {
        return FeatureScore::not_applicable("not supported by SPDX");
    }
    FeatureScore::check(
        !spec.lifecycles.is_empty(),
        if spec.lifecycles.is_empty() {
            "no lifecycle".to_string()
        } else {
            spec.lifecycles.join(", ")
        },
    )
}

/// Signature present; full marks only once verified
pub fn sbom_signature(doc: &dyn Document) -> FeatureScore {
    match doc.signature() {
        None => FeatureScore::fail("no signature"),
        Some(sig) => match sig.verified {
            Some(true) => FeatureScore::pass("signature verified"),
            Some(false) => FeatureScore::fail("signature verification failed"),
            None => FeatureScore::new(5.0, "signature present, not verified"),
        },
    }
}

/// Completeness of the dependency data declared
pub fn sbom_completeness_declared(doc: &dyn Document) -> FeatureScore {
    if doc.spec().spec_type == SpecType::Spdx {
        return FeatureScore::not_applicable("not supported by SPDX");
    }
    let completeness = doc.completeness();
    FeatureScore::check(completeness.is_declared(), format!("{completeness:?}"))
}

/// Primary component identified
pub fn primary_component(doc: &dyn Document) -> FeatureScore {
    match doc.primary_component() {
        Some(comp) => FeatureScore::pass(comp.display_name()),
        None => FeatureScore::fail("no primary component"),
    }
}

/// Specification recognized
pub fn sbom_spec_declared(doc: &dyn Document) -> FeatureScore {
    FeatureScore::pass(doc.spec().name())
}

/// Specification version is a released one
pub fn sbom_spec_version(doc: &dyn Document) -> FeatureScore {
    let spec = doc.spec();
    if spec.version.trim().is_empty() {
        return FeatureScore::fail("no spec version");
    }
    FeatureScore::check(
        spec.has_known_version(),
        format!("{} {}", spec.name(), spec.version),
    )
}

/// Serialization is one the specification defines
pub fn sbom_file_format(doc: &dyn Document) -> FeatureScore {
    let spec = doc.spec();
    FeatureScore::check(
        spec.file_format.is_supported_by(spec.spec_type),
        format!("{} {}", spec.name(), spec.file_format),
    )
}

/// Document passed structural validation
pub fn sbom_schema_valid(doc: &dyn Document) -> FeatureScore {
    FeatureScore::check(
        doc.spec().schema_valid,
        if doc.spec().schema_valid {
            "required fields present"
        } else {
            "required fields missing"
        },
    )
}
