//! Evaluators used only by compliance profiles.

use super::{per_component, FeatureScore};
use crate::model::Document;

/// Components naming a supplier, or failing that an author/originator
pub fn comp_supplier_or_author(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components name a supplier or author", |c| {
        c.has_supplier() || c.author.as_deref().is_some_and(|a| !a.trim().is_empty())
    })
}

/// Dependency relationships are declared.
///
/// With a primary component, it must have direct dependencies; without
/// one, any declared relationship counts.
pub fn comp_depth(doc: &dyn Document) -> FeatureScore {
    let relationships = doc.relationships();
    match doc.primary_component() {
        Some(primary) => {
            let direct = relationships.iter().filter(|r| r.from == primary.id).count();
            FeatureScore::check(
                direct > 0,
                format!("{direct} direct dependencies of {}", primary.name),
            )
        }
        None => FeatureScore::check(
            !relationships.is_empty(),
            format!("{} relationships", relationships.len()),
        ),
    }
}

/// Components with copyright text
pub fn comp_copyright(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have copyright text", |c| {
        c.copyright.as_deref().is_some_and(|t| !t.trim().is_empty())
    })
}

/// Components with a download location
pub fn comp_download_url(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have download URLs", |c| {
        c.download_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    })
}

/// At least one named generating tool
pub fn sbom_tool(doc: &dyn Document) -> FeatureScore {
    let named = doc
        .tools()
        .iter()
        .filter(|t| !t.name.trim().is_empty())
        .count();
    FeatureScore::check(named > 0, format!("{named} tools"))
}

/// Any relationship declared at document level
pub fn sbom_relationships(doc: &dyn Document) -> FeatureScore {
    let count = doc.relationships().len();
    FeatureScore::check(count > 0, format!("{count} relationships"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, FileFormat, Sbom, SpecInfo, SpecType};

    #[test]
    fn test_comp_depth_uses_primary() {
        let mut sbom = Sbom::new(SpecInfo::new(SpecType::CycloneDx, FileFormat::Json));
        sbom.add_component(Component::new("app", "app"));
        sbom.add_component(Component::new("lib", "lib"));
        sbom.add_relationship("lib", "app");
        assert_eq!(comp_depth(&sbom).score, 10.0);

        sbom.primary_component_id = Some("app".to_string());
        assert_eq!(comp_depth(&sbom).score, 0.0);
        sbom.add_relationship("app", "lib");
        assert_eq!(comp_depth(&sbom).score, 10.0);
    }

    #[test]
    fn test_supplier_falls_back_to_author() {
        let mut sbom = Sbom::new(SpecInfo::new(SpecType::Spdx, FileFormat::Json));
        let mut comp = Component::new("a", "a");
        comp.author = Some("Jane".to_string());
        sbom.add_component(comp);
        sbom.add_component(Component::new("b", "b"));
        assert_eq!(comp_supplier_or_author(&sbom).score, 5.0);
    }
}
