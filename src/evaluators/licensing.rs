//! License evaluators.

use super::{per_component, FeatureScore};
use crate::formulas::per_component_score;
use crate::model::{Component, Document, LicenseExpression};

/// Components with any asserted license
pub fn comp_with_licenses(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have licenses", |c| c.licenses.has_any())
}

/// Components whose asserted licenses are all valid SPDX expressions
pub fn comp_with_valid_licenses(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have valid SPDX licenses", |c| {
        let mut asserted = c.licenses.asserted().peekable();
        asserted.peek().is_some() && asserted.all(|l| l.is_valid_spdx)
    })
}

/// Components with an author-declared license
pub fn comp_with_declared_licenses(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have declared licenses", |c| {
        c.licenses.has_declared()
    })
}

/// Components with a concluded license
pub fn comp_with_concluded_licenses(doc: &dyn Document) -> FeatureScore {
    per_component(doc, "components have concluded licenses", |c| {
        c.licenses.has_concluded()
    })
}

/// Document data license is a valid SPDX expression
pub fn sbom_data_license(doc: &dyn Document) -> FeatureScore {
    match doc.spec().data_license.as_deref() {
        Some(raw) => {
            let license = LicenseExpression::new(raw);
            FeatureScore::check(
                license.is_valid_spdx,
                format!("data license {raw}"),
            )
        }
        None => FeatureScore::fail("no data license"),
    }
}

/// Licensed components that avoid deprecated license ids
pub fn comp_no_deprecated_licenses(doc: &dyn Document) -> FeatureScore {
    licensed_share(doc, "licensed components avoid deprecated licenses", |l| {
        !l.is_deprecated()
    })
}

/// Licensed components that avoid restrictive (copyleft-only) licenses
pub fn comp_no_restrictive_licenses(doc: &dyn Document) -> FeatureScore {
    licensed_share(doc, "licensed components avoid restrictive licenses", |l| {
        !l.is_restrictive()
    })
}

/// Share of licensed components whose every asserted license satisfies
/// `pred`; not applicable when nothing is licensed.
fn licensed_share(
    doc: &dyn Document,
    what: &str,
    pred: impl Fn(&LicenseExpression) -> bool,
) -> FeatureScore {
    let licensed: Vec<&Component> = doc
        .components()
        .iter()
        .filter(|c| c.licenses.has_any())
        .collect();
    if licensed.is_empty() {
        return FeatureScore::not_applicable("no licensed components");
    }
    let matching = licensed
        .iter()
        .filter(|c| c.licenses.asserted().all(&pred))
        .count();
    FeatureScore::new(
        per_component_score(matching, licensed.len()),
        format!("{matching}/{} {what}", licensed.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFormat, Sbom, SpecInfo, SpecType};

    fn licensed(id: &str, expr: &str) -> Component {
        let mut comp = Component::new(id, id);
        comp.licenses.declared.push(LicenseExpression::new(expr));
        comp
    }

    fn sbom_with(components: Vec<Component>) -> Sbom {
        let mut sbom = Sbom::new(SpecInfo::new(SpecType::Spdx, FileFormat::Json));
        sbom.components = components;
        sbom
    }

    #[test]
    fn test_valid_licenses() {
        let sbom = sbom_with(vec![
            licensed("a", "MIT"),
            licensed("b", "not a license !!"),
            Component::new("c", "c"),
            licensed("d", "Apache-2.0 OR MIT"),
        ]);
        assert_eq!(comp_with_licenses(&sbom).score, 7.5);
        assert_eq!(comp_with_valid_licenses(&sbom).score, 5.0);
    }

    #[test]
    fn test_restrictive_only_counts_licensed() {
        let sbom = sbom_with(vec![
            licensed("a", "MIT"),
            licensed("b", "GPL-3.0-only"),
            Component::new("c", "c"),
        ]);
        let result = comp_no_restrictive_licenses(&sbom);
        assert_eq!(result.score, 5.0);
        assert!(!result.ignored);

        let unlicensed = sbom_with(vec![Component::new("c", "c")]);
        assert!(comp_no_deprecated_licenses(&unlicensed).ignored);
    }

    #[test]
    fn test_only_and_or_later_ids_are_not_deprecated() {
        let sbom = sbom_with(vec![
            licensed("a", "GPL-2.0-only"),
            licensed("b", "LGPL-2.1-or-later"),
            licensed("c", "MIT"),
        ]);
        let result = comp_no_deprecated_licenses(&sbom);
        assert_eq!(result.score, 10.0, "{}", result.description);

        let sbom = sbom_with(vec![licensed("a", "GPL-2.0"), licensed("b", "MIT")]);
        assert_eq!(comp_no_deprecated_licenses(&sbom).score, 5.0);
    }

    #[test]
    fn test_restrictive_respects_expression_structure() {
        let sbom = sbom_with(vec![
            licensed("a", "(MIT AND GPL-3.0-only) OR GPL-2.0-only"),
            licensed("b", "MIT OR GPL-3.0-only"),
        ]);
        assert_eq!(comp_no_restrictive_licenses(&sbom).score, 5.0);
    }

    #[test]
    fn test_data_license() {
        let mut sbom = sbom_with(Vec::new());
        assert_eq!(sbom_data_license(&sbom).score, 0.0);
        sbom.spec.data_license = Some("CC0-1.0".to_string());
        assert_eq!(sbom_data_license(&sbom).score, 10.0);
    }
}
