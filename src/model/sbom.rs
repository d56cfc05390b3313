//! Core SBOM and Component data structures, and the `Document` query surface.

use super::{
    Author, CompletenessDeclaration, Hash, LicenseInfo, Organization, Signature, SpecInfo, Tool,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only query surface the scoring engine consumes.
///
/// Every rule evaluator sees a document only through this trait, so callers
/// can score documents produced by their own parsers.
pub trait Document: Send + Sync {
    /// All components, primary component included
    fn components(&self) -> &[Component];
    /// Specification-level metadata
    fn spec(&self) -> &SpecInfo;
    /// SBOM authors
    fn authors(&self) -> &[Author];
    /// Tools that generated the SBOM
    fn tools(&self) -> &[Tool];
    /// Dependency relationships between components
    fn relationships(&self) -> &[Relationship];
    /// The component the SBOM describes, if declared
    fn primary_component(&self) -> Option<&Component>;
    /// Signature attached to the document, if any
    fn signature(&self) -> Option<&Signature>;
    /// Aggregate completeness declaration
    fn completeness(&self) -> CompletenessDeclaration;
}

/// Normalized SBOM document produced by the bundled parsers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sbom {
    /// Specification-level metadata
    pub spec: SpecInfo,
    /// SBOM authors
    pub authors: Vec<Author>,
    /// Generating tools
    pub tools: Vec<Tool>,
    /// Components in document order
    pub components: Vec<Component>,
    /// Dependency relationships
    pub relationships: Vec<Relationship>,
    /// Id of the primary component, if declared
    pub primary_component_id: Option<String>,
    /// Document signature
    pub signature: Option<Signature>,
    /// Aggregate completeness declaration
    pub completeness: CompletenessDeclaration,
}

impl Sbom {
    /// Create an empty SBOM with the given spec metadata
    #[must_use]
    pub const fn new(spec: SpecInfo) -> Self {
        Self {
            spec,
            authors: Vec::new(),
            tools: Vec::new(),
            components: Vec::new(),
            relationships: Vec::new(),
            primary_component_id: None,
            signature: None,
            completeness: CompletenessDeclaration::Unknown,
        }
    }

    /// Add a component
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Add a relationship
    pub fn add_relationship(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.relationships.push(Relationship {
            from: from.into(),
            to: to.into(),
        });
    }

    /// Get total component count
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Look a component up by id
    #[must_use]
    pub fn get_component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Number of outgoing relationships per component id
    #[must_use]
    pub fn dependency_counts(&self) -> IndexMap<&str, usize> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for rel in &self.relationships {
            *counts.entry(rel.from.as_str()).or_default() += 1;
        }
        counts
    }
}

impl Document for Sbom {
    fn components(&self) -> &[Component] {
        &self.components
    }

    fn spec(&self) -> &SpecInfo {
        &self.spec
    }

    fn authors(&self) -> &[Author] {
        &self.authors
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    fn primary_component(&self) -> Option<&Component> {
        self.primary_component_id
            .as_deref()
            .and_then(|id| self.get_component(id))
    }

    fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    fn completeness(&self) -> CompletenessDeclaration {
        self.completeness
    }
}

/// Directed dependency relationship between two component ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
}

/// Component in the normalized SBOM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Format-specific identifier (bom-ref or SPDXID)
    pub id: String,
    /// Component name
    pub name: String,
    /// Version string
    pub version: Option<String>,
    /// Package URLs
    pub purls: Vec<String>,
    /// CPE identifiers (2.2 or 2.3)
    pub cpes: Vec<String>,
    /// Other unique identifiers (SWID tag ids, OmniBOR ids)
    pub other_ids: Vec<String>,
    /// Supplier/vendor information
    pub supplier: Option<Organization>,
    /// Component author or originator
    pub author: Option<String>,
    /// Cryptographic hashes
    pub hashes: Vec<Hash>,
    /// License information
    pub licenses: LicenseInfo,
    /// Copyright text
    pub copyright: Option<String>,
    /// Source repository URL
    pub source_code_url: Option<String>,
    /// Download location
    pub download_url: Option<String>,
    /// Primary purpose / component type
    pub purpose: Option<String>,
}

impl Component {
    /// Create a new component with minimal required fields
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a PURL
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purls.push(purl.into());
        self
    }

    /// Whether the component carries a usable version
    #[must_use]
    pub fn has_version(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty() && !v.eq_ignore_ascii_case("NOASSERTION"))
    }

    /// Whether the component carries any unique identifier
    #[must_use]
    pub fn has_unique_id(&self) -> bool {
        !self.purls.is_empty() || !self.cpes.is_empty() || !self.other_ids.is_empty()
    }

    /// Whether a meaningful supplier is recorded
    #[must_use]
    pub fn has_supplier(&self) -> bool {
        self.supplier.as_ref().is_some_and(Organization::is_meaningful)
    }

    /// Get display name with version
    #[must_use]
    pub fn display_name(&self) -> String {
        self.version
            .as_ref()
            .map_or_else(|| self.name.clone(), |v| format!("{}@{}", self.name, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFormat, SpecType};

    #[test]
    fn test_primary_component_lookup() {
        let mut sbom = Sbom::new(SpecInfo::new(SpecType::CycloneDx, FileFormat::Json));
        sbom.add_component(Component::new("app", "my-app").with_version("1.0.0"));
        sbom.add_component(Component::new("lib", "lodash"));
        sbom.primary_component_id = Some("app".to_string());

        let doc: &dyn Document = &sbom;
        assert_eq!(doc.primary_component().map(|c| c.name.as_str()), Some("my-app"));
        assert_eq!(doc.components().len(), 2);
    }

    #[test]
    fn test_dependency_counts() {
        let mut sbom = Sbom::new(SpecInfo::new(SpecType::Spdx, FileFormat::Json));
        sbom.add_relationship("a", "b");
        sbom.add_relationship("a", "c");
        sbom.add_relationship("b", "c");
        let counts = sbom.dependency_counts();
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.get("c"), None);
    }

    #[test]
    fn test_noassertion_version() {
        let comp = Component::new("x", "x").with_version("NOASSERTION");
        assert!(!comp.has_version());
        assert_eq!(Component::new("y", "y").with_version("2.0").display_name(), "y@2.0");
    }
}
