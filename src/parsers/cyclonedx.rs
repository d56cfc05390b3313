//! CycloneDX SBOM parser.
//!
//! Supports CycloneDX 1.2 through 1.6 in JSON. XML documents are detected so
//! they can be reported clearly, but are not parsed.

use crate::model::{
    Author, AuthorType, CompletenessDeclaration, Component, FileFormat, Hash, HashAlgorithm,
    LicenseExpression, LicenseInfo, Organization, Sbom, Signature, SignatureSource, SpecInfo,
    SpecType, Tool,
};
use crate::parsers::traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parser for CycloneDX SBOM format
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    /// Create a new CycloneDX parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a CycloneDX BOM from JSON
    fn parse_json(&self, content: &str) -> Result<Sbom, ParseError> {
        let cdx: CycloneDxBom = serde_json::from_str(content)?;
        Ok(self.convert_to_normalized(cdx))
    }

    /// Convert CycloneDX BOM to normalized representation
    fn convert_to_normalized(&self, cdx: CycloneDxBom) -> Sbom {
        let mut sbom = Sbom::new(self.convert_spec(&cdx));

        if let Some(meta) = cdx.metadata {
            sbom.authors = meta
                .authors
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| {
                    let name = a.name.or_else(|| a.email.clone())?;
                    Some(Author {
                        name,
                        email: a.email,
                        author_type: AuthorType::Person,
                    })
                })
                .collect();

            if let Some(manufacturer) = meta.manufacturer.or(meta.manufacture) {
                if let Some(org) = convert_organization(manufacturer) {
                    sbom.authors.push(Author {
                        name: org.name,
                        email: org.emails.into_iter().next(),
                        author_type: AuthorType::Organization,
                    });
                }
            }

            sbom.tools = meta
                .tools
                .unwrap_or_default()
                .into_iter()
                .filter_map(|t| {
                    let name = t.name.filter(|n| !n.trim().is_empty())?;
                    Some(Tool::new(name, t.version.filter(|v| !v.trim().is_empty())))
                })
                .collect();

            if let Some(primary) = meta.component {
                let mut flat = Vec::new();
                flatten_components(primary, &mut flat);
                if let Some(first) = flat.first() {
                    sbom.primary_component_id = Some(first.id.clone());
                }
                sbom.components.extend(flat);
            }
        }

        for comp in cdx.components.unwrap_or_default() {
            flatten_components(comp, &mut sbom.components);
        }

        for dep in cdx.dependencies.unwrap_or_default() {
            for target in dep.depends_on.unwrap_or_default() {
                sbom.add_relationship(dep.ref_field.clone(), target);
            }
        }

        sbom.completeness = cdx
            .compositions
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.aggregate.as_deref())
            .map(CompletenessDeclaration::parse)
            .find(CompletenessDeclaration::is_declared)
            .unwrap_or_default();

        sbom.signature = cdx.signature.and_then(|sig| {
            let value = sig.value.filter(|v| !v.trim().is_empty())?;
            Some(Signature {
                source: SignatureSource::Embedded,
                algorithm: sig.algorithm,
                value,
                public_key: sig.public_key.map(|k| k.to_string()),
                verified: None,
            })
        });

        tracing::debug!(
            components = sbom.components.len(),
            relationships = sbom.relationships.len(),
            "Normalized CycloneDX document"
        );
        sbom
    }

    /// Convert CycloneDX header and metadata fields to spec info
    fn convert_spec(&self, cdx: &CycloneDxBom) -> SpecInfo {
        let mut spec = SpecInfo::new(SpecType::CycloneDx, FileFormat::Json);
        spec.version = cdx.spec_version.clone().unwrap_or_default();
        spec.namespace = cdx.serial_number.clone().filter(|s| !s.trim().is_empty());
        spec.schema_valid = cdx
            .bom_format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("CycloneDX"))
            && cdx.spec_version.is_some();

        if let Some(meta) = &cdx.metadata {
            spec.created_raw = meta.timestamp.clone();
            spec.created = meta.timestamp.as_deref().and_then(parse_timestamp);
            spec.lifecycles = meta
                .lifecycles
                .iter()
                .flatten()
                .filter_map(|l| l.phase.clone().or_else(|| l.name.clone()))
                .collect();
            spec.supplier = meta.supplier.clone().and_then(convert_organization);
            spec.data_license = meta
                .licenses
                .iter()
                .flatten()
                .find_map(CdxLicenseChoice::expression_text);
        }
        spec
    }
}

impl SbomParser for CycloneDxParser {
    fn parse_str(&self, content: &str) -> Result<Sbom, ParseError> {
        if content.trim_start().starts_with('<') {
            return Err(ParseError::UnsupportedFormat(
                "CycloneDX XML is not supported; convert the document to JSON".to_string(),
            ));
        }
        self.parse_json(content)
    }

    fn format_name(&self) -> &'static str {
        "CycloneDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim_start();

        if trimmed.starts_with('{') {
            let has_bom_format = content.contains("\"bomFormat\"");
            let has_cyclonedx = content.contains("CycloneDX") || content.contains("cyclonedx");
            let has_spec_version = content.contains("\"specVersion\"");
            let version = extract_json_string(content, "specVersion");

            if has_bom_format && has_cyclonedx {
                return FormatDetection::with_confidence(FormatConfidence::CERTAIN)
                    .version(version);
            } else if has_bom_format {
                return FormatDetection::with_confidence(FormatConfidence::HIGH).version(version);
            } else if has_spec_version && content.contains("\"components\"") {
                return FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                    .version(version)
                    .warning("Missing bomFormat field - might not be CycloneDX");
            }
        }

        if trimmed.starts_with('<') && content.contains("<bom") && content.contains("cyclonedx.org")
        {
            return FormatDetection::with_confidence(FormatConfidence::HIGH);
        }

        FormatDetection::no_match()
    }
}

/// Pull the string value of a top-level JSON key without a full parse
pub(crate) fn extract_json_string(content: &str, key: &str) -> Option<String> {
    let needle = format!("\"{key}\"");
    let start = content.find(&needle)? + needle.len();
    let rest = content[start..].trim_start().strip_prefix(':')?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Parse RFC 3339 timestamps, tolerating a missing timezone
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// Depth-first flatten of nested CycloneDX components
fn flatten_components(cdx: CdxComponent, out: &mut Vec<Component>) {
    let CdxComponent {
        component_type,
        bom_ref,
        name,
        version,
        purl,
        cpe,
        swid,
        omnibor_id,
        swhid,
        author,
        copyright,
        licenses,
        supplier,
        hashes,
        external_references,
        components,
    } = cdx;

    let name = name.unwrap_or_default();
    let mut comp = Component::new(bom_ref.unwrap_or_else(|| name.clone()), name);
    comp.version = version;
    comp.purls.extend(purl.filter(|p| !p.trim().is_empty()));
    comp.cpes.extend(cpe.filter(|c| !c.trim().is_empty()));
    comp.other_ids.extend(swid.and_then(|s| s.tag_id));
    comp.other_ids.extend(omnibor_id.unwrap_or_default());
    comp.other_ids.extend(swhid.unwrap_or_default());
    comp.author = author;
    comp.copyright = copyright;
    comp.purpose = component_type;
    comp.supplier = supplier.and_then(convert_organization);
    comp.hashes = hashes
        .unwrap_or_default()
        .into_iter()
        .map(|h| Hash::new(HashAlgorithm::parse(&h.alg), h.content))
        .collect();
    comp.licenses = convert_licenses(licenses.unwrap_or_default());

    for ext in external_references.unwrap_or_default() {
        match ext.ref_type.as_str() {
            "vcs" if comp.source_code_url.is_none() => comp.source_code_url = Some(ext.url),
            "distribution" | "distribution-intake" if comp.download_url.is_none() => {
                comp.download_url = Some(ext.url);
            }
            _ => {}
        }
    }

    out.push(comp);
    for child in components.unwrap_or_default() {
        flatten_components(child, out);
    }
}

/// Split CycloneDX license choices into declared and concluded licenses.
///
/// CycloneDX 1.6 marks each choice with an `acknowledgement`; older
/// documents only carry declared licenses.
fn convert_licenses(choices: Vec<CdxLicenseChoice>) -> LicenseInfo {
    let mut info = LicenseInfo::default();
    for choice in choices {
        let Some(text) = choice.expression_text() else {
            continue;
        };
        let expr = LicenseExpression::new(text);
        if choice.acknowledgement() == Some("concluded") {
            info.concluded = Some(expr);
        } else {
            info.declared.push(expr);
        }
    }
    info
}

fn convert_organization(cdx: CdxOrganization) -> Option<Organization> {
    let mut org = Organization::new(cdx.name.unwrap_or_default());
    org.urls = cdx.url.unwrap_or_default();
    org.emails = cdx
        .contact
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| c.email)
        .collect();
    org.is_meaningful().then_some(org)
}

// ============================================================================
// CycloneDX JSON structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: Option<String>,
    spec_version: Option<String>,
    serial_number: Option<String>,
    metadata: Option<CdxMetadata>,
    components: Option<Vec<CdxComponent>>,
    dependencies: Option<Vec<CdxDependency>>,
    compositions: Option<Vec<CdxComposition>>,
    signature: Option<CdxSignature>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    /// Array in 1.4/1.5, object with components/services in 1.6
    #[serde(default, deserialize_with = "deserialize_tools")]
    tools: Option<Vec<CdxTool>>,
    authors: Option<Vec<CdxAuthor>>,
    component: Option<CdxComponent>,
    lifecycles: Option<Vec<CdxLifecycle>>,
    supplier: Option<CdxOrganization>,
    manufacturer: Option<CdxOrganization>,
    /// Pre-1.6 spelling of `manufacturer`
    manufacture: Option<CdxOrganization>,
    licenses: Option<Vec<CdxLicenseChoice>>,
}

#[derive(Debug, Deserialize)]
struct CdxLifecycle {
    phase: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxToolsObject {
    components: Option<Vec<CdxTool>>,
    services: Option<Vec<CdxTool>>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthor {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    name: Option<String>,
    version: Option<String>,
}

/// Accept both the 1.4/1.5 array and the 1.6 object tool layouts
fn deserialize_tools<'de, D>(deserializer: D) -> Result<Option<Vec<CdxTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ToolsLayout {
        Legacy(Vec<CdxTool>),
        Structured(CdxToolsObject),
    }

    let layout: Option<ToolsLayout> = Option::deserialize(deserializer)?;
    Ok(layout.map(|l| match l {
        ToolsLayout::Legacy(tools) => tools,
        ToolsLayout::Structured(obj) => obj
            .components
            .unwrap_or_default()
            .into_iter()
            .chain(obj.services.unwrap_or_default())
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type")]
    component_type: Option<String>,
    #[serde(rename = "bom-ref")]
    bom_ref: Option<String>,
    name: Option<String>,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    swid: Option<CdxSwid>,
    omnibor_id: Option<Vec<String>>,
    swhid: Option<Vec<String>>,
    author: Option<String>,
    copyright: Option<String>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    supplier: Option<CdxOrganization>,
    hashes: Option<Vec<CdxHash>>,
    external_references: Option<Vec<CdxExternalReference>>,
    components: Option<Vec<CdxComponent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxSwid {
    tag_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
    acknowledgement: Option<String>,
}

impl CdxLicenseChoice {
    fn expression_text(&self) -> Option<String> {
        self.expression
            .clone()
            .or_else(|| {
                self.license
                    .as_ref()
                    .and_then(|l| l.id.clone().or_else(|| l.name.clone()))
            })
            .filter(|t| !t.trim().is_empty())
    }

    fn acknowledgement(&self) -> Option<&str> {
        self.acknowledgement
            .as_deref()
            .or_else(|| self.license.as_ref().and_then(|l| l.acknowledgement.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
    acknowledgement: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CdxOrganization {
    name: Option<String>,
    url: Option<Vec<String>>,
    contact: Option<Vec<CdxContact>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CdxContact {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHash {
    alg: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReference {
    #[serde(rename = "type")]
    ref_type: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    ref_field: String,
    depends_on: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CdxComposition {
    aggregate: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxSignature {
    algorithm: Option<String>,
    value: Option<String>,
    public_key: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    const MINIMAL: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.6",
        "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
        "metadata": {
            "timestamp": "2024-05-01T10:00:00Z",
            "lifecycles": [{"phase": "build"}],
            "tools": {"components": [{"name": "syft", "version": "1.4.0"}]},
            "authors": [{"name": "Jane Doe", "email": "jane@example.com"}],
            "component": {"type": "application", "bom-ref": "app", "name": "demo", "version": "1.0.0",
                "components": [{"type": "library", "bom-ref": "inner", "name": "inner-lib"}]}
        },
        "components": [
            {"type": "library", "bom-ref": "pkg:npm/lodash@4.17.21", "name": "lodash", "version": "4.17.21",
             "purl": "pkg:npm/lodash@4.17.21",
             "licenses": [{"license": {"id": "MIT"}}],
             "hashes": [{"alg": "SHA-256", "content": "abc"}]}
        ],
        "dependencies": [{"ref": "app", "dependsOn": ["pkg:npm/lodash@4.17.21"]}],
        "compositions": [{"aggregate": "complete"}]
    }"#;

    #[test]
    fn test_parse_minimal() {
        let sbom = CycloneDxParser::new().parse_str(MINIMAL).expect("parse");
        assert_eq!(sbom.components.len(), 3);
        assert_eq!(sbom.spec.version, "1.6");
        assert!(sbom.spec.schema_valid);
        assert_eq!(sbom.spec.lifecycles, vec!["build".to_string()]);
        assert_eq!(sbom.tools, vec![Tool::new("syft", Some("1.4.0".to_string()))]);
        assert_eq!(sbom.authors.len(), 1);
        assert_eq!(sbom.primary_component().map(|c| c.name.as_str()), Some("demo"));
        assert_eq!(sbom.relationships.len(), 1);
        assert_eq!(sbom.completeness, CompletenessDeclaration::Complete);
        assert!(sbom.spec.created.is_some());
    }

    #[test]
    fn test_legacy_tools_array() {
        let content = r#"{"bomFormat":"CycloneDX","specVersion":"1.4",
            "metadata":{"tools":[{"vendor":"x","name":"cdxgen","version":"9.0"}]}}"#;
        let sbom = CycloneDxParser::new().parse_str(content).expect("parse");
        assert_eq!(sbom.tools.len(), 1);
        assert_eq!(sbom.tools[0].name, "cdxgen");
    }

    #[test]
    fn test_detect() {
        let detection = CycloneDxParser::new().detect(MINIMAL);
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("1.6"));
        let none = CycloneDxParser::new().detect(r#"{"spdxVersion":"SPDX-2.3"}"#);
        assert_eq!(none.confidence, FormatConfidence::NONE);
    }

    #[test]
    fn test_xml_rejected() {
        let xml = r#"<?xml version="1.0"?><bom xmlns="http://cyclonedx.org/schema/bom/1.5"/>"#;
        assert!(matches!(
            CycloneDxParser::new().parse_str(xml),
            Err(ParseError::UnsupportedFormat(_))
        ));
    }
}
