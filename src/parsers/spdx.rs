//! SPDX SBOM parser.
//!
//! Supports SPDX 2.2 and 2.3 in JSON, YAML and tag-value form. All three are
//! read into the same intermediate structure before normalization.

use super::cyclonedx::{extract_json_string, parse_timestamp};
use crate::model::{
    Author, AuthorType, Component, FileFormat, Hash, HashAlgorithm, LicenseExpression,
    LicenseInfo, Organization, Sbom, SpecInfo, SpecType, Tool,
};
use crate::parsers::traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};
use serde::Deserialize;

/// Parser for SPDX SBOM format
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxParser;

impl SpdxParser {
    /// Create a new SPDX parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn serialization(content: &str) -> FileFormat {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            FileFormat::Json
        } else if trimmed.starts_with('<') {
            FileFormat::Xml
        } else if trimmed.starts_with("SPDXVersion:") || content.contains("\nSPDXVersion:") {
            FileFormat::TagValue
        } else if trimmed.starts_with("spdxVersion:") || content.contains("\nspdxVersion:") {
            FileFormat::Yaml
        } else {
            FileFormat::Unknown
        }
    }

    /// Convert the intermediate document to the normalized model
    fn convert_to_normalized(&self, doc: SpdxDocument, file_format: FileFormat) -> Sbom {
        let mut spec = SpecInfo::new(SpecType::Spdx, file_format);
        spec.version = doc.spdx_version.clone().unwrap_or_default();
        spec.namespace = doc.document_namespace.clone().filter(|n| !n.trim().is_empty());
        spec.data_license = doc.data_license.clone().filter(|l| !l.trim().is_empty());
        spec.schema_valid = doc.spdx_version.is_some()
            && doc.spdx_id.as_deref() == Some("SPDXRef-DOCUMENT")
            && doc.data_license.is_some()
            && doc.creation_info.is_some();

        let mut sbom = Sbom::new(spec);

        if let Some(info) = doc.creation_info {
            sbom.spec.created_raw = info.created.clone();
            sbom.spec.created = info.created.as_deref().and_then(parse_timestamp);
            for creator in info.creators.unwrap_or_default() {
                match parse_creator(&creator) {
                    Some(Creator::Tool(tool)) => sbom.tools.push(tool),
                    Some(Creator::Author(author)) => sbom.authors.push(author),
                    None => tracing::debug!("Ignoring unrecognized SPDX creator: {creator}"),
                }
            }
        }

        for pkg in doc.packages.unwrap_or_default() {
            sbom.add_component(convert_package(pkg));
        }

        for rel in doc.relationships.unwrap_or_default() {
            match rel.relationship_type.as_str() {
                "DEPENDS_ON" | "CONTAINS" => {
                    sbom.add_relationship(rel.spdx_element_id, rel.related_spdx_element);
                }
                "DEPENDENCY_OF" | "CONTAINED_BY" => {
                    sbom.add_relationship(rel.related_spdx_element, rel.spdx_element_id);
                }
                "DESCRIBES" if rel.spdx_element_id == "SPDXRef-DOCUMENT" => {
                    if sbom.primary_component_id.is_none() {
                        sbom.primary_component_id = Some(rel.related_spdx_element);
                    }
                }
                _ => {}
            }
        }

        if sbom.primary_component_id.is_none() {
            sbom.primary_component_id = doc.document_describes.unwrap_or_default().into_iter().next();
        }

        tracing::debug!(
            components = sbom.components.len(),
            relationships = sbom.relationships.len(),
            "Normalized SPDX document"
        );
        sbom
    }
}

impl SbomParser for SpdxParser {
    fn parse_str(&self, content: &str) -> Result<Sbom, ParseError> {
        let file_format = Self::serialization(content);
        let doc = match file_format {
            FileFormat::Json => serde_json::from_str::<SpdxDocument>(content)?,
            FileFormat::Yaml => serde_yaml::from_str::<SpdxDocument>(content)?,
            FileFormat::TagValue => parse_tag_value(content)?,
            FileFormat::Xml | FileFormat::Unknown => {
                return Err(ParseError::UnsupportedFormat(
                    "SPDX RDF/XML is not supported".to_string(),
                ));
            }
        };
        Ok(self.convert_to_normalized(doc, file_format))
    }

    fn format_name(&self) -> &'static str {
        "SPDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        match Self::serialization(content) {
            FileFormat::Json => {
                let has_spdx_version = content.contains("\"spdxVersion\"");
                let has_spdx_id = content.contains("\"SPDXID\"");
                let has_data_license = content.contains("\"dataLicense\"");
                let version = extract_json_string(content, "spdxVersion");

                if has_spdx_version && has_spdx_id {
                    FormatDetection::with_confidence(FormatConfidence::CERTAIN).version(version)
                } else if has_spdx_version || (has_spdx_id && has_data_license) {
                    FormatDetection::with_confidence(FormatConfidence::HIGH).version(version)
                } else if content.contains("\"packages\"") && has_data_license {
                    FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                        .warning("Missing spdxVersion field")
                } else {
                    FormatDetection::no_match()
                }
            }
            FileFormat::TagValue => {
                let version = tag_value_lines(content)
                    .into_iter()
                    .find(|(tag, _)| *tag == "SPDXVersion")
                    .map(|(_, v)| v.to_string());
                let confidence = if content.contains("SPDXID:") {
                    FormatConfidence::CERTAIN
                } else {
                    FormatConfidence::HIGH
                };
                FormatDetection::with_confidence(confidence).version(version)
            }
            FileFormat::Yaml => FormatDetection::with_confidence(FormatConfidence::HIGH),
            FileFormat::Xml if content.contains("spdx.org/rdf") => {
                FormatDetection::with_confidence(FormatConfidence::MEDIUM)
            }
            FileFormat::Xml | FileFormat::Unknown => FormatDetection::no_match(),
        }
    }
}

enum Creator {
    Tool(Tool),
    Author(Author),
}

/// Parse an SPDX creator line such as `Tool: syft-1.4.0` or
/// `Organization: Acme (security@acme.example)`
fn parse_creator(creator: &str) -> Option<Creator> {
    let (kind, rest) = creator.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    match kind.trim() {
        "Tool" => {
            let (name, version) = split_tool_version(rest);
            Some(Creator::Tool(Tool::new(name, version)))
        }
        "Person" | "Organization" => {
            let (name, email) = split_email(rest);
            let author_type = if kind.trim() == "Person" {
                AuthorType::Person
            } else {
                AuthorType::Organization
            };
            Some(Creator::Author(Author {
                name,
                email,
                author_type,
            }))
        }
        _ => None,
    }
}

/// `syft-1.4.0` -> (`syft`, `1.4.0`); a trailing segment counts as a version
/// only if it starts with a digit or `v<digit>`
fn split_tool_version(raw: &str) -> (String, Option<String>) {
    for sep in ['@', '-', ' '] {
        if let Some((name, version)) = raw.rsplit_once(sep) {
            let v = version.trim().trim_start_matches('v');
            if !name.trim().is_empty() && v.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return (name.trim().to_string(), Some(version.trim().to_string()));
            }
        }
    }
    (raw.to_string(), None)
}

/// `Acme (sec@acme.example)` -> (`Acme`, `sec@acme.example`)
fn split_email(raw: &str) -> (String, Option<String>) {
    match raw.split_once('(') {
        Some((name, rest)) => {
            let email = rest.trim_end_matches(')').trim();
            (
                name.trim().to_string(),
                (!email.is_empty()).then(|| email.to_string()),
            )
        }
        None => (raw.trim().to_string(), None),
    }
}

fn convert_package(pkg: SpdxPackage) -> Component {
    let mut comp = Component::new(pkg.spdx_id, pkg.name.unwrap_or_default());
    comp.version = pkg.version_info;
    comp.copyright = pkg.copyright_text.filter(|c| !is_no_assertion(c));
    comp.purpose = pkg.primary_package_purpose;
    comp.supplier = pkg
        .supplier
        .as_deref()
        .and_then(parse_actor_organization);
    comp.author = pkg
        .originator
        .as_deref()
        .and_then(parse_actor_organization)
        .map(|o| o.name);
    comp.hashes = pkg
        .checksums
        .unwrap_or_default()
        .into_iter()
        .map(|c| Hash::new(HashAlgorithm::parse(&c.algorithm), c.checksum_value))
        .collect();
    comp.licenses = LicenseInfo {
        declared: pkg
            .license_declared
            .into_iter()
            .map(LicenseExpression::new)
            .collect(),
        concluded: pkg.license_concluded.map(LicenseExpression::new),
    };

    if let Some(location) = pkg.download_location.filter(|l| !is_no_assertion(l)) {
        if location.starts_with("git+") || location.starts_with("git://") {
            comp.source_code_url = Some(location.clone());
        }
        comp.download_url = Some(location);
    }

    for ext in pkg.external_refs.unwrap_or_default() {
        match ext.reference_type.to_lowercase().as_str() {
            "purl" => comp.purls.push(ext.reference_locator),
            "cpe22type" | "cpe23type" | "cpe22" | "cpe23" => comp.cpes.push(ext.reference_locator),
            "swid" | "gitoid" | "swh" => comp.other_ids.push(ext.reference_locator),
            "vcs" if comp.source_code_url.is_none() => {
                comp.source_code_url = Some(ext.reference_locator);
            }
            _ => {}
        }
    }
    comp
}

fn is_no_assertion(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("NOASSERTION") || v.eq_ignore_ascii_case("NONE")
}

/// Parse `Organization: Acme (email)` / `Person: Jane` actor strings
fn parse_actor_organization(actor: &str) -> Option<Organization> {
    if is_no_assertion(actor) {
        return None;
    }
    let rest = actor.split_once(':').map_or(actor, |(_, r)| r);
    let (name, email) = split_email(rest);
    let mut org = Organization::new(name);
    org.emails.extend(email);
    org.is_meaningful().then_some(org)
}

// ============================================================================
// Tag-value support
// ============================================================================

/// `(tag, value)` pairs in document order. A `<text>` value that spans
/// several lines is folded into one value, line breaks kept.
fn tag_value_lines(content: &str) -> Vec<(&str, String)> {
    let mut pairs = Vec::new();
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let value = match value.strip_prefix("<text>") {
            Some(text) => match text.split_once("</text>") {
                Some((inner, _)) => inner.to_string(),
                None => {
                    let mut folded = vec![text];
                    for next in lines.by_ref() {
                        if let Some((last, _)) = next.split_once("</text>") {
                            folded.push(last);
                            break;
                        }
                        folded.push(next);
                    }
                    folded.join("\n")
                }
            },
            None => value.to_string(),
        };
        pairs.push((tag.trim(), value.trim().to_string()));
    }
    pairs
}

/// Which block of a tag-value document the current tags belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Document,
    Package,
    /// File, snippet or extracted-license blocks; their tags are skipped
    Other,
}

fn parse_tag_value(content: &str) -> Result<SpdxDocument, ParseError> {
    let mut doc = SpdxDocument::default();
    let mut creation = SpdxCreationInfo::default();
    let mut packages: Vec<SpdxPackage> = Vec::new();
    let mut relationships = Vec::new();
    let mut section = Section::Document;

    for (tag, value) in tag_value_lines(content) {
        match tag {
            "SPDXVersion" => doc.spdx_version = Some(value),
            "DataLicense" => doc.data_license = Some(value),
            "DocumentNamespace" => doc.document_namespace = Some(value),
            "Created" => creation.created = Some(value),
            "Creator" => creation.creators.get_or_insert_with(Vec::new).push(value),
            "Relationship" => {
                let parts: Vec<&str> = value.split_whitespace().collect();
                if let [from, kind, to] = parts.as_slice() {
                    relationships.push(SpdxRelationship {
                        spdx_element_id: (*from).to_string(),
                        relationship_type: (*kind).to_string(),
                        related_spdx_element: (*to).to_string(),
                    });
                }
            }
            "PackageName" => {
                section = Section::Package;
                packages.push(SpdxPackage {
                    name: Some(value),
                    ..SpdxPackage::default()
                });
            }
            "FileName" | "SnippetSPDXID" | "LicenseID" => section = Section::Other,
            "SPDXID" if section == Section::Document => {
                doc.spdx_id.get_or_insert(value);
            }
            _ => {
                if section == Section::Package {
                    if let Some(pkg) = packages.last_mut() {
                        apply_package_tag(pkg, tag, value);
                    }
                }
            }
        }
    }

    if doc.spdx_version.is_none() {
        return Err(ParseError::InvalidStructure(
            "tag-value document has no SPDXVersion".to_string(),
        ));
    }

    if creation.created.is_some() || creation.creators.is_some() {
        doc.creation_info = Some(creation);
    }
    doc.packages = Some(packages);
    doc.relationships = Some(relationships);
    Ok(doc)
}

fn apply_package_tag(pkg: &mut SpdxPackage, tag: &str, value: String) {
    match tag {
        "SPDXID" => pkg.spdx_id = value,
        "PackageVersion" => pkg.version_info = Some(value),
        "PackageSupplier" => pkg.supplier = Some(value),
        "PackageOriginator" => pkg.originator = Some(value),
        "PackageDownloadLocation" => pkg.download_location = Some(value),
        "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
        "PackageLicenseDeclared" => pkg.license_declared = Some(value),
        "PackageCopyrightText" => pkg.copyright_text = Some(value),
        "PrimaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
        "PackageChecksum" => {
            if let Some((algorithm, checksum)) = value.split_once(':') {
                pkg.checksums.get_or_insert_with(Vec::new).push(SpdxChecksum {
                    algorithm: algorithm.trim().to_string(),
                    checksum_value: checksum.trim().to_string(),
                });
            }
        }
        "ExternalRef" => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if let [category, kind, locator] = parts.as_slice() {
                pkg.external_refs.get_or_insert_with(Vec::new).push(SpdxExternalRef {
                    reference_category: Some((*category).to_string()),
                    reference_type: (*kind).to_string(),
                    reference_locator: (*locator).to_string(),
                });
            }
        }
        _ => {}
    }
}

// ============================================================================
// SPDX structures (JSON and YAML share field names)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: Option<String>,
    data_license: Option<String>,
    #[serde(rename = "SPDXID")]
    spdx_id: Option<String>,
    document_namespace: Option<String>,
    creation_info: Option<SpdxCreationInfo>,
    packages: Option<Vec<SpdxPackage>>,
    relationships: Option<Vec<SpdxRelationship>>,
    document_describes: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct SpdxCreationInfo {
    created: Option<String>,
    creators: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID", default)]
    spdx_id: String,
    name: Option<String>,
    version_info: Option<String>,
    supplier: Option<String>,
    originator: Option<String>,
    download_location: Option<String>,
    checksums: Option<Vec<SpdxChecksum>>,
    license_concluded: Option<String>,
    license_declared: Option<String>,
    copyright_text: Option<String>,
    external_refs: Option<Vec<SpdxExternalRef>>,
    primary_package_purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct SpdxExternalRef {
    reference_category: Option<String>,
    reference_type: String,
    reference_locator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    const JSON: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "dataLicense": "CC0-1.0",
        "SPDXID": "SPDXRef-DOCUMENT",
        "name": "demo",
        "documentNamespace": "https://example.com/spdx/demo-1",
        "creationInfo": {
            "created": "2024-05-01T10:00:00Z",
            "creators": ["Tool: syft-1.4.0", "Organization: Acme (sbom@acme.example)"]
        },
        "packages": [
            {"SPDXID": "SPDXRef-app", "name": "app", "versionInfo": "1.0.0",
             "supplier": "Organization: Acme", "downloadLocation": "NOASSERTION",
             "licenseConcluded": "MIT", "licenseDeclared": "MIT",
             "externalRefs": [{"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl",
                               "referenceLocator": "pkg:npm/app@1.0.0"}]},
            {"SPDXID": "SPDXRef-lodash", "name": "lodash", "versionInfo": "4.17.21",
             "checksums": [{"algorithm": "SHA256", "checksumValue": "abc"}]}
        ],
        "relationships": [
            {"spdxElementId": "SPDXRef-DOCUMENT", "relationshipType": "DESCRIBES", "relatedSpdxElement": "SPDXRef-app"},
            {"spdxElementId": "SPDXRef-app", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "SPDXRef-lodash"}
        ]
    }"#;

    #[test]
    fn test_parse_json() {
        let sbom = SpdxParser::new().parse_str(JSON).expect("parse");
        assert_eq!(sbom.components.len(), 2);
        assert!(sbom.spec.schema_valid);
        assert_eq!(sbom.spec.file_format, FileFormat::Json);
        assert_eq!(sbom.tools, vec![Tool::new("syft", Some("1.4.0".to_string()))]);
        assert_eq!(sbom.authors.len(), 1);
        assert_eq!(sbom.authors[0].email.as_deref(), Some("sbom@acme.example"));
        assert_eq!(sbom.primary_component().map(|c| c.name.as_str()), Some("app"));
        assert_eq!(sbom.relationships.len(), 1);
        assert_eq!(sbom.components[0].purls, vec!["pkg:npm/app@1.0.0".to_string()]);
        assert!(sbom.components[0].download_url.is_none());
    }

    #[test]
    fn test_parse_tag_value() {
        let content = "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n\
DocumentNamespace: https://example.com/tv\nCreator: Tool: spdx-builder-2.0\nCreated: 2024-01-01T00:00:00Z\n\n\
PackageName: zlib\nSPDXID: SPDXRef-zlib\nPackageVersion: 1.3\nPackageChecksum: SHA256: deadbeef\n\
PackageLicenseDeclared: Zlib\nExternalRef: PACKAGE-MANAGER purl pkg:generic/zlib@1.3\n\
Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-zlib\n";
        let sbom = SpdxParser::new().parse_str(content).expect("parse");
        assert_eq!(sbom.spec.file_format, FileFormat::TagValue);
        assert_eq!(sbom.spec.version, "SPDX-2.2");
        assert_eq!(sbom.components.len(), 1);
        let zlib = &sbom.components[0];
        assert_eq!(zlib.id, "SPDXRef-zlib");
        assert_eq!(zlib.hashes[0].algorithm, HashAlgorithm::Sha256);
        assert_eq!(zlib.purls.len(), 1);
        assert_eq!(sbom.primary_component_id.as_deref(), Some("SPDXRef-zlib"));
        assert_eq!(sbom.tools[0].version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_tag_value_file_section_keeps_package_ids() {
        let content = "SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n\n\
PackageName: app\nSPDXID: SPDXRef-Package-app\nPackageVersion: 2.1.0\n\
PackageCopyrightText: <text>Copyright 2024 Acme\nCopyright 2023 Contributors\n</text>\n\
PackageLicenseDeclared: MIT\n\n\
FileName: ./src/main.rs\nSPDXID: SPDXRef-File-main\nFileChecksum: SHA1: 85ed0817af83a24ad8da68c2b5094de69833983c\n\
LicenseConcluded: GPL-2.0\n\n\
PackageName: libc\nSPDXID: SPDXRef-Package-libc\nPackageVersion: 0.2.150\n\n\
Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package-app\n\
Relationship: SPDXRef-Package-app DEPENDS_ON SPDXRef-Package-libc\n";
        let sbom = SpdxParser::new().parse_str(content).expect("parse");

        let ids: Vec<_> = sbom.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["SPDXRef-Package-app", "SPDXRef-Package-libc"]);
        let primary = sbom.primary_component().expect("primary component");
        assert_eq!(primary.name, "app");
        assert_eq!(primary.version.as_deref(), Some("2.1.0"));
        assert!(primary.hashes.is_empty());
        assert_eq!(
            primary.copyright.as_deref(),
            Some("Copyright 2024 Acme\nCopyright 2023 Contributors")
        );
        assert_eq!(sbom.relationships.len(), 1);
        assert_eq!(sbom.relationships[0].to, "SPDXRef-Package-libc");
    }

    #[test]
    fn test_parse_yaml() {
        let content = "spdxVersion: SPDX-2.3\ndataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n\
packages:\n  - SPDXID: SPDXRef-a\n    name: a\n    versionInfo: '1.0'\n";
        let sbom = SpdxParser::new().parse_str(content).expect("parse");
        assert_eq!(sbom.spec.file_format, FileFormat::Yaml);
        assert_eq!(sbom.components[0].version.as_deref(), Some("1.0"));
        assert!(!sbom.spec.schema_valid, "no creationInfo");
    }

    #[test]
    fn test_split_tool_version() {
        assert_eq!(
            split_tool_version("syft-1.4.0"),
            ("syft".to_string(), Some("1.4.0".to_string()))
        );
        assert_eq!(split_tool_version("my-tool"), ("my-tool".to_string(), None));
        assert_eq!(
            split_tool_version("trivy v0.50.1"),
            ("trivy".to_string(), Some("v0.50.1".to_string()))
        );
    }
}
