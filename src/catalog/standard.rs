//! Built-in categories, profiles and aliases.

use super::{CatalogBuilder, Namespace};
use crate::evaluators::{
    comp_copyright, comp_depth, comp_download_url, comp_no_deprecated_licenses,
    comp_no_restrictive_licenses, comp_supplier_or_author, comp_with_checksums,
    comp_with_concluded_licenses, comp_with_cpe, comp_with_declared_licenses,
    comp_with_dependencies, comp_with_identifiers, comp_with_licenses, comp_with_name,
    comp_with_purl, comp_with_purpose, comp_with_sha256, comp_with_source_code,
    comp_with_supplier, comp_with_valid_licenses, comp_with_version, primary_component,
    sbom_authors, sbom_completeness_declared, sbom_creation_timestamp, sbom_data_license,
    sbom_file_format, sbom_lifecycle, sbom_namespace, sbom_relationships, sbom_schema_valid,
    sbom_signature, sbom_spec_declared, sbom_spec_version, sbom_supplier, sbom_tool,
    sbom_tool_version, FeatureScore,
};
use crate::model::Document;

type Eval = fn(&dyn Document) -> FeatureScore;

/// `(key, name, description, evaluator)`
#[rustfmt::skip]
const FEATURES: &[(&str, &str, &str, Eval)] = &[
    ("comp_with_name", "Components with names", "Every component is named", comp_with_name),
    ("comp_with_version", "Components with versions", "Every component carries a version", comp_with_version),
    ("comp_with_identifiers", "Components with unique IDs", "PURL, CPE, SWID or OmniBOR identifier present", comp_with_identifiers),
    ("sbom_creation_timestamp", "Creation timestamp", "Document creation time is a valid timestamp", sbom_creation_timestamp),
    ("sbom_authors", "Document authors", "At least one author is named", sbom_authors),
    ("sbom_tool_version", "Generating tool", "Generating tool with name and version", sbom_tool_version),
    ("sbom_supplier", "Document supplier", "Supplier of the SBOM is declared", sbom_supplier),
    ("sbom_namespace", "Document namespace", "Unique namespace or serial number", sbom_namespace),
    ("sbom_lifecycle", "Lifecycle", "Lifecycle phase the SBOM was produced in", sbom_lifecycle),
    ("comp_with_checksums", "Components with checksums", "Any checksum per component", comp_with_checksums),
    ("comp_with_sha256", "Components with strong checksums", "SHA-256 or stronger per component", comp_with_sha256),
    ("sbom_signature", "Document signature", "SBOM is signed and the signature verifies", sbom_signature),
    ("comp_with_dependencies", "Components in dependency graph", "Component appears in a dependency relationship", comp_with_dependencies),
    ("sbom_completeness_declared", "Completeness declared", "Dependency completeness is declared", sbom_completeness_declared),
    ("primary_component", "Primary component", "The described component is identified", primary_component),
    ("comp_with_source_code", "Components with source code", "Source repository per component", comp_with_source_code),
    ("comp_with_supplier", "Components with suppliers", "Supplier per component", comp_with_supplier),
    ("comp_with_purpose", "Components with purpose", "Primary purpose or type per component", comp_with_purpose),
    ("comp_with_licenses", "Components with licenses", "Any license per component", comp_with_licenses),
    ("comp_with_valid_licenses", "Components with valid licenses", "Licenses are valid SPDX expressions", comp_with_valid_licenses),
    ("comp_with_declared_licenses", "Components with declared licenses", "Author-declared license per component", comp_with_declared_licenses),
    ("sbom_data_license", "Data license", "License of the SBOM itself", sbom_data_license),
    ("comp_no_deprecated_licenses", "No deprecated licenses", "Licensed components avoid deprecated SPDX ids", comp_no_deprecated_licenses),
    ("comp_no_restrictive_licenses", "No restrictive licenses", "Licensed components avoid copyleft-only terms", comp_no_restrictive_licenses),
    ("comp_with_purl", "Components with PURLs", "Valid package URL per component", comp_with_purl),
    ("comp_with_cpe", "Components with CPEs", "Valid CPE per component", comp_with_cpe),
    ("sbom_spec_declared", "Specification declared", "Document declares its specification", sbom_spec_declared),
    ("sbom_spec_version", "Specification version", "Specification version is a released one", sbom_spec_version),
    ("sbom_file_format", "File format", "Serialization defined by the specification", sbom_file_format),
    ("sbom_schema_valid", "Schema valid", "Required document fields are present", sbom_schema_valid),
];

/// `(key, name, weight, [(feature, weight)])`
const CATEGORIES: &[(&str, &str, f64, &[(&str, f64)])] = &[
    (
        "identification",
        "Identification",
        10.0,
        &[
            ("comp_with_name", 0.40),
            ("comp_with_version", 0.35),
            ("comp_with_identifiers", 0.25),
        ],
    ),
    (
        "provenance",
        "Provenance",
        12.0,
        &[
            ("sbom_creation_timestamp", 0.20),
            ("sbom_authors", 0.20),
            ("sbom_tool_version", 0.20),
            ("sbom_supplier", 0.15),
            ("sbom_namespace", 0.15),
            ("sbom_lifecycle", 0.10),
        ],
    ),
    (
        "integrity",
        "Integrity",
        15.0,
        &[
            ("comp_with_checksums", 0.60),
            ("comp_with_sha256", 0.30),
            ("sbom_signature", 0.10),
        ],
    ),
    (
        "completeness",
        "Completeness",
        12.0,
        &[
            ("comp_with_dependencies", 0.25),
            ("sbom_completeness_declared", 0.15),
            ("primary_component", 0.20),
            ("comp_with_source_code", 0.15),
            ("comp_with_supplier", 0.15),
            ("comp_with_purpose", 0.10),
        ],
    ),
    (
        "licensing",
        "Licensing",
        15.0,
        &[
            ("comp_with_licenses", 0.20),
            ("comp_with_valid_licenses", 0.20),
            ("comp_with_declared_licenses", 0.15),
            ("sbom_data_license", 0.10),
            ("comp_no_deprecated_licenses", 0.15),
            ("comp_no_restrictive_licenses", 0.20),
        ],
    ),
    (
        "vulnerability",
        "Vulnerability",
        10.0,
        &[("comp_with_purl", 0.50), ("comp_with_cpe", 0.50)],
    ),
    (
        "structural",
        "Structural",
        8.0,
        &[
            ("sbom_spec_declared", 0.30),
            ("sbom_spec_version", 0.30),
            ("sbom_file_format", 0.20),
            ("sbom_schema_valid", 0.20),
        ],
    ),
];

#[rustfmt::skip]
const PROFILE_FEATURES: &[(&str, &str, &str, Eval)] = &[
    ("comp_name", "Component name", "Name of every component", comp_with_name),
    ("comp_version", "Component version", "Version of every component", comp_with_version),
    ("comp_supplier", "Component supplier", "Supplier or author of every component", comp_supplier_or_author),
    ("comp_uniq_id", "Component unique ID", "Unique identifier of every component", comp_with_identifiers),
    ("comp_depth", "Dependency relationships", "Dependencies of the primary component", comp_depth),
    ("comp_hash", "Component hash", "Checksum of every component", comp_with_checksums),
    ("comp_checksum_sha256", "Component SHA-256", "SHA-256 or stronger checksum of every component", comp_with_sha256),
    ("comp_license", "Component license", "License of every component", comp_with_licenses),
    ("comp_concluded_license", "Concluded license", "Concluded license of every component", comp_with_concluded_licenses),
    ("comp_declared_license", "Declared license", "Declared license of every component", comp_with_declared_licenses),
    ("comp_copyright", "Copyright", "Copyright text of every component", comp_copyright),
    ("comp_source_code_url", "Source code URL", "Source repository of every component", comp_with_source_code),
    ("comp_download_url", "Download URL", "Download location of every component", comp_download_url),
    ("comp_purpose", "Component purpose", "Primary purpose of every component", comp_with_purpose),
    ("sbom_authors", "SBOM author", "Author of the SBOM data", sbom_authors),
    ("sbom_timestamp", "Timestamp", "Creation time of the SBOM", sbom_creation_timestamp),
    ("sbom_tool", "Creation tool", "Tool used to create the SBOM", sbom_tool),
    ("sbom_spec", "SBOM format", "Specification of the SBOM", sbom_spec_declared),
    ("sbom_spec_version", "SBOM format version", "Released specification version", sbom_spec_version),
    ("sbom_uri", "SBOM URI", "Unique document namespace or serial number", sbom_namespace),
    ("sbom_lifecycle", "Lifecycle phase", "Lifecycle phase of the SBOM", sbom_lifecycle),
    ("sbom_supplier", "SBOM supplier", "Supplier of the SBOM", sbom_supplier),
    ("sbom_primary_component", "Primary component", "The component the SBOM describes", primary_component),
    ("sbom_data_license", "Data license", "License of the SBOM data", sbom_data_license),
    ("sbom_signature", "Signature", "Signature over the SBOM", sbom_signature),
    ("sbom_relationships", "Relationships", "Relationships between elements", sbom_relationships),
];

/// `(key, name, description, [(profile feature, required)])`
const PROFILES: &[(&str, &str, &str, &[(&str, bool)])] = &[
    (
        "ntia",
        "NTIA Minimum Elements",
        "NTIA minimum elements for an SBOM (2021)",
        &[
            ("comp_supplier", true),
            ("comp_name", true),
            ("comp_version", true),
            ("comp_uniq_id", true),
            ("comp_depth", true),
            ("sbom_authors", true),
            ("sbom_timestamp", true),
        ],
    ),
    (
        "bsi-v1.1",
        "BSI TR-03183-2 v1.1",
        "German Federal Office for Information Security, technical guideline v1.1",
        &[
            ("sbom_spec", true),
            ("sbom_spec_version", true),
            ("sbom_authors", true),
            ("sbom_timestamp", true),
            ("comp_supplier", true),
            ("comp_name", true),
            ("comp_version", true),
            ("comp_license", true),
            ("comp_checksum_sha256", true),
            ("comp_depth", true),
            ("sbom_uri", false),
            ("comp_source_code_url", false),
            ("comp_download_url", false),
            ("comp_uniq_id", false),
        ],
    ),
    (
        "bsi-v2.0",
        "BSI TR-03183-2 v2.0",
        "German Federal Office for Information Security, technical guideline v2.0",
        &[
            ("sbom_spec", true),
            ("sbom_spec_version", true),
            ("sbom_authors", true),
            ("sbom_timestamp", true),
            ("sbom_primary_component", true),
            ("comp_supplier", true),
            ("comp_name", true),
            ("comp_version", true),
            ("comp_license", true),
            ("comp_checksum_sha256", true),
            ("comp_depth", true),
            ("comp_purpose", true),
            ("sbom_uri", false),
            ("sbom_signature", false),
            ("comp_concluded_license", false),
            ("comp_source_code_url", false),
            ("comp_download_url", false),
            ("comp_uniq_id", false),
        ],
    ),
    (
        "oct",
        "OpenChain Telco",
        "OpenChain Telco SBOM Guide v1.0",
        &[
            ("sbom_spec", true),
            ("sbom_spec_version", true),
            ("sbom_data_license", true),
            ("sbom_uri", true),
            ("sbom_authors", true),
            ("sbom_tool", true),
            ("sbom_timestamp", true),
            ("sbom_relationships", true),
            ("comp_name", true),
            ("comp_version", true),
            ("comp_supplier", true),
            ("comp_uniq_id", true),
            ("comp_download_url", true),
            ("comp_concluded_license", true),
            ("comp_declared_license", true),
            ("comp_copyright", true),
            ("comp_hash", false),
            ("comp_purpose", false),
        ],
    ),
    (
        "fsct",
        "Framing Software Component Transparency",
        "CISA Framing Software Component Transparency, third edition (minimum expectations)",
        &[
            ("sbom_authors", true),
            ("sbom_timestamp", true),
            ("sbom_primary_component", true),
            ("comp_name", true),
            ("comp_version", true),
            ("comp_supplier", true),
            ("comp_uniq_id", true),
            ("comp_hash", true),
            ("comp_depth", true),
            ("comp_license", true),
            ("comp_copyright", true),
            ("sbom_tool", false),
            ("sbom_lifecycle", false),
            ("comp_source_code_url", false),
        ],
    ),
];

const CATEGORY_ALIASES: &[(&str, &[&str])] = &[
    ("identification", &["identity", "identifiers"]),
    ("provenance", &["origin", "authorship"]),
    ("integrity", &["hashes", "checksums"]),
    ("completeness", &["complete", "dependencies"]),
    ("licensing", &["license", "licenses", "sharing"]),
    ("vulnerability", &["vulnerabilities", "vuln", "vulns"]),
    ("structural", &["structure", "semantic"]),
];

const FEATURE_ALIASES: &[(&str, &[&str])] = &[
    ("comp_with_identifiers", &["comp_with_uniq_ids", "comp_with_unique_ids"]),
    ("comp_with_purpose", &["comp_with_primary_purpose"]),
    ("comp_with_sha256", &["comp_with_checksums_sha256", "comp_with_strong_checksums"]),
    ("comp_with_licenses", &["comp_with_license"]),
    ("comp_with_valid_licenses", &["comp_valid_licenses"]),
    ("comp_no_restrictive_licenses", &["comp_with_restrictive_licenses"]),
    ("comp_no_deprecated_licenses", &["comp_with_deprecated_licenses"]),
    ("comp_with_supplier", &["comp_with_suppliers"]),
    ("comp_with_source_code", &["comp_with_source_code_url"]),
    ("comp_with_dependencies", &["comp_with_deps"]),
    ("sbom_creation_timestamp", &["sbom_timestamp", "sbom_created"]),
    ("sbom_tool_version", &["sbom_with_creator_and_version", "sbom_tool"]),
    ("sbom_namespace", &["sbom_uri", "sbom_serial_number"]),
    ("sbom_spec_declared", &["sbom_spec"]),
    ("sbom_file_format", &["sbom_spec_file_format"]),
    ("sbom_schema_valid", &["sbom_parsable"]),
    ("primary_component", &["sbom_primary_component", "sbom_with_primary_component"]),
    ("sbom_signature", &["sbom_with_signature"]),
    ("sbom_completeness_declared", &["sbom_completeness"]),
];

const PROFILE_FEATURE_ALIASES: &[(&str, &[&str])] = &[
    ("sbom_uri", &["sbom_namespace"]),
    ("comp_hash", &["comp_checksum", "comp_with_checksums"]),
    ("comp_checksum_sha256", &["comp_sha256"]),
    ("comp_uniq_id", &["comp_unique_id", "comp_purl"]),
    ("sbom_timestamp", &["sbom_creation_timestamp"]),
    ("sbom_tool", &["sbom_creation_tool"]),
    ("sbom_relationships", &["sbom_dependencies"]),
];

const PROFILE_ALIASES: &[(&str, &[&str])] = &[
    ("ntia", &["nita", "ntia-minimum-elements", "ntia-2021"]),
    ("bsi-v1.1", &["bsi", "bsi-v1", "tr-03183"]),
    ("bsi-v2.0", &["bsi-v2", "bsi-2.0"]),
    ("oct", &["openchain-telco", "oct-v1.0", "telco"]),
    ("fsct", &["fsct-v3", "fsctv3", "framing"]),
];

/// Builder preloaded with the built-in rule set
pub(super) fn builder() -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();
    for (key, name, description, eval) in FEATURES {
        builder = builder.feature(key, name, description, *eval);
    }
    for (key, name, description, eval) in PROFILE_FEATURES {
        builder = builder.profile_feature(key, name, description, *eval);
    }
    for (key, name, weight, features) in CATEGORIES {
        builder = builder.category(key, name, *weight, features);
    }
    for (key, name, description, items) in PROFILES {
        builder = builder.profile(key, name, description, items);
    }
    for (namespace, table) in [
        (Namespace::Category, CATEGORY_ALIASES),
        (Namespace::Feature, FEATURE_ALIASES),
        (Namespace::ProfileFeature, PROFILE_FEATURE_ALIASES),
        (Namespace::Profile, PROFILE_ALIASES),
    ] {
        for (canonical, aliases) in table {
            builder = builder.aliases(namespace, canonical, aliases);
        }
    }
    builder
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, Namespace};

    #[test]
    fn test_standard_catalog_builds() {
        let catalog = Catalog::standard().expect("standard catalog");
        let keys: Vec<&str> = catalog.categories().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "identification",
                "provenance",
                "integrity",
                "completeness",
                "licensing",
                "vulnerability",
                "structural"
            ]
        );
        let total: f64 = catalog.categories().map(|c| c.weight).sum();
        assert!((total - 82.0).abs() < 1e-9);
        for category in catalog.categories() {
            let sum: f64 = category.features.iter().map(|f| f.weight).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{} weights sum to {sum}", category.key);
        }
    }

    #[test]
    fn test_ntia_profile_all_required() {
        let catalog = Catalog::standard().expect("standard catalog");
        let ntia = catalog.profile("ntia").expect("ntia");
        assert_eq!(ntia.items.len(), 7);
        assert!(ntia.items.iter().all(|i| i.required));
    }

    #[test]
    fn test_standard_aliases() {
        let catalog = Catalog::standard().expect("standard catalog");
        assert_eq!(catalog.resolve_profile("NITA"), Some("ntia"));
        assert_eq!(catalog.resolve_profile("bsi"), Some("bsi-v1.1"));
        assert_eq!(catalog.resolve_profile("BSI_V2_0"), Some("bsi-v2.0"));
        assert_eq!(catalog.resolve_profile("FSCT-v3"), Some("fsct"));
        assert_eq!(catalog.resolve_category("vuln"), Some("vulnerability"));
        for profile_like in ["ntia", "quality", "security"] {
            assert_eq!(catalog.resolve_category(profile_like), None, "{profile_like}");
        }
        assert_eq!(
            catalog.resolve_feature("comp_with_uniq_ids"),
            Some("comp_with_identifiers")
        );
        assert_eq!(
            catalog.resolve(Namespace::ProfileFeature, "sbom-namespace"),
            Some("sbom_uri")
        );
    }
}
