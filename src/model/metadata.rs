//! Document-level metadata structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SBOM specification family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecType {
    CycloneDx,
    Spdx,
}

impl SpecType {
    /// Lowercase name as reported in score results
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CycloneDx => "cyclonedx",
            Self::Spdx => "spdx",
        }
    }

    /// Specification versions this family publishes
    #[must_use]
    pub const fn known_versions(&self) -> &'static [&'static str] {
        match self {
            Self::CycloneDx => &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6"],
            Self::Spdx => &["SPDX-2.1", "SPDX-2.2", "SPDX-2.3", "SPDX-3.0"],
        }
    }
}

impl std::fmt::Display for SpecType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Spdx => write!(f, "SPDX"),
        }
    }
}

/// Serialization the document arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    Json,
    Xml,
    Yaml,
    TagValue,
    Unknown,
}

impl FileFormat {
    /// Whether the format is one the spec family officially supports
    #[must_use]
    pub const fn is_supported_by(&self, spec: SpecType) -> bool {
        match (spec, self) {
            (SpecType::CycloneDx, Self::Json | Self::Xml) => true,
            (SpecType::Spdx, Self::Json | Self::Yaml | Self::TagValue | Self::Xml) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
            Self::Yaml => write!(f, "yaml"),
            Self::TagValue => write!(f, "tag-value"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Specification-level facts about a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecInfo {
    /// Specification family
    pub spec_type: SpecType,
    /// Declared spec version (e.g. "1.5" or "SPDX-2.3"), empty when absent
    pub version: String,
    /// Serial number (CycloneDX) or document namespace (SPDX)
    pub namespace: Option<String>,
    /// Creation timestamp, if declared and parseable
    pub created: Option<DateTime<Utc>>,
    /// Raw creation timestamp string as found in the document
    pub created_raw: Option<String>,
    /// Serialization format
    pub file_format: FileFormat,
    /// Document data license (SPDX `dataLicense`, CycloneDX metadata licenses)
    pub data_license: Option<String>,
    /// Declared lifecycle phases (CycloneDX 1.5+)
    pub lifecycles: Vec<String>,
    /// Organization that supplied the SBOM
    pub supplier: Option<Organization>,
    /// Whether the document passed structural validation during parsing
    pub schema_valid: bool,
}

impl SpecInfo {
    /// Create spec info with only the family and format known
    #[must_use]
    pub const fn new(spec_type: SpecType, file_format: FileFormat) -> Self {
        Self {
            spec_type,
            version: String::new(),
            namespace: None,
            created: None,
            created_raw: None,
            file_format,
            data_license: None,
            lifecycles: Vec::new(),
            supplier: None,
            schema_valid: true,
        }
    }

    /// Spec name as used in result output
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.spec_type.name()
    }

    /// Whether the declared version is one the spec family publishes
    #[must_use]
    pub fn has_known_version(&self) -> bool {
        self.spec_type
            .known_versions()
            .iter()
            .any(|v| v.eq_ignore_ascii_case(self.version.trim()))
    }
}

/// Person or organization credited with authoring the SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author name
    pub name: String,
    /// Optional email
    pub email: Option<String>,
    /// Kind of author
    pub author_type: AuthorType,
}

impl Author {
    /// Create a person author
    #[must_use]
    pub fn person(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            author_type: AuthorType::Person,
        }
    }

    /// Create an organization author
    #[must_use]
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            author_type: AuthorType::Organization,
        }
    }
}

/// Type of author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorType {
    Person,
    Organization,
}

/// Tool that generated the SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub version: Option<String>,
}

impl Tool {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Organization/supplier information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name
    pub name: String,
    /// Contact URLs
    pub urls: Vec<String>,
    /// Contact emails
    pub emails: Vec<String>,
}

impl Organization {
    /// Create a new organization with just a name
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            urls: Vec::new(),
            emails: Vec::new(),
        }
    }

    /// An organization counts as present when it carries any identifying data
    #[must_use]
    pub fn is_meaningful(&self) -> bool {
        let name = self.name.trim();
        (!name.is_empty() && !name.eq_ignore_ascii_case("NOASSERTION"))
            || !self.urls.is_empty()
            || !self.emails.is_empty()
    }
}

/// Cryptographic hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash {
    /// Hash algorithm
    pub algorithm: HashAlgorithm,
    /// Hash value (hex encoded)
    pub value: String,
}

impl Hash {
    #[must_use]
    pub const fn new(algorithm: HashAlgorithm, value: String) -> Self {
        Self { algorithm, value }
    }
}

/// Hash algorithm types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    Other(String),
}

impl HashAlgorithm {
    /// Parse an algorithm name as spelled by CycloneDX or SPDX
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_uppercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA3256" => Self::Sha3_256,
            "SHA3384" => Self::Sha3_384,
            "SHA3512" => Self::Sha3_512,
            "BLAKE2B256" => Self::Blake2b256,
            "BLAKE2B384" => Self::Blake2b384,
            "BLAKE2B512" => Self::Blake2b512,
            "BLAKE3" => Self::Blake3,
            _ => Self::Other(name.to_string()),
        }
    }

    /// SHA-256 or stronger
    #[must_use]
    pub const fn is_strong(&self) -> bool {
        !matches!(self, Self::Md5 | Self::Sha1 | Self::Other(_))
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA-1"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
            Self::Sha3_256 => write!(f, "SHA3-256"),
            Self::Sha3_384 => write!(f, "SHA3-384"),
            Self::Sha3_512 => write!(f, "SHA3-512"),
            Self::Blake2b256 => write!(f, "BLAKE2b-256"),
            Self::Blake2b384 => write!(f, "BLAKE2b-384"),
            Self::Blake2b512 => write!(f, "BLAKE2b-512"),
            Self::Blake3 => write!(f, "BLAKE3"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Aggregate completeness declaration (CycloneDX compositions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletenessDeclaration {
    Complete,
    IncompleteFirstPartyOnly,
    IncompleteThirdPartyOnly,
    Incomplete,
    #[default]
    Unknown,
    NotSpecified,
}

impl CompletenessDeclaration {
    /// Parse a CycloneDX `aggregate` value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "complete" => Self::Complete,
            "incomplete_first_party_only" | "incomplete_first_party_proprietary_only"
            | "incomplete_first_party_opensource_only" => Self::IncompleteFirstPartyOnly,
            "incomplete_third_party_only" | "incomplete_third_party_proprietary_only"
            | "incomplete_third_party_opensource_only" => Self::IncompleteThirdPartyOnly,
            "incomplete" => Self::Incomplete,
            "not_specified" => Self::NotSpecified,
            _ => Self::Unknown,
        }
    }

    /// Whether the document makes any explicit completeness claim
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        !matches!(self, Self::Unknown | Self::NotSpecified)
    }
}

/// Where a document signature came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureSource {
    /// Embedded in the document (CycloneDX JSF `signature`)
    Embedded,
    /// Detached bundle supplied alongside the document
    Bundle,
}

/// Signature attached to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub source: SignatureSource,
    /// Signature algorithm, if declared
    pub algorithm: Option<String>,
    /// Signature value (base64 or hex as found)
    pub value: String,
    /// Public key material, if available
    pub public_key: Option<String>,
    /// Outcome of verification; `None` when no verifier ran
    pub verified: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_algorithm_parse() {
        assert_eq!(HashAlgorithm::parse("SHA-256"), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::parse("sha256"), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::parse("SHA3-512"), HashAlgorithm::Sha3_512);
        assert!(!HashAlgorithm::parse("MD5").is_strong());
        assert!(HashAlgorithm::parse("BLAKE3").is_strong());
    }

    #[test]
    fn test_known_versions() {
        let mut spec = SpecInfo::new(SpecType::Spdx, FileFormat::Json);
        spec.version = "SPDX-2.3".to_string();
        assert!(spec.has_known_version());
        spec.version = "SPDX-9.9".to_string();
        assert!(!spec.has_known_version());
    }

    #[test]
    fn test_completeness_parse() {
        assert!(CompletenessDeclaration::parse("complete").is_declared());
        assert!(!CompletenessDeclaration::parse("not_specified").is_declared());
        assert!(!CompletenessDeclaration::parse("garbage").is_declared());
    }

    #[test]
    fn test_organization_noassertion() {
        assert!(!Organization::new("NOASSERTION".to_string()).is_meaningful());
        assert!(Organization::new("Acme".to_string()).is_meaningful());
    }
}
