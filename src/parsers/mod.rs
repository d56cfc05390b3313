//! SBOM format parsers.
//!
//! Parsers for `CycloneDX` (JSON) and SPDX (JSON, YAML, tag-value) that
//! normalize content into [`Sbom`](crate::model::Sbom).
//!
//! ## Format Detection
//!
//! Detection is confidence based:
//! - each parser reports a confidence score (0.0-1.0) for the content
//! - the parser with the highest confidence above the threshold is selected
//! - ambiguous content is rejected rather than defaulted
//!
//! ```
//! use sbom_score::parsers::{detect_format, parse_sbom_str};
//!
//! let content = r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "components": []}"#;
//! let detected = detect_format(content).expect("detected");
//! assert_eq!(detected.format_name, "CycloneDX");
//! let sbom = parse_sbom_str(content).expect("parsed");
//! assert!(sbom.components.is_empty());
//! ```

mod cyclonedx;
mod detection;
mod spdx;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use detection::{DetectionResult, FormatDetector, ParserKind, MIN_CONFIDENCE_THRESHOLD};
pub use spdx::SpdxParser;
pub use traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};

use crate::model::Sbom;

/// Result of format detection
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    /// Name of the detected format
    pub format_name: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Detected version if available
    pub version: Option<String>,
    /// Any warnings about the detection
    pub warnings: Vec<String>,
}

/// Detect SBOM format from content without parsing
///
/// Returns None if no format could be detected with sufficient confidence.
#[must_use]
pub fn detect_format(content: &str) -> Option<DetectedFormat> {
    let result = FormatDetector::new().detect_from_content(content);

    if result.can_parse() {
        Some(DetectedFormat {
            format_name: result
                .parser
                .map(|p| p.name().to_string())
                .unwrap_or_default(),
            confidence: result.confidence.value(),
            version: result.version,
            warnings: result.warnings,
        })
    } else {
        None
    }
}

/// Parse SBOM from string content, selecting the parser by detection
pub fn parse_sbom_str(content: &str) -> Result<Sbom, ParseError> {
    FormatDetector::new().parse_str(content)
}
