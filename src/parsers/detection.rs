//! Confidence-based format detection.
//!
//! Every parser reports how confident it is that it can handle the content;
//! the detector picks the strongest one above a threshold and never falls
//! back to a default format.

use super::traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};
use super::{CycloneDxParser, SpdxParser};
use crate::model::Sbom;

/// Minimum confidence for accepting a detection (LOW).
pub const MIN_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Parser type identified during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    CycloneDx,
    Spdx,
}

impl ParserKind {
    /// Human-readable parser name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CycloneDx => "CycloneDX",
            Self::Spdx => "SPDX",
        }
    }
}

/// Result of format detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// The parser that should handle this content, if any
    pub parser: Option<ParserKind>,
    pub confidence: FormatConfidence,
    /// Detected spec version if available
    pub version: Option<String>,
    pub warnings: Vec<String>,
}

impl DetectionResult {
    /// A result indicating no format was detected
    #[must_use]
    pub fn unknown(reason: &str) -> Self {
        Self {
            parser: None,
            confidence: FormatConfidence::NONE,
            version: None,
            warnings: vec![reason.to_string()],
        }
    }

    fn from_detection(parser: ParserKind, detection: FormatDetection) -> Self {
        Self {
            parser: Some(parser),
            confidence: detection.confidence,
            version: detection.version,
            warnings: detection.warnings,
        }
    }

    /// Whether the detection is confident enough to parse
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.parser.is_some() && self.confidence.value() >= MIN_CONFIDENCE_THRESHOLD
    }
}

/// Picks the parser for a piece of SBOM content.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    cyclonedx: CycloneDxParser,
    spdx: SpdxParser,
    min_confidence: f32,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDetector {
    /// Create a detector with the default threshold
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cyclonedx: CycloneDxParser::new(),
            spdx: SpdxParser::new(),
            min_confidence: MIN_CONFIDENCE_THRESHOLD,
        }
    }

    /// Create a detector with a custom confidence threshold
    #[must_use]
    pub fn with_threshold(min_confidence: f32) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
            ..Self::new()
        }
    }

    /// Run every parser's detection over the content
    #[must_use]
    pub fn detect_from_content(&self, content: &str) -> DetectionResult {
        let cdx_detection = self.cyclonedx.detect(content);
        let spdx_detection = self.spdx.detect(content);
        self.select_best_parser(cdx_detection, spdx_detection)
    }

    fn select_best_parser(
        &self,
        cdx_detection: FormatDetection,
        spdx_detection: FormatDetection,
    ) -> DetectionResult {
        let cdx_conf = cdx_detection.confidence.value();
        let spdx_conf = spdx_detection.confidence.value();

        tracing::debug!(
            "Format detection: CycloneDX={:.2}, SPDX={:.2}, threshold={:.2}",
            cdx_conf,
            spdx_conf,
            self.min_confidence
        );

        if cdx_conf >= self.min_confidence && cdx_conf > spdx_conf {
            DetectionResult::from_detection(ParserKind::CycloneDx, cdx_detection)
        } else if spdx_conf >= self.min_confidence {
            DetectionResult::from_detection(ParserKind::Spdx, spdx_detection)
        } else {
            let mut result =
                DetectionResult::unknown("Could not detect SBOM format with sufficient confidence");
            for (name, conf) in [("CycloneDX", cdx_conf), ("SPDX", spdx_conf)] {
                if conf > 0.0 {
                    result.warnings.push(format!(
                        "{name} detection: {:.0}% confidence (threshold: {:.0}%)",
                        conf * 100.0,
                        self.min_confidence * 100.0
                    ));
                }
            }
            result
        }
    }

    /// Detect and parse in one step
    pub fn parse_str(&self, content: &str) -> Result<Sbom, ParseError> {
        let detection = self.detect_from_content(content);

        for warning in &detection.warnings {
            tracing::warn!("{}", warning);
        }

        match detection.parser {
            Some(ParserKind::CycloneDx) if detection.can_parse() => {
                self.cyclonedx.parse_str(content)
            }
            Some(ParserKind::Spdx) if detection.can_parse() => self.spdx.parse_str(content),
            _ => Err(ParseError::UnknownFormat(
                "Could not detect SBOM format. Expected CycloneDX or SPDX.".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cyclonedx_json() {
        let detector = FormatDetector::new();
        let content = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5"}"#;
        let result = detector.detect_from_content(content);

        assert_eq!(result.parser, Some(ParserKind::CycloneDx));
        assert!(result.can_parse());
        assert_eq!(result.version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_detect_spdx_json() {
        let detector = FormatDetector::new();
        let content = r#"{"spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT"}"#;
        let result = detector.detect_from_content(content);

        assert_eq!(result.parser, Some(ParserKind::Spdx));
        assert!(result.can_parse());
    }

    #[test]
    fn test_no_default_bias() {
        let detector = FormatDetector::new();
        let result = detector.detect_from_content(r#"{"data": "test"}"#);

        assert!(result.parser.is_none());
        assert!(!result.can_parse());
        assert!(matches!(
            detector.parse_str(r#"{"data": "test"}"#),
            Err(ParseError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_threshold_enforcement() {
        let detector = FormatDetector::with_threshold(0.9);
        let content = r#"{"specVersion": "1.5", "components": []}"#;
        let result = detector.detect_from_content(content);
        assert!(result.parser.is_none());
    }
}
