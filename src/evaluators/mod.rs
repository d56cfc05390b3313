//! Feature evaluators.
//!
//! Each feature key in the catalog is backed by one [`FeatureEvaluator`].
//! Evaluators are pure functions of a [`Document`]: they never fail, and
//! represent anything unexpected as a low score or as "not applicable".

mod components;
mod licensing;
mod profile;
mod sbom;

pub use components::*;
pub use licensing::*;
pub use profile::*;
pub use sbom::*;

use crate::formulas::{per_component_score, MAX_SCORE};
use crate::model::{Component, Document};
use serde::{Deserialize, Serialize};

/// Raw outcome of evaluating one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// Score in `[0, 10]`
    pub score: f64,
    /// Short human readable explanation
    pub description: String,
    /// The rule does not apply to this document
    pub ignored: bool,
}

impl FeatureScore {
    /// A scored result; the score is clamped into range and NaN becomes 0
    pub fn new(score: f64, description: impl Into<String>) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, MAX_SCORE)
        };
        Self {
            score,
            description: description.into(),
            ignored: false,
        }
    }

    /// Full marks
    pub fn pass(description: impl Into<String>) -> Self {
        Self::new(MAX_SCORE, description)
    }

    /// Zero
    pub fn fail(description: impl Into<String>) -> Self {
        Self::new(0.0, description)
    }

    /// 10 when `ok`, 0 otherwise
    pub fn check(ok: bool, description: impl Into<String>) -> Self {
        if ok {
            Self::pass(description)
        } else {
            Self::fail(description)
        }
    }

    /// Not applicable to this document
    pub fn not_applicable(description: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            description: description.into(),
            ignored: true,
        }
    }
}

/// Strategy for scoring one feature.
pub trait FeatureEvaluator: Send + Sync {
    /// Evaluate the document
    fn evaluate(&self, doc: &dyn Document) -> FeatureScore;
}

impl<F> FeatureEvaluator for F
where
    F: Fn(&dyn Document) -> FeatureScore + Send + Sync,
{
    fn evaluate(&self, doc: &dyn Document) -> FeatureScore {
        self(doc)
    }
}

/// Share of components satisfying `pred`, as a feature score.
///
/// Not applicable when the document has no components.
pub fn per_component(
    doc: &dyn Document,
    what: &str,
    pred: impl Fn(&Component) -> bool,
) -> FeatureScore {
    let components = doc.components();
    let total = components.len();
    if total == 0 {
        return FeatureScore::not_applicable("no components");
    }
    let matching = components.iter().filter(|c| pred(c)).count();
    FeatureScore::new(
        per_component_score(matching, total),
        format!("{matching}/{total} {what}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFormat, Sbom, SpecInfo, SpecType};

    #[test]
    fn test_feature_score_clamps() {
        assert_eq!(FeatureScore::new(12.5, "").score, 10.0);
        assert_eq!(FeatureScore::new(-1.0, "").score, 0.0);
        assert_eq!(FeatureScore::new(f64::NAN, "").score, 0.0);
    }

    #[test]
    fn test_closure_is_evaluator() {
        let eval = |doc: &dyn Document| FeatureScore::check(doc.tools().is_empty(), "no tools");
        let sbom = Sbom::new(SpecInfo::new(SpecType::Spdx, FileFormat::Json));
        let boxed: Box<dyn FeatureEvaluator> = Box::new(eval);
        assert_eq!(boxed.evaluate(&sbom).score, 10.0);
    }

    #[test]
    fn test_per_component_empty_is_ignored() {
        let sbom = Sbom::new(SpecInfo::new(SpecType::CycloneDx, FileFormat::Json));
        let result = per_component(&sbom, "with names", |_| true);
        assert!(result.ignored);
        assert_eq!(result.score, 0.0);
    }
}
