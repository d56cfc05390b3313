//! Aggregation formulas and grade mapping.
//!
//! All aggregates are weighted means on the 0-10 scale. Ignored (not
//! applicable) features drop out of both numerator and denominator, which
//! renormalizes the remaining weights.

use crate::engine::{CategoryResult, FeatureResult, ProfileItemResult};
use serde::{Deserialize, Serialize};

/// Maximum score on the 0-10 scale
pub const MAX_SCORE: f64 = 10.0;

/// Score for a per-component rule: the share of matching components on the
/// 0-10 scale. Zero components yield 0.
#[must_use]
pub fn per_component_score(matching: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let matching = matching.min(total);
    (matching as f64 * MAX_SCORE) / total as f64
}

/// Weighted mean of `(score, weight)` pairs; 0 when the total weight is 0.
#[must_use]
pub fn weighted_mean(items: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (sum, total_weight) = items
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), (score, weight)| {
            (sum + score * weight, total + weight)
        });

    if total_weight <= 0.0 {
        return 0.0;
    }
    let score = sum / total_weight;
    if score.is_finite() {
        score.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

/// Category score over non-ignored features.
#[must_use]
pub fn category_score(features: &[FeatureResult]) -> f64 {
    weighted_mean(
        features
            .iter()
            .filter(|f| !f.ignored)
            .map(|f| (f.score, f.weight)),
    )
}

/// Overall score over the categories that were scored.
#[must_use]
pub fn overall_score(categories: &[CategoryResult]) -> f64 {
    weighted_mean(categories.iter().map(|c| (c.score, c.weight)))
}

/// Profile score: equal-weight mean over non-ignored items.
#[must_use]
pub fn profile_score(items: &[ProfileItemResult]) -> f64 {
    mean_score(items.iter().filter(|i| !i.ignored).map(|i| i.score))
}

/// Equal-weight mean; 0 for an empty input.
#[must_use]
pub fn mean_score(scores: impl IntoIterator<Item = f64>) -> f64 {
    weighted_mean(scores.into_iter().map(|s| (s, 1.0)))
}

/// Letter grade derived from a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 9.0 and above
    A,
    /// 8.0 to below 9.0
    B,
    /// 7.0 to below 8.0
    C,
    /// 5.0 to below 7.0
    D,
    /// below 5.0
    F,
}

impl Grade {
    /// Map a score to its grade band (closed lower bounds)
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::A
        } else if score >= 8.0 {
            Self::B
        } else if score >= 7.0 {
            Self::C
        } else if score >= 5.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Grade letter
    #[must_use]
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(weight: f64, score: f64, ignored: bool) -> FeatureResult {
        FeatureResult {
            key: "f".to_string(),
            weight,
            score,
            ignored,
            description: String::new(),
        }
    }

    #[test]
    fn test_category_score_renormalizes() {
        let features = [
            feature(0.40, 10.0, false),
            feature(0.35, 9.5, true),
            feature(0.25, 8.2, false),
        ];
        let expected = (10.0 * 0.40 + 8.2 * 0.25) / 0.65;
        assert!((category_score(&features) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_category_score_all_ignored_is_zero() {
        let features = [feature(0.5, 10.0, true), feature(0.5, 10.0, true)];
        assert_eq!(category_score(&features), 0.0);
        assert_eq!(category_score(&[]), 0.0);
    }

    #[test]
    fn test_per_component_score() {
        assert_eq!(per_component_score(80, 100), 8.0);
        assert_eq!(per_component_score(0, 0), 0.0);
        assert_eq!(per_component_score(3, 3), 10.0);
    }

    #[test]
    fn test_weighted_mean() {
        let score = weighted_mean([(9.0, 10.0), (7.0, 12.0)]);
        assert!((score - 7.909_090_909).abs() < 1e-6);
        assert_eq!(weighted_mean([(5.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_grade_boundaries() {
        let cases = [
            (10.0, Grade::A),
            (9.0, Grade::A),
            (8.99, Grade::B),
            (8.0, Grade::B),
            (7.99, Grade::C),
            (7.0, Grade::C),
            (6.0, Grade::D),
            (5.0, Grade::D),
            (4.99, Grade::F),
            (0.0, Grade::F),
        ];
        for (score, grade) in cases {
            assert_eq!(Grade::from_score(score), grade, "score {score}");
        }
    }

    #[test]
    fn test_mean_score() {
        assert_eq!(mean_score([10.0, 5.0]), 7.5);
        assert_eq!(mean_score(std::iter::empty()), 0.0);
    }
}
