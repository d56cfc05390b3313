//! Scoring result types.

use crate::evaluators::FeatureScore;
use crate::formulas::Grade;
use serde::Serialize;

/// Outcome of one feature on one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureResult {
    pub key: String,
    pub weight: f64,
    pub score: f64,
    pub ignored: bool,
    pub description: String,
}

impl FeatureResult {
    /// Attach key and weight to an evaluator outcome
    pub fn new(key: impl Into<String>, weight: f64, outcome: FeatureScore) -> Self {
        Self {
            key: key.into(),
            weight,
            score: outcome.score,
            ignored: outcome.ignored,
            description: outcome.description,
        }
    }
}

/// Aggregated category outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub key: String,
    pub name: String,
    pub weight: f64,
    pub score: f64,
    pub features: Vec<FeatureResult>,
}

/// One checklist entry of a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileItemResult {
    pub key: String,
    pub name: String,
    pub required: bool,
    pub score: f64,
    pub ignored: bool,
    pub description: String,
}

impl ProfileItemResult {
    /// Full marks only; partial credit is not compliance
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        !self.ignored && self.score >= 10.0
    }
}

/// Aggregated profile outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResult {
    pub key: String,
    pub name: String,
    pub score: f64,
    pub grade: Grade,
    pub items: Vec<ProfileItemResult>,
    pub required_total: usize,
    pub required_compliant: usize,
    pub optional_total: usize,
    pub optional_present: usize,
}

/// Per-category or per-profile detail; exactly one kind per run mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakdown {
    Categories(Vec<CategoryResult>),
    Profiles(Vec<ProfileResult>),
}

/// Final per-document report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub filename: String,
    pub num_components: usize,
    pub creation_time: Option<String>,
    pub spec: String,
    pub spec_version: String,
    pub file_format: String,
    pub interlynk_score: f64,
    pub grade: Grade,
    #[serde(flatten)]
    pub breakdown: Breakdown,
}

impl ScoreResult {
    /// Category breakdown, if scored in comprehensive mode
    #[must_use]
    pub fn categories(&self) -> Option<&[CategoryResult]> {
        match &self.breakdown {
            Breakdown::Categories(c) => Some(c),
            Breakdown::Profiles(_) => None,
        }
    }

    /// Profile breakdown, if scored in compliance mode
    #[must_use]
    pub fn profiles(&self) -> Option<&[ProfileResult]> {
        match &self.breakdown {
            Breakdown::Profiles(p) => Some(p),
            Breakdown::Categories(_) => None,
        }
    }
}
