//! Scoring engine.
//!
//! A batch run moves through these stages:
//!
//! 1. validate the input paths
//! 2. validate the configuration and resolve a [`ScoringPlan`]
//! 3. for each path: open, parse, evaluate the planned rules, aggregate,
//!    and collect the [`ScoreResult`]
//!
//! Configuration problems abort the batch before any document is opened.
//! Per-document failures are logged and skipped; the batch only fails when
//! no document could be scored at all.

mod cancel;
mod result;

pub use cancel::CancelToken;
pub use result::{
    Breakdown, CategoryResult, FeatureResult, ProfileItemResult, ProfileResult, ScoreResult,
};

use crate::catalog::Catalog;
use crate::config::{load_config_file, Config};
use crate::error::{Result, ScoreError};
use crate::evaluators::FeatureScore;
use crate::formulas::{category_score, mean_score, overall_score, profile_score, Grade};
use crate::model::Document;
use crate::pipeline::{load_document, resolve_sources, LoadedDocument};
use crate::resolver::{PlannedCategory, PlannedProfile, Resolver, ScoringPlan};
use crate::signature::SignatureVerifier;
use rayon::prelude::*;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

/// Drives scoring passes over a shared, read-only catalog.
#[derive(Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    verifier: Option<Arc<dyn SignatureVerifier>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("catalog", &self.catalog)
            .field("verifier", &self.verifier.is_some())
            .finish()
    }
}

impl Engine {
    /// Create an engine over `catalog`
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            verifier: None,
        }
    }

    /// Engine over the built-in catalog
    pub fn standard() -> Result<Self> {
        Ok(Self::new(Arc::new(Catalog::standard()?)))
    }

    /// Verify signature bundles with `verifier`
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// The catalog this engine scores against
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve the plan for `config`, loading its config file if one is set
    pub fn plan(&self, config: &Config) -> Result<ScoringPlan> {
        let file = config
            .config_file
            .as_deref()
            .map(load_config_file)
            .transpose()?;
        Resolver::new(&self.catalog).plan(config, file.as_ref())
    }

    /// Score every document named by `paths`.
    ///
    /// Paths may be files, directories (walked recursively) or URLs.
    pub fn score_paths<P: AsRef<str>>(
        &self,
        config: &Config,
        paths: &[P],
        cancel: &CancelToken,
    ) -> Result<Vec<ScoreResult>> {
        let inputs: Vec<&str> = paths
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .collect();
        if inputs.is_empty() {
            return Err(ScoreError::config("no input paths given"));
        }

        let plan = self.plan(config)?;

        let mut results = Vec::new();
        let mut attempted = 0usize;
        for input in inputs {
            cancel.check()?;
            let sources = match resolve_sources(input, cancel) {
                Ok(sources) => sources,
                Err(e) => {
                    attempted += 1;
                    skip_failed(ScoreError::document(input, e))?;
                    continue;
                }
            };

            for source in sources {
                cancel.check()?;
                attempted += 1;
                let timeout = cancel
                    .remaining()
                    .map_or(config.fetch_timeout, |left| left.min(config.fetch_timeout));
                match load_document(
                    &source,
                    timeout,
                    config.signature_bundle.as_ref(),
                    self.verifier.as_deref(),
                ) {
                    Ok(doc) => {
                        let result = self.evaluate(&plan, &doc.sbom, &doc.name, || cancel.check())?;
                        tracing::info!(
                            "{}: {:.1} ({})",
                            result.filename,
                            result.interlynk_score,
                            result.grade
                        );
                        results.push(result);
                    }
                    Err(e) => skip_failed(ScoreError::document(source.display_name(), e))?,
                }
            }
        }

        if results.is_empty() {
            return Err(ScoreError::NoDocumentsScored { attempted });
        }
        tracing::debug!("Scored {} of {} documents", results.len(), attempted);
        Ok(results)
    }

    /// Score an in-memory document against a resolved plan
    #[must_use]
    pub fn score_document(
        &self,
        plan: &ScoringPlan,
        doc: &dyn Document,
        filename: &str,
    ) -> ScoreResult {
        match self.evaluate(plan, doc, filename, || Ok::<(), Infallible>(())) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Score an in-memory document, stopping between rules once `cancel`
    /// fires
    pub fn score_document_cancellable(
        &self,
        plan: &ScoringPlan,
        doc: &dyn Document,
        filename: &str,
        cancel: &CancelToken,
    ) -> Result<ScoreResult> {
        self.evaluate(plan, doc, filename, || cancel.check())
    }

    /// Score loaded documents in parallel; output order matches input order
    #[must_use]
    pub fn score_documents_parallel(
        &self,
        plan: &ScoringPlan,
        docs: &[LoadedDocument],
    ) -> Vec<ScoreResult> {
        docs.par_iter()
            .map(|doc| self.score_document(plan, &doc.sbom, &doc.name))
            .collect()
    }

    fn evaluate<E>(
        &self,
        plan: &ScoringPlan,
        doc: &dyn Document,
        filename: &str,
        checkpoint: impl Fn() -> std::result::Result<(), E>,
    ) -> std::result::Result<ScoreResult, E> {
        let (score, breakdown) = match plan {
            ScoringPlan::Comprehensive(categories) => {
                let results = categories
                    .iter()
                    .map(|c| self.evaluate_category(c, doc, &checkpoint))
                    .collect::<std::result::Result<Vec<_>, E>>()?;
                (overall_score(&results), Breakdown::Categories(results))
            }
            ScoringPlan::Compliance(profiles) => {
                let results = profiles
                    .iter()
                    .map(|p| self.evaluate_profile(p, doc, &checkpoint))
                    .collect::<std::result::Result<Vec<_>, E>>()?;
                let score = mean_score(results.iter().map(|p| p.score));
                (score, Breakdown::Profiles(results))
            }
        };

        let spec = doc.spec();
        Ok(ScoreResult {
            filename: filename.to_string(),
            num_components: doc.components().len(),
            creation_time: spec
                .created_raw
                .clone()
                .or_else(|| spec.created.map(|t| t.to_rfc3339())),
            spec: spec.name().to_string(),
            spec_version: spec.version.clone(),
            file_format: spec.file_format.to_string(),
            interlynk_score: score,
            grade: Grade::from_score(score),
            breakdown,
        })
    }

    fn evaluate_category<E>(
        &self,
        category: &PlannedCategory,
        doc: &dyn Document,
        checkpoint: &impl Fn() -> std::result::Result<(), E>,
    ) -> std::result::Result<CategoryResult, E> {
        let mut features = Vec::with_capacity(category.features.len());
        for feature in &category.features {
            checkpoint()?;
            let outcome = self.catalog.feature(&feature.key).map_or_else(
                || missing_evaluator(&feature.key),
                |spec| spec.evaluate(doc),
            );
            features.push(FeatureResult::new(&feature.key, feature.weight, outcome));
        }

        Ok(CategoryResult {
            key: category.key.clone(),
            name: category.name.clone(),
            weight: category.weight,
            score: category_score(&features),
            features,
        })
    }

    fn evaluate_profile<E>(
        &self,
        profile: &PlannedProfile,
        doc: &dyn Document,
        checkpoint: &impl Fn() -> std::result::Result<(), E>,
    ) -> std::result::Result<ProfileResult, E> {
        let mut items = Vec::with_capacity(profile.items.len());
        for item in &profile.items {
            checkpoint()?;
            let outcome = self.catalog.profile_feature(&item.key).map_or_else(
                || missing_evaluator(&item.key),
                |spec| spec.evaluate(doc),
            );
            items.push(ProfileItemResult {
                key: item.key.clone(),
                name: item.name.clone(),
                required: item.required,
                score: outcome.score,
                ignored: outcome.ignored,
                description: outcome.description,
            });
        }

        let score = profile_score(&items);
        let (required, optional): (Vec<_>, Vec<_>) = items.iter().partition(|i| i.required);
        Ok(ProfileResult {
            key: profile.key.clone(),
            name: profile.name.clone(),
            score,
            grade: Grade::from_score(score),
            required_total: required.len(),
            required_compliant: required.iter().filter(|i| i.is_compliant()).count(),
            optional_total: optional.len(),
            optional_present: optional.iter().filter(|i| i.is_compliant()).count(),
            items,
        })
    }
}

fn missing_evaluator(key: &str) -> FeatureScore {
    tracing::warn!("No evaluator registered for '{key}'");
    FeatureScore::fail(format!("no evaluator registered for '{key}'"))
}

/// Log a per-document failure, unless it is a cancellation.
fn skip_failed(err: ScoreError) -> Result<()> {
    if matches!(err, ScoreError::Cancelled) {
        return Err(err);
    }
    tracing::warn!("Skipping: {err}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Component, FileFormat, Sbom, SpecInfo, SpecType};

    fn engine() -> Engine {
        Engine::standard().expect("standard engine")
    }

    fn sample() -> Sbom {
        let mut spec = SpecInfo::new(SpecType::CycloneDx, FileFormat::Json);
        spec.version = "1.5".to_string();
        let mut sbom = Sbom::new(spec);
        sbom.add_component(Component::new("a", "a").with_version("1.0"));
        sbom.add_component(Component::new("b", "b"));
        sbom.authors.push(Author::person("Jane"));
        sbom
    }

    #[test]
    fn test_category_filter_plan_scores_one_category() {
        let engine = engine();
        let config = Config::builder().categories(["identification"]).build();
        let plan = engine.plan(&config).unwrap();
        let result = engine.score_document(&plan, &sample(), "mem");

        let categories = result.categories().expect("comprehensive breakdown");
        assert_eq!(categories.len(), 1);
        // names 10, versions 5, identifiers 0
        let expected = (10.0 * 0.40 + 5.0 * 0.35) / 1.0;
        assert!((categories[0].score - expected).abs() < 1e-9);
        assert!((result.interlynk_score - expected).abs() < 1e-9);
        assert_eq!(result.num_components, 2);
        assert!(result.profiles().is_none());
    }

    #[test]
    fn test_empty_document_all_per_component_rules_ignored() {
        let engine = engine();
        let config = Config::builder().categories(["vulnerability"]).build();
        let plan = engine.plan(&config).unwrap();
        let empty = Sbom::new(SpecInfo::new(SpecType::Spdx, FileFormat::Json));
        let result = engine.score_document(&plan, &empty, "empty");
        let category = &result.categories().unwrap()[0];
        assert!(category.features.iter().all(|f| f.ignored));
        assert_eq!(category.score, 0.0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_profile_counts() {
        let engine = engine();
        let config = Config::builder().profiles(["ntia"]).build();
        let plan = engine.plan(&config).unwrap();
        let result = engine.score_document(&plan, &sample(), "mem");
        let profile = &result.profiles().expect("profile breakdown")[0];
        assert_eq!(profile.required_total, 7);
        assert_eq!(profile.optional_total, 0);
        assert!(profile.required_compliant < profile.required_total);
        assert!(profile.items.iter().any(|i| i.key == "comp_name" && i.is_compliant()));
        assert_eq!(result.interlynk_score, profile.score);
    }

    #[test]
    fn test_cancelled_document_scoring() {
        let engine = engine();
        let plan = engine.plan(&Config::default()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = engine.score_document_cancellable(&plan, &sample(), "mem", &cancel);
        assert!(matches!(result, Err(ScoreError::Cancelled)));
    }

    #[test]
    fn test_missing_evaluator_scores_zero() {
        let engine = engine();
        let plan = ScoringPlan::Comprehensive(vec![PlannedCategory {
            key: "custom".to_string(),
            name: "Custom".to_string(),
            weight: 1.0,
            features: vec![crate::resolver::PlannedFeature {
                key: "not_registered".to_string(),
                name: "Not registered".to_string(),
                weight: 1.0,
            }],
        }]);
        let result = engine.score_document(&plan, &sample(), "mem");
        let feature = &result.categories().unwrap()[0].features[0];
        assert_eq!(feature.score, 0.0);
        assert!(!feature.ignored);
    }

    #[test]
    fn test_empty_paths_is_config_error() {
        let result = engine().score_paths(&Config::default(), &["  "], &CancelToken::new());
        assert!(matches!(result, Err(ScoreError::Config(_))));
    }

    #[test]
    fn test_parallel_preserves_order() {
        let engine = engine();
        let plan = engine.plan(&Config::default()).unwrap();
        let docs: Vec<_> = (0..4)
            .map(|i| LoadedDocument {
                name: format!("doc-{i}"),
                sbom: sample(),
            })
            .collect();
        let results = engine.score_documents_parallel(&plan, &docs);
        let names: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["doc-0", "doc-1", "doc-2", "doc-3"]);
    }
}
