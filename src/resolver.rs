//! Rule selection.
//!
//! The [`Resolver`] turns user-supplied category, feature and profile names
//! into canonical keys and computes the [`ScoringPlan`] for a run. Names go
//! through the catalog alias tables; the plan keeps the catalog's canonical
//! order, never the order the user typed.

use crate::catalog::{normalize_name, Catalog, Namespace};
use crate::config::{CategoryEntry, Config, ConfigFile, ProfileEntry, Validatable};
use crate::error::{Result, ScoreError};
use serde::Serialize;

/// A feature selected for scoring, with its effective weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedFeature {
    pub key: String,
    pub name: String,
    pub weight: f64,
}

/// A category selected for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCategory {
    pub key: String,
    pub name: String,
    pub weight: f64,
    pub features: Vec<PlannedFeature>,
}

/// A profile checklist entry selected for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedProfileItem {
    pub key: String,
    pub name: String,
    pub required: bool,
    pub description: String,
}

/// A profile selected for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedProfile {
    pub key: String,
    pub name: String,
    pub items: Vec<PlannedProfileItem>,
}

/// Resolved selection for one run. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPlan {
    Comprehensive(Vec<PlannedCategory>),
    Compliance(Vec<PlannedProfile>),
}

impl ScoringPlan {
    /// Number of rule evaluations one document costs
    #[must_use]
    pub fn rule_count(&self) -> usize {
        match self {
            Self::Comprehensive(categories) => categories.iter().map(|c| c.features.len()).sum(),
            Self::Compliance(profiles) => profiles.iter().map(|p| p.items.len()).sum(),
        }
    }

    /// Whether the plan scores against compliance profiles
    #[must_use]
    pub const fn is_compliance(&self) -> bool {
        matches!(self, Self::Compliance(_))
    }
}

/// Computes scoring plans against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `catalog`
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Every catalog category with its default weights
    #[must_use]
    pub fn default_categories(&self) -> Vec<PlannedCategory> {
        self.catalog
            .categories()
            .map(|category| PlannedCategory {
                key: category.key.clone(),
                name: category.name.clone(),
                weight: category.weight,
                features: category
                    .features
                    .iter()
                    .map(|member| PlannedFeature {
                        key: member.key.clone(),
                        name: self
                            .catalog
                            .feature(&member.key)
                            .map_or_else(|| member.key.clone(), |f| f.name.clone()),
                        weight: member.weight,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Intersection filter over `categories`.
    ///
    /// A category survives when it matches `category_names` (or that filter
    /// is empty) and keeps at least one feature matching `feature_names` (or
    /// that filter is empty). Unknown names match nothing. Blank entries are
    /// ignored, so a filter of only blanks is no filter. Order is preserved.
    #[must_use]
    pub fn filter_categories(
        &self,
        categories: Vec<PlannedCategory>,
        category_names: &[String],
        feature_names: &[String],
    ) -> Vec<PlannedCategory> {
        let category_filter = self.canonical_names(Namespace::Category, category_names);
        let feature_filter = self.canonical_names(Namespace::Feature, feature_names);

        if category_filter.is_empty() && feature_filter.is_empty() {
            return categories;
        }

        categories
            .into_iter()
            .filter(|category| {
                category_filter.is_empty()
                    || category_filter.contains(&normalize_name(&category.key))
                    || category_filter.contains(&normalize_name(&category.name))
            })
            .filter_map(|mut category| {
                if !feature_filter.is_empty() {
                    category
                        .features
                        .retain(|f| feature_filter.contains(&normalize_name(&f.key)));
                }
                (!category.features.is_empty()).then_some(category)
            })
            .collect()
    }

    /// Normalized filter entries, mapped through the alias table when the
    /// name is known there.
    fn canonical_names(&self, namespace: Namespace, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| {
                self.catalog
                    .resolve(namespace, n)
                    .map_or_else(|| normalize_name(n), normalize_name)
            })
            .collect()
    }

    /// Compute the plan for a run.
    ///
    /// A supplied config file replaces the catalog defaults (ignored entries
    /// dropped) before the user filters apply.
    pub fn plan(&self, config: &Config, file: Option<&ConfigFile>) -> Result<ScoringPlan> {
        let errors = config.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ScoreError::config(joined));
        }

        let file_profiles_only =
            file.is_some_and(|f| !f.profiles.is_empty() && f.categories.is_empty());

        let plan = if config.is_compliance() || (file_profiles_only && !config.has_filters()) {
            ScoringPlan::Compliance(self.plan_profiles(config, file)?)
        } else {
            ScoringPlan::Comprehensive(self.plan_categories(config, file)?)
        };

        if plan.rule_count() == 0 {
            return Err(ScoreError::config("selection resolves to no rules"));
        }

        tracing::debug!(
            compliance = plan.is_compliance(),
            rules = plan.rule_count(),
            "Scoring plan resolved"
        );
        Ok(plan)
    }

    fn plan_categories(
        &self,
        config: &Config,
        file: Option<&ConfigFile>,
    ) -> Result<Vec<PlannedCategory>> {
        let base = match file {
            Some(file) if !file.categories.is_empty() => file
                .categories
                .iter()
                .filter(|c| !c.ignore)
                .map(|c| self.category_from_entry(c))
                .filter(|c| !c.features.is_empty())
                .collect(),
            _ => self.default_categories(),
        };

        self.check_names(Namespace::Category, &config.categories, |name| {
            let name = normalize_name(name);
            base.iter()
                .any(|c| normalize_name(&c.key) == name || normalize_name(&c.name) == name)
        })?;
        self.check_names(Namespace::Feature, &config.features, |name| {
            let name = normalize_name(name);
            base.iter()
                .flat_map(|c| &c.features)
                .any(|f| normalize_name(&f.key) == name)
        })?;

        let filtered = self.filter_categories(base, &config.categories, &config.features);
        if filtered.is_empty() {
            return Err(ScoreError::config(
                "category and feature filters leave nothing to score",
            ));
        }
        Ok(filtered)
    }

    fn category_from_entry(&self, entry: &CategoryEntry) -> PlannedCategory {
        let features = entry
            .features
            .iter()
            .filter(|f| !f.ignore)
            .filter_map(|f| match self.catalog.resolve_feature(&f.key) {
                Some(key) => Some(PlannedFeature {
                    key: key.to_string(),
                    name: f.name.clone(),
                    weight: f.weight,
                }),
                None => {
                    tracing::warn!(
                        "Config file feature '{}' in category '{}' is unknown; dropping it",
                        f.key,
                        entry.key
                    );
                    None
                }
            })
            .collect();

        PlannedCategory {
            key: self
                .catalog
                .resolve_category(&entry.key)
                .map_or_else(|| entry.key.clone(), str::to_string),
            name: entry.name.clone(),
            weight: entry.weight,
            features,
        }
    }

    fn plan_profiles(
        &self,
        config: &Config,
        file: Option<&ConfigFile>,
    ) -> Result<Vec<PlannedProfile>> {
        let overrides: Vec<PlannedProfile> = file
            .map(|f| {
                f.profiles
                    .iter()
                    .map(|p| self.profile_from_entry(p))
                    .filter(|p| !p.items.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if !config.is_compliance() {
            return Ok(overrides);
        }

        let lookup = |name: &str| -> Option<PlannedProfile> {
            let canonical = self
                .catalog
                .resolve_profile(name)
                .map_or_else(|| normalize_name(name), str::to_string);
            overrides
                .iter()
                .find(|p| normalize_name(&p.key) == normalize_name(&canonical))
                .cloned()
                .or_else(|| self.catalog_profile(&canonical))
        };

        self.check_names(Namespace::Profile, &config.profiles, |name| {
            lookup(name).is_some()
        })?;

        // Catalog order first, then config-file-only profiles in file order.
        let mut wanted: Vec<PlannedProfile> = Vec::new();
        for name in config.profiles.iter().filter(|n| !n.trim().is_empty()) {
            if let Some(profile) = lookup(name) {
                if !wanted.iter().any(|p| p.key == profile.key) {
                    wanted.push(profile);
                }
            }
        }
        let position = |key: &str| {
            self.catalog
                .profiles()
                .position(|p| p.key == key)
                .unwrap_or(usize::MAX)
        };
        wanted.sort_by_key(|p| position(&p.key));
        Ok(wanted)
    }

    fn catalog_profile(&self, key: &str) -> Option<PlannedProfile> {
        let profile = self.catalog.profile(key)?;
        Some(PlannedProfile {
            key: profile.key.clone(),
            name: profile.name.clone(),
            items: profile
                .items
                .iter()
                .map(|item| {
                    let spec = self.catalog.profile_feature(&item.key);
                    PlannedProfileItem {
                        key: item.key.clone(),
                        name: spec.map_or_else(|| item.key.clone(), |f| f.name.clone()),
                        required: item.required,
                        description: spec.map(|f| f.description.clone()).unwrap_or_default(),
                    }
                })
                .collect(),
        })
    }

    fn profile_from_entry(&self, entry: &ProfileEntry) -> PlannedProfile {
        let items = entry
            .features
            .iter()
            .filter_map(|item| match self.catalog.resolve_profile_feature(&item.key) {
                Some(key) => Some(PlannedProfileItem {
                    key: key.to_string(),
                    name: item.name.clone(),
                    required: item.required,
                    description: item.description.clone(),
                }),
                None => {
                    tracing::warn!(
                        "Config file profile feature '{}' in profile '{}' is unknown; dropping it",
                        item.key,
                        entry.key
                    );
                    None
                }
            })
            .collect();

        PlannedProfile {
            key: self
                .catalog
                .resolve_profile(&entry.key)
                .map_or_else(|| entry.key.clone(), str::to_string),
            name: entry.name.clone(),
            items,
        }
    }

    /// Warn about each unknown name; fail when a non-empty filter has no
    /// known name at all.
    fn check_names(
        &self,
        namespace: Namespace,
        names: &[String],
        is_known: impl Fn(&str) -> bool,
    ) -> Result<()> {
        let mut supplied = 0usize;
        let mut known = 0usize;
        for name in names.iter().filter(|n| !n.trim().is_empty()) {
            supplied += 1;
            let resolved = self.catalog.resolve(namespace, name).unwrap_or(name);
            if is_known(resolved) || is_known(name) {
                known += 1;
            } else {
                tracing::warn!("Unknown {namespace} '{}'; ignoring it", name.trim());
            }
        }

        if supplied > 0 && known == 0 {
            return Err(ScoreError::config(format!(
                "none of the requested {namespace} names are known: {}",
                names.join(", ")
            )));
        }
        Ok(())
    }
}
