//! Rule catalog.
//!
//! The [`Catalog`] is the single source of truth for every feature, category
//! and profile, plus the alias tables that map user spellings onto canonical
//! keys. It is assembled once with a [`CatalogBuilder`], validated, and is
//! read-only afterwards, so one instance can back any number of concurrent
//! scoring passes.
//!
//! ```
//! use sbom_score::catalog::Catalog;
//!
//! let catalog = Catalog::standard().expect("built-in catalog is valid");
//! assert_eq!(catalog.resolve_category("Licenses"), Some("licensing"));
//! assert_eq!(catalog.resolve_profile("NTIA-Minimum-Elements"), Some("ntia"));
//! ```

mod standard;

use crate::evaluators::{FeatureEvaluator, FeatureScore};
use crate::model::Document;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Normalize a user-supplied name for lookup: trim, lowercase, and fold
/// `-`, `.` and spaces to `_`.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '-' | '.' | ' ') { '_' } else { c })
        .collect()
}

/// Key namespaces in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Category,
    Feature,
    ProfileFeature,
    Profile,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Category => "category",
            Self::Feature => "feature",
            Self::ProfileFeature => "profile feature",
            Self::Profile => "profile",
        })
    }
}

/// Catalog construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate {namespace} key '{key}'")]
    DuplicateKey { namespace: Namespace, key: String },

    #[error("{owner} references unknown {namespace} '{key}'")]
    UnknownFeature {
        owner: String,
        namespace: Namespace,
        key: String,
    },

    #[error("{namespace} '{key}' has no features")]
    EmptyGroup { namespace: Namespace, key: String },

    #[error("weight {weight} for '{key}' must be finite and non-negative")]
    InvalidWeight { key: String, weight: f64 },

    #[error("{namespace} alias '{alias}' maps to both '{existing}' and '{requested}'")]
    AliasConflict {
        namespace: Namespace,
        alias: String,
        existing: String,
        requested: String,
    },

    #[error("{namespace} alias '{alias}' targets unknown key '{target}'")]
    UnknownAliasTarget {
        namespace: Namespace,
        alias: String,
        target: String,
    },
}

/// One scoring rule.
#[derive(Clone)]
pub struct FeatureSpec {
    pub key: String,
    pub name: String,
    pub description: String,
    evaluator: Arc<dyn FeatureEvaluator>,
}

impl FeatureSpec {
    /// Run the rule against a document
    pub fn evaluate(&self, doc: &dyn Document) -> FeatureScore {
        self.evaluator.evaluate(doc)
    }
}

impl fmt::Debug for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSpec")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A feature's membership in a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFeature {
    pub key: String,
    pub weight: f64,
}

/// Weighted group of features for comprehensive scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub key: String,
    pub name: String,
    pub weight: f64,
    pub features: Vec<CategoryFeature>,
}

/// A profile checklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileItem {
    pub key: String,
    pub required: bool,
}

/// Named compliance checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSpec {
    pub key: String,
    pub name: String,
    pub description: String,
    pub items: Vec<ProfileItem>,
}

/// Immutable rule registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    features: IndexMap<String, FeatureSpec>,
    profile_features: IndexMap<String, FeatureSpec>,
    categories: IndexMap<String, CategorySpec>,
    profiles: IndexMap<String, ProfileSpec>,
    aliases: HashMap<(Namespace, String), String>,
}

impl Catalog {
    /// The built-in catalog
    pub fn standard() -> Result<Self, CatalogError> {
        standard::builder().build()
    }

    /// Start an empty catalog
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Comprehensive-mode feature by canonical key
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<&FeatureSpec> {
        self.features.get(key)
    }

    /// Profile-mode feature by canonical key
    #[must_use]
    pub fn profile_feature(&self, key: &str) -> Option<&FeatureSpec> {
        self.profile_features.get(key)
    }

    /// Category by canonical key
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&CategorySpec> {
        self.categories.get(key)
    }

    /// Profile by canonical key
    #[must_use]
    pub fn profile(&self, key: &str) -> Option<&ProfileSpec> {
        self.profiles.get(key)
    }

    /// Categories in canonical order
    pub fn categories(&self) -> impl Iterator<Item = &CategorySpec> {
        self.categories.values()
    }

    /// Profiles in canonical order
    pub fn profiles(&self) -> impl Iterator<Item = &ProfileSpec> {
        self.profiles.values()
    }

    /// Comprehensive features in registration order
    pub fn features(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.values()
    }

    /// Resolve any accepted spelling to a canonical key
    #[must_use]
    pub fn resolve(&self, namespace: Namespace, name: &str) -> Option<&str> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        self.aliases
            .get(&(namespace, normalized))
            .map(String::as_str)
    }

    /// Resolve a category name or alias
    #[must_use]
    pub fn resolve_category(&self, name: &str) -> Option<&str> {
        self.resolve(Namespace::Category, name)
    }

    /// Resolve a comprehensive feature key or alias
    #[must_use]
    pub fn resolve_feature(&self, name: &str) -> Option<&str> {
        self.resolve(Namespace::Feature, name)
    }

    /// Resolve a profile feature key or alias
    #[must_use]
    pub fn resolve_profile_feature(&self, name: &str) -> Option<&str> {
        self.resolve(Namespace::ProfileFeature, name)
    }

    /// Resolve a profile name or alias
    #[must_use]
    pub fn resolve_profile(&self, name: &str) -> Option<&str> {
        self.resolve(Namespace::Profile, name)
    }

    /// Whether a name resolves in the namespace
    #[must_use]
    pub fn contains(&self, namespace: Namespace, name: &str) -> bool {
        self.resolve(namespace, name).is_some()
    }
}

/// Assembles and validates a [`Catalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    features: Vec<FeatureSpec>,
    profile_features: Vec<FeatureSpec>,
    categories: Vec<CategorySpec>,
    profiles: Vec<ProfileSpec>,
    aliases: Vec<(Namespace, String, String)>,
}

impl CatalogBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn spec(
        key: &str,
        name: &str,
        description: &str,
        evaluator: impl FeatureEvaluator + 'static,
    ) -> FeatureSpec {
        FeatureSpec {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            evaluator: Arc::new(evaluator),
        }
    }

    /// Register a comprehensive-mode feature
    #[must_use]
    pub fn feature(
        mut self,
        key: &str,
        name: &str,
        description: &str,
        evaluator: impl FeatureEvaluator + 'static,
    ) -> Self {
        self.features
            .push(Self::spec(key, name, description, evaluator));
        self
    }

    /// Register a profile-mode feature
    #[must_use]
    pub fn profile_feature(
        mut self,
        key: &str,
        name: &str,
        description: &str,
        evaluator: impl FeatureEvaluator + 'static,
    ) -> Self {
        self.profile_features
            .push(Self::spec(key, name, description, evaluator));
        self
    }

    /// Register a category with `(feature key, weight)` members
    #[must_use]
    pub fn category(mut self, key: &str, name: &str, weight: f64, features: &[(&str, f64)]) -> Self {
        self.categories.push(CategorySpec {
            key: key.to_string(),
            name: name.to_string(),
            weight,
            features: features
                .iter()
                .map(|(key, weight)| CategoryFeature {
                    key: (*key).to_string(),
                    weight: *weight,
                })
                .collect(),
        });
        self
    }

    /// Register a profile with `(profile feature key, required)` items
    #[must_use]
    pub fn profile(mut self, key: &str, name: &str, description: &str, items: &[(&str, bool)]) -> Self {
        self.profiles.push(ProfileSpec {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            items: items
                .iter()
                .map(|(key, required)| ProfileItem {
                    key: (*key).to_string(),
                    required: *required,
                })
                .collect(),
        });
        self
    }

    /// Register aliases for a canonical key
    #[must_use]
    pub fn aliases(mut self, namespace: Namespace, canonical: &str, aliases: &[&str]) -> Self {
        self.aliases.extend(
            aliases
                .iter()
                .map(|a| (namespace, (*a).to_string(), canonical.to_string())),
        );
        self
    }

    /// Validate and freeze the catalog
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let features = index_features(Namespace::Feature, self.features)?;
        let profile_features = index_features(Namespace::ProfileFeature, self.profile_features)?;

        let mut categories = IndexMap::new();
        for category in self.categories {
            check_weight(&category.key, category.weight)?;
            if category.features.is_empty() {
                return Err(CatalogError::EmptyGroup {
                    namespace: Namespace::Category,
                    key: category.key,
                });
            }
            for member in &category.features {
                check_weight(&member.key, member.weight)?;
                if !features.contains_key(&member.key) {
                    return Err(CatalogError::UnknownFeature {
                        owner: category.key.clone(),
                        namespace: Namespace::Feature,
                        key: member.key.clone(),
                    });
                }
            }
            insert_unique(&mut categories, Namespace::Category, category.key.clone(), category)?;
        }

        let mut profiles = IndexMap::new();
        for profile in self.profiles {
            if profile.items.is_empty() {
                return Err(CatalogError::EmptyGroup {
                    namespace: Namespace::Profile,
                    key: profile.key,
                });
            }
            if let Some(item) = profile
                .items
                .iter()
                .find(|i| !profile_features.contains_key(&i.key))
            {
                return Err(CatalogError::UnknownFeature {
                    owner: profile.key.clone(),
                    namespace: Namespace::ProfileFeature,
                    key: item.key.clone(),
                });
            }
            insert_unique(&mut profiles, Namespace::Profile, profile.key.clone(), profile)?;
        }

        let mut aliases: HashMap<(Namespace, String), String> = HashMap::new();
        let canonical = categories
            .values()
            .flat_map(|c| {
                [
                    (Namespace::Category, c.key.clone(), c.key.clone()),
                    (Namespace::Category, c.name.clone(), c.key.clone()),
                ]
            })
            .chain(features.keys().map(|k| (Namespace::Feature, k.clone(), k.clone())))
            .chain(
                profile_features
                    .keys()
                    .map(|k| (Namespace::ProfileFeature, k.clone(), k.clone())),
            )
            .chain(profiles.keys().map(|k| (Namespace::Profile, k.clone(), k.clone())))
            .collect::<Vec<_>>();

        for (namespace, alias, target) in canonical.into_iter().chain(self.aliases) {
            let exists = match namespace {
                Namespace::Category => categories.contains_key(&target),
                Namespace::Feature => features.contains_key(&target),
                Namespace::ProfileFeature => profile_features.contains_key(&target),
                Namespace::Profile => profiles.contains_key(&target),
            };
            if !exists {
                return Err(CatalogError::UnknownAliasTarget {
                    namespace,
                    alias,
                    target,
                });
            }
            let normalized = normalize_name(&alias);
            match aliases.get(&(namespace, normalized.clone())) {
                Some(existing) if existing != &target => {
                    return Err(CatalogError::AliasConflict {
                        namespace,
                        alias,
                        existing: existing.clone(),
                        requested: target,
                    });
                }
                Some(_) => {}
                None => {
                    aliases.insert((namespace, normalized), target);
                }
            }
        }

        tracing::debug!(
            categories = categories.len(),
            features = features.len(),
            profiles = profiles.len(),
            aliases = aliases.len(),
            "Catalog built"
        );

        Ok(Catalog {
            features,
            profile_features,
            categories,
            profiles,
            aliases,
        })
    }
}

fn index_features(
    namespace: Namespace,
    specs: Vec<FeatureSpec>,
) -> Result<IndexMap<String, FeatureSpec>, CatalogError> {
    let mut map = IndexMap::new();
    for spec in specs {
        insert_unique(&mut map, namespace, spec.key.clone(), spec)?;
    }
    Ok(map)
}

fn insert_unique<T>(
    map: &mut IndexMap<String, T>,
    namespace: Namespace,
    key: String,
    value: T,
) -> Result<(), CatalogError> {
    if map.contains_key(&key) {
        return Err(CatalogError::DuplicateKey { namespace, key });
    }
    map.insert(key, value);
    Ok(())
}

fn check_weight(key: &str, weight: f64) -> Result<(), CatalogError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidWeight {
            key: key.to_string(),
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &dyn Document) -> FeatureScore {
        FeatureScore::pass("ok")
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  BSI-v1.1 "), "bsi_v1_1");
        assert_eq!(normalize_name("Comp With Name"), "comp_with_name");
    }

    #[test]
    fn test_dangling_feature_reference_fails() {
        let result = Catalog::builder()
            .feature("a", "A", "", always)
            .category("cat", "Cat", 1.0, &[("a", 0.5), ("missing", 0.5)])
            .build();
        assert!(matches!(
            result,
            Err(CatalogError::UnknownFeature { ref key, .. }) if key == "missing"
        ));
    }

    #[test]
    fn test_duplicate_and_empty() {
        let dup = Catalog::builder()
            .feature("a", "A", "", always)
            .feature("a", "A again", "", always)
            .build();
        assert!(matches!(dup, Err(CatalogError::DuplicateKey { .. })));

        let empty = Catalog::builder()
            .feature("a", "A", "", always)
            .category("cat", "Cat", 1.0, &[])
            .build();
        assert!(matches!(empty, Err(CatalogError::EmptyGroup { .. })));

        let negative = Catalog::builder()
            .feature("a", "A", "", always)
            .category("cat", "Cat", -1.0, &[("a", 1.0)])
            .build();
        assert!(matches!(negative, Err(CatalogError::InvalidWeight { .. })));
    }

    #[test]
    fn test_alias_conflict() {
        let result = Catalog::builder()
            .feature("a", "A", "", always)
            .feature("b", "B", "", always)
            .aliases(Namespace::Feature, "a", &["shared"])
            .aliases(Namespace::Feature, "b", &["SHARED"])
            .build();
        assert!(matches!(result, Err(CatalogError::AliasConflict { .. })));
    }

    #[test]
    fn test_alias_resolution_is_case_and_separator_insensitive() {
        let catalog = Catalog::builder()
            .feature("comp_with_name", "Names", "", always)
            .category("identification", "Identification", 10.0, &[("comp_with_name", 1.0)])
            .aliases(Namespace::Category, "identification", &["identity"])
            .build()
            .expect("valid catalog");

        for spelling in ["identity", "IDENTITY", " Identity ", "Identification"] {
            assert_eq!(catalog.resolve_category(spelling), Some("identification"));
        }
        assert_eq!(catalog.resolve_feature("Comp-With-Name"), Some("comp_with_name"));
        assert_eq!(catalog.resolve_feature("comp with name"), Some("comp_with_name"));
        assert_eq!(catalog.resolve_feature(""), None);
        assert_eq!(catalog.resolve_category("unknown"), None);
    }
}
