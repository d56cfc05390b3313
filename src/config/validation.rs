//! Configuration validation.
//!
//! Provides the validation trait and its implementations for the run
//! configuration and the scoring config file.

use super::file::ConfigFile;
use super::types::Config;
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for Config {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.is_compliance() && self.has_filters() {
            errors.push(ConfigError::new(
                "profiles",
                "profiles cannot be combined with category or feature filters",
            ));
        }

        if self.fetch_timeout.is_zero() {
            errors.push(ConfigError::new("fetch_timeout", "must be greater than zero"));
        }

        if let Some(bundle) = &self.signature_bundle {
            if bundle.sig_value.as_os_str().is_empty() {
                errors.push(ConfigError::new("signature_bundle.sig_value", "path is empty"));
            }
            if bundle.public_key.as_os_str().is_empty() {
                errors.push(ConfigError::new(
                    "signature_bundle.public_key",
                    "path is empty",
                ));
            }
        }

        errors
    }
}

impl Validatable for ConfigFile {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for (i, category) in self.categories.iter().enumerate() {
            let field = format!("categories[{i}]");
            if category.key.trim().is_empty() {
                errors.push(ConfigError::new(format!("{field}.key"), "must not be empty"));
            } else if !seen.insert(category.key.as_str()) {
                errors.push(ConfigError::new(
                    format!("{field}.key"),
                    format!("duplicate category '{}'", category.key),
                ));
            }
            check_weight(&mut errors, &format!("{field}.weight"), category.weight);
            if !category.ignore && category.features.iter().all(|f| f.ignore) {
                errors.push(ConfigError::new(
                    format!("{field}.features"),
                    "an active category needs at least one active feature",
                ));
            }
            for (j, feature) in category.features.iter().enumerate() {
                if feature.key.trim().is_empty() {
                    errors.push(ConfigError::new(
                        format!("{field}.features[{j}].key"),
                        "must not be empty",
                    ));
                }
                check_weight(
                    &mut errors,
                    &format!("{field}.features[{j}].weight"),
                    feature.weight,
                );
            }
        }

        let mut seen = HashSet::new();
        for (i, profile) in self.profiles.iter().enumerate() {
            let field = format!("profiles[{i}]");
            if profile.key.trim().is_empty() {
                errors.push(ConfigError::new(format!("{field}.key"), "must not be empty"));
            } else if !seen.insert(profile.key.as_str()) {
                errors.push(ConfigError::new(
                    format!("{field}.key"),
                    format!("duplicate profile '{}'", profile.key),
                ));
            }
            if profile.features.is_empty() {
                errors.push(ConfigError::new(
                    format!("{field}.features"),
                    "must not be empty",
                ));
            }
            for (j, item) in profile.features.iter().enumerate() {
                if item.key.trim().is_empty() {
                    errors.push(ConfigError::new(
                        format!("{field}.features[{j}].key"),
                        "must not be empty",
                    ));
                }
            }
        }

        errors
    }
}

fn check_weight(errors: &mut Vec<ConfigError>, field: &str, weight: f64) {
    if !weight.is_finite() || weight < 0.0 {
        errors.push(ConfigError::new(
            field,
            format!("weight {weight} must be finite and non-negative"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryEntry, FeatureEntry};
    use std::time::Duration;

    #[test]
    fn test_profiles_and_filters_conflict() {
        let config = Config::builder()
            .profiles(["ntia"])
            .categories(["provenance"])
            .build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "profiles");
    }

    #[test]
    fn test_zero_timeout() {
        let config = Config::builder().fetch_timeout(Duration::ZERO).build();
        assert!(!config.is_valid());
        assert!(Config::default().is_valid());
    }

    #[test]
    fn test_all_features_ignored() {
        let file = ConfigFile {
            categories: vec![CategoryEntry {
                name: "Integrity".to_string(),
                key: "integrity".to_string(),
                weight: 15.0,
                ignore: false,
                features: vec![FeatureEntry {
                    name: "Checksums".to_string(),
                    key: "comp_with_checksums".to_string(),
                    weight: 1.0,
                    ignore: true,
                }],
            }],
            profiles: Vec::new(),
        };
        let errors = file.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "categories[0].features");
    }
}
