//! Scoring config file: generation, loading and discovery.
//!
//! The config file lists categories with their features and weights, or
//! profiles with their checklist items. [`generate_default_config`] and
//! [`read_config_str`] are inverses.

use super::validation::Validatable;
use crate::catalog::Catalog;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// File format
// ============================================================================

/// Top-level scoring config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigFile {
    /// Comprehensive-mode categories
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryEntry>,
    /// Compliance profiles
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileEntry>,
}

/// A category and its weighted features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryEntry {
    pub name: String,
    pub key: String,
    pub weight: f64,
    /// Drop this category from scoring
    #[serde(default)]
    pub ignore: bool,
    pub features: Vec<FeatureEntry>,
}

/// A weighted feature inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureEntry {
    pub name: String,
    pub key: String,
    pub weight: f64,
    /// Drop this feature from scoring
    #[serde(default)]
    pub ignore: bool,
}

/// A compliance profile and its checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileEntry {
    pub name: String,
    pub key: String,
    pub features: Vec<ProfileFeatureEntry>,
}

/// A checklist item inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileFeatureEntry {
    pub name: String,
    pub key: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ConfigFile {
    /// Serialize to YAML with a short header
    pub fn to_yaml(&self) -> Result<String, ConfigFileError> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!(
            "# sbom-score configuration\n# Set `ignore: true` to skip an entry; weights are relative.\n\n{body}"
        ))
    }
}

/// Config file with every built-in category at its default weights
#[must_use]
pub fn generate_default_config(catalog: &Catalog) -> ConfigFile {
    let categories = catalog
        .categories()
        .map(|category| CategoryEntry {
            name: category.name.clone(),
            key: category.key.clone(),
            weight: category.weight,
            ignore: false,
            features: category
                .features
                .iter()
                .map(|member| FeatureEntry {
                    name: catalog
                        .feature(&member.key)
                        .map_or_else(|| member.key.clone(), |f| f.name.clone()),
                    key: member.key.clone(),
                    weight: member.weight,
                    ignore: false,
                })
                .collect(),
        })
        .collect();

    ConfigFile {
        categories,
        profiles: Vec::new(),
    }
}

/// Config file with every built-in profile
#[must_use]
pub fn generate_profile_config(catalog: &Catalog) -> ConfigFile {
    let profiles = catalog
        .profiles()
        .map(|profile| ProfileEntry {
            name: profile.name.clone(),
            key: profile.key.clone(),
            features: profile
                .items
                .iter()
                .map(|item| {
                    let spec = catalog.profile_feature(&item.key);
                    ProfileFeatureEntry {
                        name: spec.map_or_else(|| item.key.clone(), |f| f.name.clone()),
                        key: item.key.clone(),
                        required: item.required,
                        description: spec.map(|f| f.description.clone()).unwrap_or_default(),
                    }
                })
                .collect(),
        })
        .collect();

    ConfigFile {
        categories: Vec::new(),
        profiles,
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config file: {0}")]
    Invalid(String),
}

/// Parse and validate config file content
pub fn read_config_str(content: &str) -> Result<ConfigFile, ConfigFileError> {
    let file: ConfigFile = serde_yaml::from_str(content)?;
    let errors = file.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigFileError::Invalid(joined));
    }
    Ok(file)
}

/// Load a config file from disk.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let file = read_config_str(&content)?;
    tracing::debug!(
        "Loaded config file {} ({} categories, {} profiles)",
        path.display(),
        file.categories.len(),
        file.profiles.len()
    );
    Ok(file)
}

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[".sbom-score.yaml", ".sbom-score.yml"];

/// Discover a config file.
///
/// Search order:
/// 1. Explicit path if provided (returned even when missing, so loading
///    reports it)
/// 2. Current directory
/// 3. User config directory (`~/.config/sbom-score/config.yaml`)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    dirs::config_dir()
        .map(|dir| dir.join("sbom-score").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::standard().expect("standard catalog")
    }

    #[test]
    fn test_generate_then_read_round_trip() {
        let generated = generate_default_config(&catalog());
        let yaml = generated.to_yaml().expect("serialize");
        let read = read_config_str(&yaml).expect("read back");
        assert_eq!(read, generated);

        let profiles = generate_profile_config(&catalog());
        let read = read_config_str(&profiles.to_yaml().expect("serialize")).expect("read back");
        assert_eq!(read, profiles);
    }

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-score.yaml");
        std::fs::write(&config_path, "categories: []\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
        let empty = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(empty.path()), None);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let yaml = r"
categories:
  - name: Identification
    key: identification
    weight: -1
    features:
      - name: Names
        key: comp_with_name
        weight: 1.0
";
        assert!(matches!(
            read_config_str(yaml),
            Err(ConfigFileError::Invalid(_))
        ));
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom.yaml");
        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
