//! Configuration for scoring runs.
//!
//! This module provides:
//! - the run [`Config`] and its builder
//! - validation via [`Validatable`]
//! - the YAML scoring config file: generation, loading and discovery
//!
//! # Quick Start
//!
//! ```
//! use sbom_score::config::{Config, Validatable};
//!
//! let config = Config::builder()
//!     .categories(["Provenance", "licenses"])
//!     .build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-score.yaml` file in the working directory or
//! `~/.config/sbom-score/config.yaml`:
//!
//! ```yaml
//! categories:
//!   - name: Identification
//!     key: identification
//!     weight: 10.0
//!     features:
//!       - name: Components with names
//!         key: comp_with_name
//!         weight: 0.4
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{Config, ConfigBuilder, SignatureBundle, DEFAULT_FETCH_TIMEOUT};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_default_config, generate_profile_config, load_config_file,
    read_config_str, CategoryEntry, ConfigFile, ConfigFileError, FeatureEntry, ProfileEntry,
    ProfileFeatureEntry,
};

/// Generate a JSON Schema for the scoring config file.
///
/// Editors can use it for validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(ConfigFile);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_mentions_fields() {
        let schema = generate_json_schema().expect("schema");
        assert!(schema.contains("categories"));
        assert!(schema.contains("required"));
    }
}
