//! Generate command handler.
//!
//! Writes a starter config file or the config file JSON schema.

use super::{write_output, OutputTarget};
use crate::catalog::Catalog;
use crate::config::{generate_default_config, generate_json_schema, generate_profile_config};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// What to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenerateKind {
    /// Categories with default weights
    Features,
    /// Compliance profiles with their checklists
    Profiles,
    /// JSON Schema of the config file
    Schema,
}

/// Render the requested artifact as text
pub fn render(kind: GenerateKind, catalog: &Catalog) -> Result<String> {
    let text = match kind {
        GenerateKind::Features => generate_default_config(catalog).to_yaml()?,
        GenerateKind::Profiles => generate_profile_config(catalog).to_yaml()?,
        GenerateKind::Schema => {
            generate_json_schema().context("failed to serialize config schema")?
        }
    };
    Ok(text)
}

/// Run the generate command
pub fn run_generate(kind: GenerateKind, output: Option<PathBuf>) -> Result<()> {
    let catalog = Catalog::standard().context("built-in catalog is invalid")?;
    let text = render(kind, &catalog)?;
    write_output(&text, &OutputTarget::from_option(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::read_config_str;

    #[test]
    fn test_generated_files_read_back() {
        let catalog = Catalog::standard().unwrap();
        let features = render(GenerateKind::Features, &catalog).unwrap();
        assert!(features.starts_with("# sbom-score configuration"));
        assert_eq!(read_config_str(&features).unwrap().categories.len(), 7);

        let profiles = render(GenerateKind::Profiles, &catalog).unwrap();
        assert_eq!(read_config_str(&profiles).unwrap().profiles.len(), 5);
    }

    #[test]
    fn test_schema_is_json() {
        let catalog = Catalog::standard().unwrap();
        let schema = render(GenerateKind::Schema, &catalog).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&schema).is_ok());
    }
}
