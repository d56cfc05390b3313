//! List command handler.
//!
//! Prints the built-in categories, features or profiles.

use super::{write_output, OutputTarget};
use crate::catalog::Catalog;
use anyhow::{Context, Result};
use clap::ValueEnum;

/// Which part of the catalog to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListKind {
    /// Categories with their weighted features
    #[default]
    Categories,
    /// Every comprehensive feature
    Features,
    /// Compliance profiles with their checklists
    Profiles,
}

/// Render the listing as text
#[must_use]
pub fn render(kind: ListKind, catalog: &Catalog) -> String {
    let mut lines = Vec::new();
    match kind {
        ListKind::Categories => {
            for category in catalog.categories() {
                lines.push(format!("{} ({}, weight {})", category.name, category.key, category.weight));
                for member in &category.features {
                    lines.push(format!("  {:<32}{:.2}", member.key, member.weight));
                }
            }
        }
        ListKind::Features => {
            for feature in catalog.features() {
                lines.push(format!("{:<32}{}", feature.key, feature.description));
            }
        }
        ListKind::Profiles => {
            for profile in catalog.profiles() {
                lines.push(format!("{} ({})", profile.name, profile.key));
                for item in &profile.items {
                    let tag = if item.required { "required" } else { "optional" };
                    lines.push(format!("  {:<28}{tag}", item.key));
                }
            }
        }
    }
    lines.join("\n")
}

/// Run the list command
pub fn run_list(kind: ListKind) -> Result<()> {
    let catalog = Catalog::standard().context("built-in catalog is invalid")?;
    write_output(&render(kind, &catalog), &OutputTarget::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings() {
        let catalog = Catalog::standard().unwrap();
        let categories = render(ListKind::Categories, &catalog);
        assert!(categories.starts_with("Identification (identification, weight 10)"));

        let profiles = render(ListKind::Profiles, &catalog);
        assert!(profiles.contains("NTIA Minimum Elements (ntia)"));
        assert!(profiles.contains("optional"));

        let features = render(ListKind::Features, &catalog);
        assert_eq!(features.lines().count(), catalog.features().count());
    }
}
