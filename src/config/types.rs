//! Run configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for fetching remote documents.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Detached signature and public key for the scored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBundle {
    /// Path to the signature value
    pub sig_value: PathBuf,
    /// Path to the public key
    pub public_key: PathBuf,
}

/// Configuration for one scoring run.
///
/// Category, feature and profile lists accept any casing and the legacy
/// spellings registered in the catalog. Empty lists mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Category names to keep
    pub categories: Vec<String>,
    /// Feature keys to keep
    pub features: Vec<String>,
    /// Compliance profiles to score against; switches to compliance mode
    pub profiles: Vec<String>,
    /// Scoring config file overriding the catalog defaults
    pub config_file: Option<PathBuf>,
    /// Signature bundle applied to every document
    pub signature_bundle: Option<SignatureBundle>,
    /// Timeout for remote fetches
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            features: Vec::new(),
            profiles: Vec::new(),
            config_file: None,
            signature_bundle: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl Config {
    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether compliance profiles were requested
    #[must_use]
    pub fn is_compliance(&self) -> bool {
        has_entries(&self.profiles)
    }

    /// Whether any category or feature filter was supplied
    #[must_use]
    pub fn has_filters(&self) -> bool {
        has_entries(&self.categories) || has_entries(&self.features)
    }
}

fn has_entries(list: &[String]) -> bool {
    list.iter().any(|s| !s.trim().is_empty())
}

// ============================================================================
// Builder for Config
// ============================================================================

/// Builder for constructing `Config` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Keep only these categories.
    pub fn categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.categories = names.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only these features.
    pub fn features<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.features = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Score against these compliance profiles.
    pub fn profiles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.profiles = names.into_iter().map(Into::into).collect();
        self
    }

    /// Use a scoring config file.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.config_file = path;
        self
    }

    /// Attach a signature bundle.
    pub fn signature_bundle(mut self, sig_value: PathBuf, public_key: PathBuf) -> Self {
        self.config.signature_bundle = Some(SignatureBundle {
            sig_value,
            public_key,
        });
        self
    }

    /// Set the remote fetch timeout.
    pub const fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .categories(["Provenance"])
            .features(vec!["sbom_authors".to_string()])
            .fetch_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(config.categories, vec!["Provenance".to_string()]);
        assert!(config.has_filters());
        assert!(!config.is_compliance());
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_entries_are_not_filters() {
        let config = Config::builder().categories(["  ", ""]).profiles([" "]).build();
        assert!(!config.has_filters());
        assert!(!config.is_compliance());
    }
}
