//! **Quality and compliance scoring for Software Bills of Materials (SBOMs).**
//!
//! `sbom-score` evaluates an SBOM against a catalog of weighted rules and
//! reduces the results into a single 0-10 score and a letter grade. It
//! supports two modes:
//!
//! - **Comprehensive**: rules are grouped into weighted categories
//!   (Identification, Provenance, Integrity, Completeness, Licensing,
//!   Vulnerability, Structural).
//! - **Compliance**: rules are grouped into regulatory profiles (NTIA
//!   Minimum Elements, BSI TR-03183-2, OpenChain Telco, FSCT), each item
//!   marked required or optional.
//!
//! ## Core Concepts & Modules
//!
//! - **[`catalog`]**: the immutable rule registry, built once and shared by
//!   reference. Every category, feature and profile is registered here with
//!   its aliases.
//! - **[`evaluators`]**: one [`FeatureEvaluator`] per rule, each a pure
//!   function of a [`Document`].
//! - **[`resolver`]**: turns user filters into a [`ScoringPlan`].
//! - **[`formulas`]**: weighted-mean aggregation and grade mapping.
//! - **[`engine`]**: drives batch runs and assembles [`ScoreResult`]s.
//! - **[`parsers`]** and **[`model`]**: `CycloneDX` and SPDX inputs
//!   normalized into [`Sbom`].
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_score::{CancelToken, Config, Engine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::standard()?;
//!     let config = Config::builder().profiles(["ntia"]).build();
//!
//!     let results = engine.score_paths(&config, &["sbom.cdx.json"], &CancelToken::new())?;
//!     for result in &results {
//!         println!("{}: {:.1} ({})", result.filename, result.interlynk_score, result.grade);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Scoring an in-memory document
//!
//! ```
//! use sbom_score::{parse_sbom_str, Config, Engine};
//!
//! let sbom = parse_sbom_str(r#"{
//!     "bomFormat": "CycloneDX",
//!     "specVersion": "1.5",
//!     "components": [{"type": "library", "name": "serde", "version": "1.0.0"}]
//! }"#).unwrap();
//!
//! let engine = Engine::standard().unwrap();
//! let plan = engine
//!     .plan(&Config::builder().categories(["identification"]).build())
//!     .unwrap();
//! let result = engine.score_document(&plan, &sbom, "inline");
//! assert!(result.interlynk_score > 7.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): fetch `http(s)://` inputs with a blocking `reqwest`
//!   client.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Component counts are converted to f64 for percentages; values are bounded
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Doc completeness: # Errors / # Panics sections are not written per fn
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // The built-in catalog tables are long by nature
    clippy::too_many_lines,
    clippy::unused_self,
    clippy::similar_names
)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluators;
pub mod formulas;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod resolver;
pub mod signature;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogBuilder, CatalogError, Namespace};
pub use config::{Config, ConfigBuilder, ConfigError, ConfigFile, SignatureBundle, Validatable};
pub use engine::{
    Breakdown, CancelToken, CategoryResult, Engine, FeatureResult, ProfileItemResult,
    ProfileResult, ScoreResult,
};
pub use error::{DocumentError, Result, ScoreError};
pub use evaluators::{FeatureEvaluator, FeatureScore};
pub use formulas::Grade;
pub use model::{Component, Document, Sbom};
pub use parsers::{parse_sbom_str, SbomParser};
pub use resolver::{Resolver, ScoringPlan};
pub use signature::SignatureVerifier;
