//! Normalized document model.
//!
//! Both `CycloneDX` and SPDX inputs are normalized into [`Sbom`]. The scoring
//! engine only reads documents through the [`Document`] trait, so any type
//! exposing that query surface can be scored.

mod license;
mod metadata;
mod sbom;

pub use license::*;
pub use metadata::*;
pub use sbom::*;
