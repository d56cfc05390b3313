//! Document loading pipeline.
//!
//! Resolves user inputs to sources, reads them, attaches an optional
//! signature bundle, and parses them into [`Sbom`] documents.

mod source;

pub use source::{
    is_url, normalize_url, read_source, resolve_sources, Source, MAX_DOCUMENT_SIZE,
};

use crate::config::SignatureBundle;
use crate::error::DocumentError;
use crate::model::Sbom;
use crate::parsers::ParseError;
use crate::signature::{load_bundle, SignatureVerifier};
use std::time::Duration;

/// A parsed document with the name it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub name: String,
    pub sbom: Sbom,
}

/// Parse in-memory content.
pub fn parse_content(content: &[u8]) -> Result<Sbom, DocumentError> {
    let text = std::str::from_utf8(content)
        .map_err(|e| ParseError::InvalidEncoding(e.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(crate::parsers::parse_sbom_str(text)?)
}

/// Read and parse one source.
///
/// A configured signature bundle replaces any signature found in the
/// document itself.
pub fn load_document(
    source: &Source,
    timeout: Duration,
    bundle: Option<&SignatureBundle>,
    verifier: Option<&dyn SignatureVerifier>,
) -> Result<LoadedDocument, DocumentError> {
    let content = read_source(source, timeout)?;
    let mut sbom = parse_content(&content)?;

    if let Some(bundle) = bundle {
        sbom.signature = Some(load_bundle(bundle, &content, verifier)?);
    }

    tracing::debug!(
        "Parsed {} ({} components)",
        source,
        sbom.component_count()
    );
    Ok(LoadedDocument {
        name: source.display_name(),
        sbom,
    })
}
