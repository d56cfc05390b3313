//! Detached signature bundles.
//!
//! A bundle names a signature file and a public key file. The bundle is
//! read, attached to the document as a [`Signature`], and handed to an
//! optional [`SignatureVerifier`]. No cryptography ships in this crate;
//! without a verifier the signature is recorded as present but unverified.

use crate::config::SignatureBundle;
use crate::error::DocumentError;
use crate::model::{Signature, SignatureSource};
use std::path::Path;

/// Pluggable signature check.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` over `content` verifies against `public_key`
    fn verify(&self, content: &[u8], signature: &[u8], public_key: &[u8]) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&[u8], &[u8], &[u8]) -> bool + Send + Sync,
{
    fn verify(&self, content: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        self(content, signature, public_key)
    }
}

fn read_part(path: &Path, what: &str) -> Result<Vec<u8>, DocumentError> {
    let bytes = std::fs::read(path)
        .map_err(|e| DocumentError::Signature(format!("{what} {}: {e}", path.display())))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DocumentError::Signature(format!(
            "{what} {} is empty",
            path.display()
        )));
    }
    Ok(bytes)
}

/// Read a bundle and build the signature record for `content`.
pub fn load_bundle(
    bundle: &SignatureBundle,
    content: &[u8],
    verifier: Option<&dyn SignatureVerifier>,
) -> Result<Signature, DocumentError> {
    let signature = read_part(&bundle.sig_value, "signature")?;
    let public_key = read_part(&bundle.public_key, "public key")?;

    let verified = verifier.map(|v| v.verify(content, &signature, &public_key));
    tracing::debug!(
        "Signature bundle {} loaded (verified: {:?})",
        bundle.sig_value.display(),
        verified
    );

    Ok(Signature {
        source: SignatureSource::Bundle,
        algorithm: None,
        value: String::from_utf8_lossy(&signature).trim().to_string(),
        public_key: Some(String::from_utf8_lossy(&public_key).trim().to_string()),
        verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle(dir: &TempDir, sig: &str, key: &str) -> SignatureBundle {
        let sig_path = dir.path().join("sbom.sig");
        let key_path = dir.path().join("key.pub");
        std::fs::write(&sig_path, sig).unwrap();
        std::fs::write(&key_path, key).unwrap();
        SignatureBundle {
            sig_value: sig_path,
            public_key: key_path,
        }
    }

    #[test]
    fn test_unverified_without_verifier() {
        let dir = TempDir::new().unwrap();
        let sig = load_bundle(&bundle(&dir, "abc\n", "KEY"), b"{}", None).unwrap();
        assert_eq!(sig.source, SignatureSource::Bundle);
        assert_eq!(sig.value, "abc");
        assert_eq!(sig.verified, None);
    }

    #[test]
    fn test_verifier_outcome_recorded() {
        let dir = TempDir::new().unwrap();
        let accept = |_: &[u8], sig: &[u8], _: &[u8]| sig == b"good";
        let verifier: &dyn SignatureVerifier = &accept;
        let good = load_bundle(&bundle(&dir, "good", "KEY"), b"{}", Some(verifier)).unwrap();
        assert_eq!(good.verified, Some(true));
        let bad = load_bundle(&bundle(&dir, "bad", "KEY"), b"{}", Some(verifier)).unwrap();
        assert_eq!(bad.verified, Some(false));
    }

    #[test]
    fn test_missing_or_empty_parts() {
        let dir = TempDir::new().unwrap();
        let missing = SignatureBundle {
            sig_value: dir.path().join("nope.sig"),
            public_key: dir.path().join("nope.pub"),
        };
        assert!(matches!(
            load_bundle(&missing, b"{}", None),
            Err(DocumentError::Signature(_))
        ));
        assert!(matches!(
            load_bundle(&bundle(&dir, "  \n", "KEY"), b"{}", None),
            Err(DocumentError::Signature(_))
        ));
    }
}
