//! Input resolution: local files, directory trees and remote URLs.

use crate::engine::CancelToken;
use crate::error::DocumentError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest document accepted, local or remote.
pub const MAX_DOCUMENT_SIZE: u64 = 512 * 1024 * 1024;

/// One concrete document to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Name used in results and logs
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Whether `input` names a remote document
#[must_use]
pub fn is_url(input: &str) -> bool {
    let lower = input.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Expand one user input into the documents it names.
///
/// Directories are walked recursively in sorted order, skipping hidden
/// entries. The token is checked before every directory read.
pub fn resolve_sources(input: &str, cancel: &CancelToken) -> Result<Vec<Source>, DocumentError> {
    let input = input.trim();
    if is_url(input) {
        return Ok(vec![Source::Url(input.to_string())]);
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Ok(vec![Source::File(path.to_path_buf())]);
    }

    let mut files = Vec::new();
    walk_dir(path, cancel, &mut files)?;
    if files.is_empty() {
        return Err(DocumentError::Traversal(format!(
            "no files under {}",
            path.display()
        )));
    }
    tracing::debug!("Found {} files under {}", files.len(), path.display());
    Ok(files.into_iter().map(Source::File).collect())
}

fn walk_dir(dir: &Path, cancel: &CancelToken, out: &mut Vec<PathBuf>) -> Result<(), DocumentError> {
    if cancel.is_cancelled() {
        return Err(DocumentError::Cancelled);
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| DocumentError::io(dir, e))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| !is_hidden(path))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, cancel, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Read a source into memory.
pub fn read_source(source: &Source, timeout: Duration) -> Result<Vec<u8>, DocumentError> {
    match source {
        Source::File(path) => read_file(path),
        Source::Url(url) => fetch_url(url, timeout),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, DocumentError> {
    let size = std::fs::metadata(path)
        .map_err(|e| DocumentError::io(path, e))?
        .len();
    if size > MAX_DOCUMENT_SIZE {
        return Err(DocumentError::TooLarge {
            size,
            limit: MAX_DOCUMENT_SIZE,
        });
    }
    std::fs::read(path).map_err(|e| DocumentError::io(path, e))
}

/// Point GitHub `blob` page URLs at the raw file.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("https://github.com/") else {
        return url.to_string();
    };
    match rest.split_once("/blob/") {
        Some((repo, path)) => format!("https://raw.githubusercontent.com/{repo}/{path}"),
        None => url.to_string(),
    }
}

#[cfg(feature = "remote")]
fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, DocumentError> {
    let url = normalize_url(url);
    tracing::info!("Fetching {url}");

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DocumentError::Fetch(e.to_string()))?;

    let response = client
        .get(&url)
        .send()
        .map_err(|e| DocumentError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DocumentError::Fetch(format!(
            "{url} returned {}",
            response.status()
        )));
    }
    if let Some(size) = response.content_length() {
        if size > MAX_DOCUMENT_SIZE {
            return Err(DocumentError::TooLarge {
                size,
                limit: MAX_DOCUMENT_SIZE,
            });
        }
    }

    let body = response
        .bytes()
        .map_err(|e| DocumentError::Fetch(e.to_string()))?;
    if body.len() as u64 > MAX_DOCUMENT_SIZE {
        return Err(DocumentError::TooLarge {
            size: body.len() as u64,
            limit: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_url(url: &str, _timeout: Duration) -> Result<Vec<u8>, DocumentError> {
    Err(DocumentError::Unsupported(format!(
        "{url}: remote feature not enabled"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/sbom.json"));
        assert!(is_url("HTTP://example.com/sbom.json"));
        assert!(!is_url("./sbom.json"));
    }

    #[test]
    fn test_normalize_github_blob() {
        assert_eq!(
            normalize_url("https://github.com/acme/app/blob/main/sbom.json"),
            "https://raw.githubusercontent.com/acme/app/main/sbom.json"
        );
        assert_eq!(
            normalize_url("https://example.com/sbom.json"),
            "https://example.com/sbom.json"
        );
    }

    #[test]
    fn test_directory_walk_sorted_and_skips_hidden() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("b.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        std::fs::write(tmp.path().join(".hidden.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("nested").join("c.json"), "{}").unwrap();

        let sources =
            resolve_sources(tmp.path().to_str().unwrap(), &CancelToken::new()).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|s| match s {
                Source::File(p) => p.file_name().unwrap().to_string_lossy().to_string(),
                Source::Url(u) => u.clone(),
            })
            .collect();
        assert_eq!(names, ["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn test_missing_and_empty() {
        let missing = resolve_sources("/nonexistent/sbom.json", &CancelToken::new());
        assert!(matches!(missing, Err(DocumentError::NotFound(_))));

        let tmp = TempDir::new().unwrap();
        let empty = resolve_sources(tmp.path().to_str().unwrap(), &CancelToken::new());
        assert!(matches!(empty, Err(DocumentError::Traversal(_))));
    }

    #[test]
    fn test_walk_honors_cancellation() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = resolve_sources(tmp.path().to_str().unwrap(), &cancel);
        assert!(matches!(result, Err(DocumentError::Cancelled)));
    }
}
