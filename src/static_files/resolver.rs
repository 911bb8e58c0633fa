//! Maps a raw request target to a file under the site root.
//!
//! Resolution happens in four steps:
//!
//! 1. drop the query string and fragment, then percent-decode;
//! 2. normalize the decoded path lexically and strip leading `/` and `\`;
//! 3. join onto the root and check that the result still starts with every
//!    component of the root;
//! 4. resolve symlinks of an existing candidate and repeat the check
//!    against the canonical root.
//!
//! Only a regular file that passes all of this is served.

use std::path::{Component, Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed percent escape at byte {0} of request target")]
    MalformedEscape(usize),

    #[error("request target is not valid UTF-8 once decoded: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),
}

/// Outcome of resolving one request target.
#[derive(Debug)]
pub enum Resolution {
    /// An existing regular file inside the root.
    Serve(PathBuf),
    /// Inside the root, but missing or not a regular file.
    NotFound,
    /// Escapes the root. Answered exactly like `NotFound`.
    Forbidden,
    /// The target could not be decoded.
    Invalid(ResolveError),
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl PathResolver {
    /// `root` must already be absolute. Its canonical form is taken here,
    /// falling back to the lexical form if the directory cannot be
    /// canonicalized.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = normalize_path(&root.into());
        let canonical_root = std::fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        Self {
            root,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when an already canonicalized path lies under the canonical root.
    pub fn contains_real(&self, real: &Path) -> bool {
        is_contained(real, &self.canonical_root)
    }

    pub fn resolve(&self, target: &str) -> Resolution {
        let decoded = match decode_target(target) {
            Ok(d) => d,
            Err(e) => return Resolution::Invalid(e),
        };

        let relative = normalize(&decoded);
        let relative = relative.trim_start_matches(['/', '\\']);
        let candidate = normalize_path(&self.root.join(relative));

        if !is_contained(&candidate, &self.root) {
            tracing::warn!(
                path = %target,
                resolved = %candidate.display(),
                "Path traversal attempt blocked"
            );
            return Resolution::Forbidden;
        }

        // Missing paths have nothing to canonicalize and are simply absent.
        let Ok(real) = std::fs::canonicalize(&candidate) else {
            return Resolution::NotFound;
        };

        if !self.contains_real(&real) {
            tracing::warn!(
                path = %target,
                resolved = %real.display(),
                "Symlink out of root blocked"
            );
            return Resolution::Forbidden;
        }

        match std::fs::metadata(&real) {
            Ok(meta) if meta.is_file() => Resolution::Serve(candidate),
            _ => Resolution::NotFound,
        }
    }
}

/// Strips `?query` and `#fragment`, then percent-decodes what is left.
///
/// `+` stays a literal plus. A `%` not followed by two hex digits is an
/// error, as are bytes that do not form UTF-8 once decoded.
pub fn decode_target(target: &str) -> Result<String, ResolveError> {
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    check_escapes(path)?;
    Ok(urlencoding::decode(path)?.into_owned())
}

fn check_escapes(path: &str) -> Result<(), ResolveError> {
    let bytes = path.as_bytes();

    for (at, _) in path.match_indices('%') {
        let hex = bytes.get(at + 1..at + 3);
        if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
            return Err(ResolveError::MalformedEscape(at));
        }
    }

    Ok(())
}

/// Lexical POSIX path normalization.
///
/// Collapses repeated separators, `.` and `..`. A `..` that would climb
/// above the top of an absolute path is dropped; in a relative path it is
/// kept. An empty input normalizes to `.`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Component-wise normalization of an absolute path, without touching the
/// filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }

    out
}

/// True when `candidate` lies at or below `root`.
///
/// Compares whole components, so `/site-old` is not inside `/site`.
pub fn is_contained(candidate: &Path, root: &Path) -> bool {
    candidate.starts_with(root)
}
