//! Content-Type lookup.
//!
//! The file handler never decides content types itself; it asks a
//! [`MimeLookup`]. The default goes through `mime_guess`, and any closure
//! from path to optional type string can stand in for it.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub trait MimeLookup: Send + Sync {
    /// Content type for `path`, or `None` when the extension is unknown.
    fn content_type(&self, path: &Path) -> Option<String>;
}

/// Extension-based lookup backed by `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeGuess;

impl MimeLookup for MimeGuess {
    fn content_type(&self, path: &Path) -> Option<String> {
        mime_guess::from_path(path)
            .first_raw()
            .map(str::to_string)
    }
}

impl<F> MimeLookup for F
where
    F: Fn(&Path) -> Option<String> + Send + Sync,
{
    fn content_type(&self, path: &Path) -> Option<String> {
        self(path)
    }
}

/// Resolves the type for `path`, falling back to `application/octet-stream`.
pub fn content_type_or_default(lookup: &dyn MimeLookup, path: &Path) -> String {
    lookup
        .content_type(path)
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
