use std::path::Path;
use std::sync::Arc;

use crate::error::ServeError;
use crate::http::mime::{self, MimeGuess, MimeLookup};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::static_files::resolver::{PathResolver, Resolution};

/// Serves files from one root directory.
///
/// Immutable after construction and shared between connections.
#[derive(Clone)]
pub struct StaticFiles {
    resolver: PathResolver,
    mime: Arc<dyn MimeLookup>,
}

impl StaticFiles {
    /// Files under `root`, typed by `mime_guess`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_mime(root, MimeGuess)
    }

    pub fn with_mime(root: impl AsRef<Path>, mime: impl MimeLookup + 'static) -> Self {
        Self {
            resolver: PathResolver::new(root.as_ref()),
            mime: Arc::new(mime),
        }
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn resolve(&self, target: &str) -> Resolution {
        self.resolver.resolve(target)
    }

    /// 200 response carrying the whole file.
    pub async fn serve_file(&self, path: &Path) -> Result<Response, ServeError> {
        let content = tokio::fs::read(path).await?;
        let content_type = mime::content_type_or_default(self.mime.as_ref(), path);

        tracing::debug!(
            file = %path.display(),
            bytes = content.len(),
            content_type = %content_type,
            "Serving file"
        );

        Ok(ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .body(content)
            .build())
    }

    /// HTML error response for `status`.
    ///
    /// Uses `404.html` or `500.html` from the root when present, otherwise
    /// a one-line page naming the status.
    pub async fn error_response(&self, status: StatusCode) -> Response {
        let body = match self.error_page(status).await {
            Some(page) => page,
            None => format!(
                "<html><body><h1>{} {}</h1></body></html>",
                status.as_u16(),
                status.reason_phrase()
            )
            .into_bytes(),
        };

        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(body)
            .build()
    }

    async fn error_page(&self, status: StatusCode) -> Option<Vec<u8>> {
        let path = self.root().join(status.error_page()?);
        let real = tokio::fs::canonicalize(&path).await.ok()?;

        if !self.resolver.contains_real(&real) {
            tracing::warn!(
                page = %path.display(),
                resolved = %real.display(),
                "Error page outside root ignored"
            );
            return None;
        }

        match tokio::fs::metadata(&real).await {
            Ok(meta) if meta.is_file() => {}
            _ => return None,
        }

        match tokio::fs::read(&real).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!(
                    page = %path.display(),
                    error = %e,
                    "Error page unreadable, using built-in body"
                );
                None
            }
        }
    }
}
