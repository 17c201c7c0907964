//! File responders: the effect half of a substitution.
//!
//! A responder turns an error page path into a response. It is free to fail
//! with its own error response (a missing file is a 404); the interceptor
//! delivers that response as-is.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Serves an error page file.
pub trait FileResponder: Send + Sync {
    /// Build a response for `file`. A success status means the body holds
    /// the file contents.
    fn respond<'a>(&'a self, file: &'a Path) -> BoxFuture<'a, Response>;
}

/// Default responder backed by [`ServeFile`], resolving relative paths
/// against a root directory.
#[derive(Debug, Clone)]
pub struct ServeFileResponder {
    root: PathBuf,
}

impl ServeFileResponder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths are used untouched.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }
}

impl FileResponder for ServeFileResponder {
    fn respond<'a>(&'a self, file: &'a Path) -> BoxFuture<'a, Response> {
        let path = self.resolve(file);
        Box::pin(async move {
            // Plain GET: error pages ignore the client's conditional and range headers.
            let request = Request::new(Body::empty());
            match ServeFile::new(&path).oneshot(request).await {
                Ok(response) => response.map(Body::new),
                Err(never) => match never {},
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::io::Write;

    #[tokio::test]
    async fn test_serves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = std::fs::File::create(dir.path().join("404.html")).unwrap();
        write!(page, "missing").unwrap();

        let responder = ServeFileResponder::new(dir.path());
        let response = responder.respond(Path::new("404.html")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"missing");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let responder = ServeFileResponder::new(dir.path());

        let response = responder.respond(Path::new("nope.html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_resolve() {
        let responder = ServeFileResponder::new("/srv/pages");
        assert_eq!(responder.resolve(Path::new("404.html")), Path::new("/srv/pages/404.html"));
        assert_eq!(responder.resolve(Path::new("/etc/50x.html")), Path::new("/etc/50x.html"));
    }
}
