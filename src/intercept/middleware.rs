//! Error interception middleware.
//!
//! Applied by `Site::into_router` with `Router::layer`, after every route is
//! known, so it wraps all routes and the fallback and sees the matched path of
//! routed requests in the request extensions.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::ErrorFileMap;
use crate::intercept::decision::{decide, Decision, MatchSource};
use crate::intercept::responder::FileResponder;
use crate::observability::metrics;
use crate::routing::RouteSettings;

/// Immutable state captured at registration.
pub struct Interceptor {
    files: ErrorFileMap,
    routes: RouteSettings,
    responder: Arc<dyn FileResponder>,
}

impl Interceptor {
    pub fn new(files: ErrorFileMap, routes: RouteSettings, responder: Arc<dyn FileResponder>) -> Self {
        Self {
            files,
            routes,
            responder,
        }
    }

    /// Serve `file` in place of the original error response.
    ///
    /// A responder failure is returned as-is instead of the original response.
    async fn substitute(&self, file: &Path, status: StatusCode, source: MatchSource, route: Option<&str>) -> Response {
        let served = self.responder.respond(file).await;

        if !served.status().is_success() {
            tracing::warn!(
                status = %status,
                served_status = %served.status(),
                file = %file.display(),
                route = route.unwrap_or("<fallback>"),
                "Error page could not be served"
            );
            metrics::record_substitution_failure(status, served.status());
            return served;
        }

        let (mut parts, body) = served.into_parts();
        parts.status = status;
        parts
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));

        tracing::debug!(
            status = %status,
            file = %file.display(),
            source = source.as_str(),
            route = route.unwrap_or("<fallback>"),
            "Substituted error page"
        );
        metrics::record_substitution(source, status);

        Response::from_parts(parts, body)
    }
}

/// Middleware function for error page substitution.
pub async fn intercept_errors(
    State(interceptor): State<Arc<Interceptor>>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());
    let enabled = interceptor.routes.interception_enabled(route.as_deref());

    let response = next.run(request).await;

    match decide(&interceptor.files, enabled, response.status()) {
        Decision::PassThrough => {
            tracing::trace!(
                status = %response.status(),
                route = route.as_deref().unwrap_or("<fallback>"),
                enabled,
                "Response passed through"
            );
            response
        }
        Decision::Substitute { file, status, source } => {
            // The original body is discarded; only its status survives.
            drop(response);
            interceptor
                .substitute(file, status, source, route.as_deref())
                .await
        }
    }
}
